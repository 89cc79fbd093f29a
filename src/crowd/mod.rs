pub mod handler;

pub use handler::{ActivePrompt, CrowdPromptHandler, CrowdResolution};
