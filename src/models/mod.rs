pub mod report;
pub mod story;

pub use report::{CompletionReason, CrowdResponseReport, SessionReport};
pub use story::{CrowdPrompt, CrowdPromptType, Story, StoryContent, StoryPage};
