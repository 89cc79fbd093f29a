pub mod external;
pub mod presets;
pub mod store;
pub mod types;
pub mod update;

pub use external::{AdhdPatch, AutismPatch, DyslexiaPatch, NeuroProfile};
pub use presets::Preset;
pub use store::ProfileStore;
pub use types::{AdaptationProfile, AdhdSettings, AutismSettings, DyslexiaSettings, Typography};
pub use update::{AdhdFlag, AutismFlag, DyslexiaFlag, ProfileUpdate};
