pub mod config;
pub mod crowd;
pub mod db;
pub mod models;
pub mod profile;
pub mod providers;
pub mod session;
pub mod settings;
pub mod timer;
mod utils;

pub use config::{ReaderConfig, SessionTiming};
pub use db::Database;
pub use models::{CompletionReason, CrowdPrompt, CrowdPromptType, Story, StoryPage};
pub use profile::{AdaptationProfile, Preset, ProfileStore, ProfileUpdate};
pub use session::{
    ReaderPhase, ReadingSessionController, SessionHandle, SessionNotice, SessionServices,
    SessionSnapshot, SessionStartError,
};
pub use settings::{spawn_autosave, ProfileFile};

/// Initializes `env_logger` once. `RUST_LOG` still takes precedence.
pub fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
