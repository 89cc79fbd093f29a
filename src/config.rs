use std::{env, path::PathBuf, time::Duration};

/// Fixed delays and thresholds used by the session controller and the
/// attention timer.
#[derive(Debug, Clone)]
pub struct SessionTiming {
    /// Pause after a page completes before the next page, predictable mode.
    pub predictable_advance: Duration,
    /// Pause after a page completes before the next page, standard mode.
    pub standard_advance: Duration,
    /// Pause between resolving a CROWD prompt and turning the page.
    pub crowd_advance: Duration,
    /// Delay before the timer reactivates when auto-resume is on.
    pub auto_resume_delay: Duration,
    /// Longest attention block for short-attention profiles, in seconds.
    pub short_block_cap_secs: u64,
    pub tick_interval: Duration,
    /// Emit a timer heartbeat log every this many ticks.
    pub heartbeat_every_ticks: u32,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            predictable_advance: Duration::from_millis(2000),
            standard_advance: Duration::from_millis(1000),
            crowd_advance: Duration::from_millis(500),
            auto_resume_delay: Duration::from_millis(1000),
            short_block_cap_secs: 300,
            tick_interval: Duration::from_secs(1),
            heartbeat_every_ticks: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Holds `profile.json` and the report database.
    pub data_dir: PathBuf,
    /// Directory of `<story-id>.json` files.
    pub stories_dir: PathBuf,
    pub child_id: String,
    pub debug: bool,
    pub timing: SessionTiming,
}

impl ReaderConfig {
    pub fn from_env() -> Self {
        let debug = env::var("NEUROREAD_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let data_dir = env::var_os("NEUROREAD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".neuroread"));
        let stories_dir = env::var_os("NEUROREAD_STORIES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("stories"));
        let child_id = env::var("NEUROREAD_CHILD_ID").unwrap_or_else(|_| "guest".into());

        let timing = SessionTiming {
            heartbeat_every_ticks: if debug { 1 } else { 30 },
            ..SessionTiming::default()
        };

        Self {
            data_dir,
            stories_dir,
            child_id,
            debug,
            timing,
        }
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("neuroread.sqlite3")
    }
}
