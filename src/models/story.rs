use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pages without a suggested reading time stay on screen this long.
pub const FALLBACK_PAGE_SECONDS: u32 = 30;

/// Session length used when a story does not report its total reading time.
pub const FALLBACK_TARGET_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CrowdPromptType {
    Completion,
    Recall,
    OpenEnded,
    WhQuestion,
    Distancing,
}

impl CrowdPromptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrowdPromptType::Completion => "completion",
            CrowdPromptType::Recall => "recall",
            CrowdPromptType::OpenEnded => "open_ended",
            CrowdPromptType::WhQuestion => "wh_question",
            CrowdPromptType::Distancing => "distancing",
        }
    }

    /// Heading shown above the prompt text.
    pub fn title(&self) -> &'static str {
        match self {
            CrowdPromptType::Completion => "Complete the sentence",
            CrowdPromptType::Recall => "Recall",
            CrowdPromptType::OpenEnded => "Let's talk",
            CrowdPromptType::WhQuestion => "Think about it",
            CrowdPromptType::Distancing => "Connect to life",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrowdPrompt {
    #[serde(rename = "type")]
    pub kind: CrowdPromptType,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryPage {
    pub page_number: u32,
    pub text: String,
    #[serde(default)]
    pub illustration_prompt: String,
    #[serde(default)]
    pub crowd_prompt: Option<CrowdPrompt>,
    #[serde(default)]
    pub reading_time_seconds: u32,
    #[serde(default)]
    pub word_count: u32,
}

impl StoryPage {
    /// Delay before an auto-advancing page counts as read.
    pub fn reading_duration(&self) -> Duration {
        let secs = if self.reading_time_seconds == 0 {
            FALLBACK_PAGE_SECONDS
        } else {
            self.reading_time_seconds
        };
        Duration::from_secs(u64::from(secs))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoryContent {
    #[serde(default)]
    pub pages: Vec<StoryPage>,
}

/// A fully loaded story, in the shape the story API returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Story {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: StoryContent,
    /// Total suggested reading time in seconds.
    #[serde(default)]
    pub reading_time: Option<u32>,
}

impl Story {
    pub fn pages(&self) -> &[StoryPage] {
        &self.content.pages
    }

    pub fn page(&self, index: usize) -> Option<&StoryPage> {
        self.content.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.content.pages.len()
    }

    /// Attention session length: total reading time rounded up to whole minutes.
    pub fn target_duration_minutes(&self) -> u32 {
        match self.reading_time {
            Some(secs) if secs > 0 => secs.div_ceil(60),
            _ => FALLBACK_TARGET_MINUTES,
        }
    }
}
