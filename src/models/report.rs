use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::story::CrowdPromptType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CompletionReason {
    /// The reader confirmed or advanced past the last page.
    Finished,
    /// The attention timer reached the target duration first.
    TimeUp,
}

impl CompletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionReason::Finished => "Finished",
            CompletionReason::TimeUp => "TimeUp",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: String,
    pub story_id: String,
    pub child_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub reason: CompletionReason,
    /// Furthest page index reached, zero-based.
    pub last_page_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrowdResponseReport {
    pub session_id: String,
    pub story_id: String,
    pub page_number: u32,
    pub prompt_type: CrowdPromptType,
    /// `None` when the prompt was skipped.
    pub response_text: Option<String>,
    pub answered_at: DateTime<Utc>,
}
