use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "pageIndex", rename_all = "camelCase")]
pub enum ReaderPhase {
    Reading(usize),
    AwaitingManualConfirmation(usize),
    CrowdPrompt(usize),
    AttentionBreak,
    Completed,
}

impl ReaderPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReaderPhase::Completed)
    }

    /// The phases where the page itself is on screen.
    pub fn is_on_page(&self) -> bool {
        matches!(
            self,
            ReaderPhase::Reading(_) | ReaderPhase::AwaitingManualConfirmation(_)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub current_page_index: usize,
    pub has_completed_current_page: bool,
    pub show_crowd_prompt: bool,
    pub session_started_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            current_page_index: 0,
            has_completed_current_page: false,
            show_crowd_prompt: false,
            session_started_at: started_at,
        }
    }
}

/// Read-only view published after every transition.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub story_id: String,
    pub story_title: String,
    pub phase: ReaderPhase,
    pub state: SessionState,
    pub page_count: usize,
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub can_finish: bool,
    /// Share of pages already left behind, 0-100.
    pub progress_percent: f32,
    pub timer: Option<TimerState>,
}

impl SessionSnapshot {
    pub fn page_number(&self) -> usize {
        self.state.current_page_index + 1
    }

    pub fn is_completed(&self) -> bool {
        self.phase.is_terminal()
    }
}
