use serde::{Deserialize, Serialize};

use crate::profile::AdhdSettings;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
    /// Stopped at an attention-block boundary, waiting for `resume_after_break`.
    BreakPending,
    /// Target duration reached. Terminal until `reset`.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing advanced.
    Inactive,
    Continue,
    BreakDue,
    SessionComplete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub elapsed_seconds: u64,
    pub target_seconds: u64,
    pub attention_block_duration_seconds: u64,
}

impl TimerState {
    /// Builds an idle timer. Durations of zero are clamped to one second.
    pub fn new(
        target_duration_minutes: u32,
        adhd: &AdhdSettings,
        short_block_cap_secs: u64,
    ) -> Self {
        let target_seconds = (u64::from(target_duration_minutes) * 60).max(1);
        let mut state = Self {
            status: TimerStatus::Idle,
            elapsed_seconds: 0,
            target_seconds,
            attention_block_duration_seconds: target_seconds,
        };
        state.recompute_block(adhd, short_block_cap_secs);
        state
    }

    pub fn is_active(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn break_pending(&self) -> bool {
        self.status == TimerStatus::BreakPending
    }

    pub fn is_completed(&self) -> bool {
        self.status == TimerStatus::Completed
    }

    pub fn recompute_block(&mut self, adhd: &AdhdSettings, short_block_cap_secs: u64) {
        let block = if adhd.short_attention_blocks {
            self.target_seconds.min(short_block_cap_secs)
        } else {
            self.target_seconds
        };
        self.attention_block_duration_seconds = block.max(1);
    }

    /// Advances one second. Completion is checked before the break boundary,
    /// so a tick landing on both completes the session.
    pub fn tick(&mut self, adhd: &AdhdSettings, short_block_cap_secs: u64) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Inactive;
        }

        self.recompute_block(adhd, short_block_cap_secs);
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);

        if self.elapsed_seconds >= self.target_seconds {
            self.status = TimerStatus::Completed;
            return TickOutcome::SessionComplete;
        }

        if adhd.enable_break_reminders
            && self.elapsed_seconds % self.attention_block_duration_seconds == 0
        {
            self.status = TimerStatus::BreakPending;
            return TickOutcome::BreakDue;
        }

        TickOutcome::Continue
    }

    /// Returns false when the timer cannot run (completed).
    pub fn start(&mut self) -> bool {
        match self.status {
            TimerStatus::Completed => false,
            _ => {
                self.status = TimerStatus::Running;
                true
            }
        }
    }

    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Paused;
        }
    }

    pub fn clear_break(&mut self) {
        if self.status == TimerStatus::BreakPending {
            self.status = TimerStatus::Paused;
        }
    }

    pub fn reset(&mut self) {
        self.status = TimerStatus::Idle;
        self.elapsed_seconds = 0;
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.target_seconds.saturating_sub(self.elapsed_seconds)
    }

    pub fn progress_percent(&self) -> f32 {
        (self.elapsed_seconds as f32 / self.target_seconds as f32 * 100.0).min(100.0)
    }
}
