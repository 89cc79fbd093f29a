use std::time::Duration;

use serde::Serialize;

use crate::{
    models::{CrowdPrompt, CrowdResponseReport, SessionReport},
    providers::IllustrationStatus,
};

/// Delayed transitions the controller schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledKind {
    /// Reading time of an auto-advancing page elapsed.
    PageTimer,
    /// Move on from a completed page (or resolved prompt).
    Advance,
}

/// Input to [`SessionMachine::apply`](super::SessionMachine::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The "I'm done reading" affordance.
    ConfirmPage,
    Next,
    Previous,
    /// The completion button on the last page.
    Finish,
    SubmitResponse(String),
    SkipPrompt,
    BreakDue,
    ResumeAfterBreak,
    TimeUp,
    /// A scheduled transition; `epoch` is the controller epoch it was issued in.
    Scheduled { kind: ScheduledKind, epoch: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    ResumeAfterBreak,
}

/// Side effects requested by a transition. The machine never performs I/O or
/// spawns anything itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Schedule {
        kind: ScheduledKind,
        epoch: u64,
        after: Duration,
    },
    /// Everything scheduled in earlier epochs is obsolete.
    CancelScheduled,
    Timer(TimerCommand),
    Notice(SessionNotice),
    ReportCrowd(CrowdResponseReport),
    ReportSession(SessionReport),
}

/// Progress events for whoever renders the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionNotice {
    PageEntered {
        index: usize,
        page_number: u32,
    },
    PageCompleted {
        index: usize,
    },
    PromptShown {
        index: usize,
        prompt: CrowdPrompt,
    },
    PromptResolved {
        index: usize,
        answered: bool,
    },
    BreakStarted {
        index: usize,
    },
    BreakEnded {
        index: usize,
    },
    Illustration {
        page_number: u32,
        status: IllustrationStatus,
    },
    Completed(SessionReport),
}
