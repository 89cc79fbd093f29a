use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    config::SessionTiming,
    crowd::{ActivePrompt, CrowdPromptHandler, CrowdResolution},
    models::{CompletionReason, CrowdResponseReport, SessionReport, Story, StoryPage},
    profile::AdaptationProfile,
};

use super::{
    error::SessionStartError,
    events::{Effect, ScheduledKind, SessionEvent, SessionNotice, TimerCommand},
    state::{ReaderPhase, SessionSnapshot, SessionState},
};
use crate::timer::TimerState;
use crate::{log_debug, log_info};

const ENABLE_LOGS: bool = true;

/// Page sequencing for one reading session.
///
/// All transitions happen in [`apply`](Self::apply), one event at a time.
/// Every time the machine leaves a page or a phase it bumps its epoch and
/// asks for pending scheduled events to be cancelled; a scheduled event that
/// still arrives with an older epoch is dropped.
pub struct SessionMachine {
    session_id: String,
    child_id: String,
    story: Arc<Story>,
    state: SessionState,
    phase: ReaderPhase,
    epoch: u64,
    prompt: CrowdPromptHandler,
    timing: SessionTiming,
    furthest_page: usize,
    report: Option<SessionReport>,
}

impl SessionMachine {
    pub fn new(
        story: Arc<Story>,
        child_id: impl Into<String>,
        timing: SessionTiming,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionStartError> {
        if story.page_count() == 0 {
            return Err(SessionStartError::EmptyStory {
                story_id: story.id.clone(),
            });
        }

        Ok(Self {
            session_id: Uuid::new_v4().to_string(),
            child_id: child_id.into(),
            story,
            state: SessionState::new(started_at),
            phase: ReaderPhase::Reading(0),
            epoch: 0,
            prompt: CrowdPromptHandler::new(),
            timing,
            furthest_page: 0,
            report: None,
        })
    }

    /// Enters the first page and starts the attention timer.
    pub fn begin(&mut self, profile: &AdaptationProfile) -> Vec<Effect> {
        let mut effects = vec![Effect::Timer(TimerCommand::Start)];
        self.enter_page(0, profile, &mut effects);
        log_info!(
            "session {} started on story {} ({} pages)",
            self.session_id,
            self.story.id,
            self.story.page_count()
        );
        effects
    }

    pub fn apply(
        &mut self,
        event: SessionEvent,
        profile: &AdaptationProfile,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase.is_terminal() {
            log_debug!("session {} completed; ignoring {:?}", self.session_id, event);
            return effects;
        }

        match event {
            SessionEvent::ConfirmPage => {
                if self.phase.is_on_page() && !self.state.has_completed_current_page {
                    self.complete_page(profile, &mut effects);
                }
            }
            SessionEvent::Scheduled { kind, epoch } => {
                if epoch != self.epoch {
                    log_debug!("dropping stale {:?} from epoch {} (now {})", kind, epoch, self.epoch);
                    return effects;
                }
                match kind {
                    ScheduledKind::PageTimer => {
                        if self.phase.is_on_page() && !self.state.has_completed_current_page {
                            self.complete_page(profile, &mut effects);
                        }
                    }
                    ScheduledKind::Advance => {
                        if self.can_go_next() {
                            self.advance(profile, now, &mut effects);
                        }
                    }
                }
            }
            SessionEvent::Next => {
                if self.can_go_next() {
                    self.advance(profile, now, &mut effects);
                }
            }
            SessionEvent::Previous => {
                if self.can_go_previous() {
                    let target = self.state.current_page_index - 1;
                    self.enter_page(target, profile, &mut effects);
                }
            }
            SessionEvent::Finish => {
                if self.can_finish() {
                    self.complete_session(CompletionReason::Finished, now, &mut effects);
                }
            }
            SessionEvent::SubmitResponse(response) => {
                if matches!(self.phase, ReaderPhase::CrowdPrompt(_)) {
                    match self.prompt.submit(&response) {
                        Some(resolution) => self.resolve_prompt(resolution, now, &mut effects),
                        None => log_debug!("blank CROWD response ignored"),
                    }
                }
            }
            SessionEvent::SkipPrompt => {
                if matches!(self.phase, ReaderPhase::CrowdPrompt(_)) {
                    if let Some(resolution) = self.prompt.skip() {
                        self.resolve_prompt(resolution, now, &mut effects);
                    }
                }
            }
            SessionEvent::BreakDue => {
                if self.phase != ReaderPhase::AttentionBreak {
                    // An open prompt stays active in the handler and is shown
                    // again on resume.
                    self.bump_epoch(&mut effects);
                    self.state.show_crowd_prompt = false;
                    self.phase = ReaderPhase::AttentionBreak;
                    effects.push(Effect::Notice(SessionNotice::BreakStarted {
                        index: self.state.current_page_index,
                    }));
                    log_info!("attention break on page {}", self.state.current_page_index + 1);
                }
            }
            SessionEvent::ResumeAfterBreak => {
                if self.phase == ReaderPhase::AttentionBreak {
                    effects.push(Effect::Notice(SessionNotice::BreakEnded {
                        index: self.state.current_page_index,
                    }));
                    effects.push(Effect::Timer(TimerCommand::ResumeAfterBreak));
                    self.bump_epoch(&mut effects);
                    self.arm_page(profile, &mut effects);
                }
            }
            SessionEvent::TimeUp => {
                self.complete_session(CompletionReason::TimeUp, now, &mut effects);
            }
        }

        effects
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn child_id(&self) -> &str {
        &self.child_id
    }

    pub fn story(&self) -> &Arc<Story> {
        &self.story
    }

    pub fn phase(&self) -> ReaderPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn active_prompt(&self) -> Option<&ActivePrompt> {
        self.prompt.active()
    }

    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    pub fn current_page(&self) -> &StoryPage {
        &self.story.pages()[self.state.current_page_index]
    }

    pub fn is_last_page(&self) -> bool {
        self.state.current_page_index + 1 == self.story.page_count()
    }

    pub fn can_go_next(&self) -> bool {
        self.phase.is_on_page() && self.state.has_completed_current_page
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.current_page_index > 0
            && matches!(
                self.phase,
                ReaderPhase::Reading(_)
                    | ReaderPhase::AwaitingManualConfirmation(_)
                    | ReaderPhase::CrowdPrompt(_)
            )
    }

    pub fn can_finish(&self) -> bool {
        self.is_last_page()
            && self.state.has_completed_current_page
            && !matches!(self.phase, ReaderPhase::AttentionBreak | ReaderPhase::Completed)
    }

    pub fn snapshot(&self, timer: Option<TimerState>) -> SessionSnapshot {
        let page_count = self.story.page_count();
        let left_behind = self.state.current_page_index
            + usize::from(self.state.has_completed_current_page);
        let progress_percent = if self.phase.is_terminal() {
            100.0
        } else {
            left_behind as f32 / page_count as f32 * 100.0
        };

        SessionSnapshot {
            session_id: self.session_id.clone(),
            story_id: self.story.id.clone(),
            story_title: self.story.title.clone(),
            phase: self.phase,
            state: self.state.clone(),
            page_count,
            can_go_next: self.can_go_next(),
            can_go_previous: self.can_go_previous(),
            can_finish: self.can_finish(),
            progress_percent,
            timer,
        }
    }

    fn bump_epoch(&mut self, effects: &mut Vec<Effect>) {
        self.epoch += 1;
        effects.push(Effect::CancelScheduled);
    }

    fn enter_page(&mut self, index: usize, profile: &AdaptationProfile, effects: &mut Vec<Effect>) {
        self.bump_epoch(effects);
        self.prompt.dismiss();
        self.state.current_page_index = index;
        self.state.has_completed_current_page = false;
        self.state.show_crowd_prompt = false;
        self.furthest_page = self.furthest_page.max(index);

        effects.push(Effect::Notice(SessionNotice::PageEntered {
            index,
            page_number: self.story.pages()[index].page_number,
        }));
        self.arm_page(profile, effects);
    }

    /// Puts the current page on screen in the phase the profile asks for.
    /// A completed page goes back to its open prompt, or keeps advancing.
    fn arm_page(&mut self, profile: &AdaptationProfile, effects: &mut Vec<Effect>) {
        let index = self.state.current_page_index;
        if self.state.has_completed_current_page {
            match self.prompt.active() {
                Some(active) => {
                    let prompt = active.prompt.clone();
                    self.state.show_crowd_prompt = true;
                    self.phase = ReaderPhase::CrowdPrompt(index);
                    effects.push(Effect::Notice(SessionNotice::PromptShown { index, prompt }));
                }
                None => {
                    self.phase = ReaderPhase::Reading(index);
                    let after = self.advance_delay(profile);
                    self.schedule_advance(after, effects);
                }
            }
            return;
        }

        if profile.manual_page_confirmation() {
            self.phase = ReaderPhase::AwaitingManualConfirmation(index);
        } else {
            self.phase = ReaderPhase::Reading(index);
            effects.push(Effect::Schedule {
                kind: ScheduledKind::PageTimer,
                epoch: self.epoch,
                after: self.story.pages()[index].reading_duration(),
            });
        }
    }

    fn complete_page(&mut self, profile: &AdaptationProfile, effects: &mut Vec<Effect>) {
        let index = self.state.current_page_index;
        self.state.has_completed_current_page = true;
        self.bump_epoch(effects);
        effects.push(Effect::Notice(SessionNotice::PageCompleted { index }));

        let story = Arc::clone(&self.story);
        let page = &story.pages()[index];
        if CrowdPromptHandler::is_eligible(page, profile) {
            if let Some(active) = self.prompt.open(page) {
                let prompt = active.prompt.clone();
                self.state.show_crowd_prompt = true;
                self.phase = ReaderPhase::CrowdPrompt(index);
                effects.push(Effect::Notice(SessionNotice::PromptShown { index, prompt }));
                return;
            }
        }

        self.phase = ReaderPhase::Reading(index);
        let after = self.advance_delay(profile);
        self.schedule_advance(after, effects);
    }

    fn advance_delay(&self, profile: &AdaptationProfile) -> Duration {
        if profile.autism.enhance_predictability {
            self.timing.predictable_advance
        } else {
            self.timing.standard_advance
        }
    }

    fn schedule_advance(&self, after: Duration, effects: &mut Vec<Effect>) {
        effects.push(Effect::Schedule {
            kind: ScheduledKind::Advance,
            epoch: self.epoch,
            after,
        });
    }

    fn resolve_prompt(
        &mut self,
        resolution: CrowdResolution,
        now: DateTime<Utc>,
        effects: &mut Vec<Effect>,
    ) {
        let index = self.state.current_page_index;
        let answered = resolution.response.is_some();
        self.state.show_crowd_prompt = false;
        self.bump_epoch(effects);
        self.phase = ReaderPhase::Reading(index);

        effects.push(Effect::ReportCrowd(CrowdResponseReport {
            session_id: self.session_id.clone(),
            story_id: self.story.id.clone(),
            page_number: resolution.page_number,
            prompt_type: resolution.prompt_type,
            response_text: resolution.response,
            answered_at: now,
        }));
        effects.push(Effect::Notice(SessionNotice::PromptResolved { index, answered }));
        self.schedule_advance(self.timing.crowd_advance, effects);
    }

    fn advance(&mut self, profile: &AdaptationProfile, now: DateTime<Utc>, effects: &mut Vec<Effect>) {
        if self.is_last_page() {
            self.complete_session(CompletionReason::Finished, now, effects);
        } else {
            let next = self.state.current_page_index + 1;
            self.enter_page(next, profile, effects);
        }
    }

    fn complete_session(
        &mut self,
        reason: CompletionReason,
        now: DateTime<Utc>,
        effects: &mut Vec<Effect>,
    ) {
        if self.phase.is_terminal() {
            return;
        }

        self.bump_epoch(effects);
        self.prompt.dismiss();
        self.state.show_crowd_prompt = false;
        self.phase = ReaderPhase::Completed;

        let started_at = self.state.session_started_at;
        let report = SessionReport {
            session_id: self.session_id.clone(),
            story_id: self.story.id.clone(),
            child_id: self.child_id.clone(),
            started_at,
            completed_at: now,
            duration_seconds: (now - started_at).num_seconds().max(0) as u64,
            reason,
            last_page_index: self.furthest_page,
        };
        log_info!(
            "session {} completed ({}) after {}s",
            self.session_id,
            reason.as_str(),
            report.duration_seconds
        );

        effects.push(Effect::Timer(TimerCommand::Pause));
        effects.push(Effect::ReportSession(report.clone()));
        effects.push(Effect::Notice(SessionNotice::Completed(report.clone())));
        self.report = Some(report);
    }
}
