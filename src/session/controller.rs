use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};

use crate::{
    config::SessionTiming,
    models::Story,
    profile::{AdaptationProfile, ProfileStore},
    providers::{IllustrationProvider, IllustrationStatus, ReportSink, StoryProvider},
    timer::{AttentionTimer, TimerSignal},
};

use super::{
    error::SessionStartError,
    events::{Effect, SessionEvent, SessionNotice, TimerCommand},
    machine::SessionMachine,
    scheduler::Scheduler,
    state::{ReaderPhase, SessionSnapshot},
};
use crate::{log_debug, log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Collaborators a session is wired to.
#[derive(Clone)]
pub struct SessionServices {
    pub profiles: ProfileStore,
    pub reports: Arc<dyn ReportSink>,
    pub illustrations: Option<Arc<dyn IllustrationProvider>>,
    pub timing: SessionTiming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    ConfirmPage,
    Next,
    Previous,
    Finish,
    SubmitResponse(String),
    SkipPrompt,
    ResumeAfterBreak,
    StartTimer,
    PauseTimer,
    /// Ends the session without a completion report.
    Abandon,
}

impl SessionCommand {
    fn into_event(self) -> Option<SessionEvent> {
        match self {
            SessionCommand::ConfirmPage => Some(SessionEvent::ConfirmPage),
            SessionCommand::Next => Some(SessionEvent::Next),
            SessionCommand::Previous => Some(SessionEvent::Previous),
            SessionCommand::Finish => Some(SessionEvent::Finish),
            SessionCommand::SubmitResponse(text) => Some(SessionEvent::SubmitResponse(text)),
            SessionCommand::SkipPrompt => Some(SessionEvent::SkipPrompt),
            SessionCommand::ResumeAfterBreak => Some(SessionEvent::ResumeAfterBreak),
            SessionCommand::StartTimer | SessionCommand::PauseTimer | SessionCommand::Abandon => {
                None
            }
        }
    }
}

/// Caller side of a running session. Cheap to clone; every method returns
/// false once the session has ended.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: String,
    story: Arc<Story>,
    commands: mpsc::UnboundedSender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    timer: AttentionTimer,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn timer(&self) -> &AttentionTimer {
        &self.timer
    }

    pub fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn confirm_page(&self) -> bool {
        self.send(SessionCommand::ConfirmPage)
    }

    pub fn next(&self) -> bool {
        self.send(SessionCommand::Next)
    }

    pub fn previous(&self) -> bool {
        self.send(SessionCommand::Previous)
    }

    pub fn finish(&self) -> bool {
        self.send(SessionCommand::Finish)
    }

    pub fn submit_response(&self, response: impl Into<String>) -> bool {
        self.send(SessionCommand::SubmitResponse(response.into()))
    }

    pub fn skip_prompt(&self) -> bool {
        self.send(SessionCommand::SkipPrompt)
    }

    pub fn resume_after_break(&self) -> bool {
        self.send(SessionCommand::ResumeAfterBreak)
    }

    pub fn start_timer(&self) -> bool {
        self.send(SessionCommand::StartTimer)
    }

    pub fn pause_timer(&self) -> bool {
        self.send(SessionCommand::PauseTimer)
    }

    pub fn abandon(&self) -> bool {
        self.send(SessionCommand::Abandon)
    }
}

pub struct ReadingSessionController;

impl ReadingSessionController {
    /// Loads the story and spawns the session task. Nothing is spawned when
    /// the story cannot be loaded or has no pages.
    pub async fn start(
        provider: &dyn StoryProvider,
        story_id: &str,
        child_id: &str,
        services: SessionServices,
    ) -> Result<(SessionHandle, mpsc::UnboundedReceiver<SessionNotice>), SessionStartError> {
        let story = provider
            .fetch_story(story_id)
            .await
            .map_err(|err| SessionStartError::fetch(story_id, err))?;
        let story = Arc::new(story);

        let machine = SessionMachine::new(
            Arc::clone(&story),
            child_id,
            services.timing.clone(),
            Utc::now(),
        )?;

        let profile_rx = services.profiles.subscribe();
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        let timer = AttentionTimer::new(
            story.target_duration_minutes(),
            profile_rx.clone(),
            signals_tx,
            services.timing.clone(),
        );

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (scheduled_tx, scheduled_rx) = mpsc::unbounded_channel();
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(machine.snapshot(None));

        let handle = SessionHandle {
            session_id: machine.session_id().to_string(),
            story: Arc::clone(&story),
            commands: commands_tx,
            snapshots: snapshots_rx,
            timer: timer.clone(),
        };

        let actor = SessionActor {
            machine,
            profile_rx,
            timer,
            scheduler: Scheduler::new(scheduled_tx),
            reports: services.reports,
            illustrations: services.illustrations,
            notices: notices_tx,
            snapshots: snapshots_tx,
        };
        tokio::spawn(actor.run(commands_rx, scheduled_rx, signals_rx));

        Ok((handle, notices_rx))
    }
}

/// Owns the machine and everything that acts on its effects. Runs as a
/// single task; every input goes through one `select!`.
struct SessionActor {
    machine: SessionMachine,
    profile_rx: watch::Receiver<AdaptationProfile>,
    timer: AttentionTimer,
    scheduler: Scheduler,
    reports: Arc<dyn ReportSink>,
    illustrations: Option<Arc<dyn IllustrationProvider>>,
    notices: mpsc::UnboundedSender<SessionNotice>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        mut scheduled: mpsc::UnboundedReceiver<SessionEvent>,
        mut signals: mpsc::UnboundedReceiver<TimerSignal>,
    ) {
        let profile = self.current_profile();
        let effects = self.machine.begin(&profile);
        self.execute(effects).await;
        self.publish().await;

        loop {
            let event = tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        log_info!("session {} abandoned: handle dropped", self.machine.session_id());
                        break;
                    };
                    match command {
                        SessionCommand::Abandon => {
                            log_info!("session {} abandoned", self.machine.session_id());
                            break;
                        }
                        SessionCommand::StartTimer => {
                            if self.timer_controllable() {
                                self.timer.start().await;
                            }
                            self.publish().await;
                            continue;
                        }
                        SessionCommand::PauseTimer => {
                            if self.timer_controllable() {
                                self.timer.pause().await;
                            }
                            self.publish().await;
                            continue;
                        }
                        other => match other.into_event() {
                            Some(event) => event,
                            None => continue,
                        },
                    }
                }
                Some(event) = scheduled.recv() => event,
                Some(signal) = signals.recv() => match signal {
                    TimerSignal::BreakDue { .. } => SessionEvent::BreakDue,
                    TimerSignal::SessionComplete { .. } => SessionEvent::TimeUp,
                },
            };

            let profile = self.current_profile();
            let effects = self.machine.apply(event, &profile, Utc::now());
            self.execute(effects).await;
            self.publish().await;

            if self.machine.phase().is_terminal() {
                break;
            }
        }

        self.scheduler.cancel_all();
        self.timer.reset().await;
        log_debug!("session {} task finished", self.machine.session_id());
    }

    fn current_profile(&self) -> AdaptationProfile {
        self.profile_rx.borrow().clone()
    }

    fn timer_controllable(&self) -> bool {
        !matches!(
            self.machine.phase(),
            ReaderPhase::AttentionBreak | ReaderPhase::Completed
        )
    }

    async fn publish(&self) {
        let timer = self.timer.snapshot().await;
        let snapshot = self.machine.snapshot(Some(timer));
        self.snapshots.send_replace(snapshot);
    }

    async fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Schedule { kind, epoch, after } => {
                    self.scheduler
                        .schedule(after, SessionEvent::Scheduled { kind, epoch });
                }
                Effect::CancelScheduled => self.scheduler.cancel_all(),
                Effect::Timer(TimerCommand::Start) => self.timer.start().await,
                Effect::Timer(TimerCommand::Pause) => self.timer.pause().await,
                Effect::Timer(TimerCommand::ResumeAfterBreak) => {
                    self.timer.resume_after_break().await
                }
                Effect::Notice(notice) => {
                    let entered = match &notice {
                        SessionNotice::PageEntered { index, .. } => Some(*index),
                        _ => None,
                    };
                    let _ = self.notices.send(notice);
                    if let Some(index) = entered {
                        self.request_illustration(index);
                    }
                }
                Effect::ReportCrowd(report) => {
                    let sink = Arc::clone(&self.reports);
                    tokio::spawn(async move {
                        if let Err(err) = sink.crowd_response(&report).await {
                            log_warn!(
                                "failed to report CROWD response for page {}: {err:?}",
                                report.page_number
                            );
                        }
                    });
                }
                Effect::ReportSession(report) => {
                    let sink = Arc::clone(&self.reports);
                    tokio::spawn(async move {
                        if let Err(err) = sink.session_completed(&report).await {
                            log_warn!(
                                "failed to report session {}: {err:?}",
                                report.session_id
                            );
                        }
                    });
                }
            }
        }
    }

    fn request_illustration(&self, index: usize) {
        let Some(provider) = self.illustrations.clone() else {
            return;
        };
        let Some(page) = self.machine.story().page(index) else {
            return;
        };

        let story_id = self.machine.story().id.clone();
        let page_number = page.page_number;
        let prompt = page.illustration_prompt.clone();
        let notices = self.notices.clone();
        tokio::spawn(async move {
            let status = match provider
                .resolve_illustration(&story_id, page_number, &prompt)
                .await
            {
                Ok(status) => status,
                Err(err) => {
                    log_warn!("illustration for page {page_number} failed: {err:?}");
                    IllustrationStatus::Failed
                }
            };
            let _ = notices.send(SessionNotice::Illustration {
                page_number,
                status,
            });
        });
    }
}
