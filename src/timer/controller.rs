use std::sync::Arc;

use tokio::{
    sync::{mpsc, watch, Mutex},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::{config::SessionTiming, profile::AdaptationProfile};

use super::{TickOutcome, TimerState, TimerStatus};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    BreakDue { elapsed_seconds: u64 },
    SessionComplete { elapsed_seconds: u64 },
}

/// Measures engaged reading time against the session target.
///
/// A background ticker advances [`TimerState`] once per tick while the timer
/// is running and reports break and completion boundaries on the signal
/// channel. The adhd flags are read from the live profile on every tick.
#[derive(Clone)]
pub struct AttentionTimer {
    state: Arc<Mutex<TimerState>>,
    profile: watch::Receiver<AdaptationProfile>,
    signals: mpsc::UnboundedSender<TimerSignal>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    resume: Arc<Mutex<Option<JoinHandle<()>>>>,
    timing: SessionTiming,
}

impl AttentionTimer {
    pub fn new(
        target_duration_minutes: u32,
        profile: watch::Receiver<AdaptationProfile>,
        signals: mpsc::UnboundedSender<TimerSignal>,
        timing: SessionTiming,
    ) -> Self {
        let adhd = profile.borrow().adhd;
        let state = TimerState::new(target_duration_minutes, &adhd, timing.short_block_cap_secs);

        Self {
            state: Arc::new(Mutex::new(state)),
            profile,
            signals,
            ticker: Arc::new(Mutex::new(None)),
            resume: Arc::new(Mutex::new(None)),
            timing,
        }
    }

    pub async fn snapshot(&self) -> TimerState {
        let mut guard = self.state.lock().await;
        let adhd = self.profile.borrow().adhd;
        guard.recompute_block(&adhd, self.timing.short_block_cap_secs);
        guard.clone()
    }

    /// Starts ticking. A running timer keeps its ticker and tick phase.
    pub async fn start(&self) {
        {
            let mut state = self.state.lock().await;
            if state.status == TimerStatus::Running {
                log_debug!("attention timer already running; start ignored");
                return;
            }
            if !state.start() {
                log_debug!("attention timer already completed; start ignored");
                return;
            }
        }
        self.spawn_ticker().await;
    }

    pub async fn pause(&self) {
        self.state.lock().await.pause();
        self.cancel_ticker().await;
        self.cancel_resume().await;
    }

    pub async fn reset(&self) {
        self.cancel_ticker().await;
        self.cancel_resume().await;
        self.state.lock().await.reset();
    }

    /// Clears a pending break. With `autoResumeAfterBreak` the timer starts
    /// again after a short delay; otherwise it waits for `start`.
    pub async fn resume_after_break(&self) {
        self.state.lock().await.clear_break();

        let auto_resume = self.profile.borrow().adhd.auto_resume_after_break;
        if !auto_resume {
            return;
        }

        let mut resume_guard = self.resume.lock().await;
        if let Some(handle) = resume_guard.take() {
            handle.abort();
        }

        let timer = self.clone();
        let delay = self.timing.auto_resume_delay;
        *resume_guard = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            timer.start().await;
        }));
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let profile = self.profile.clone();
        let signals = self.signals.clone();
        let tick_interval = self.timing.tick_interval;
        let block_cap = self.timing.short_block_cap_secs;
        let heartbeat_every = self.timing.heartbeat_every_ticks.max(1);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks: u32 = 0;

            loop {
                interval.tick().await;

                let adhd = profile.borrow().adhd;
                let (outcome, elapsed_seconds) = {
                    let mut guard = state.lock().await;
                    let outcome = guard.tick(&adhd, block_cap);
                    (outcome, guard.elapsed_seconds)
                };

                ticks = ticks.wrapping_add(1);
                if ticks % heartbeat_every == 0 {
                    log_debug!("attention timer heartbeat: {elapsed_seconds}s elapsed");
                }

                let signal = match outcome {
                    TickOutcome::Inactive => break,
                    TickOutcome::Continue => continue,
                    TickOutcome::BreakDue => TimerSignal::BreakDue { elapsed_seconds },
                    TickOutcome::SessionComplete => TimerSignal::SessionComplete { elapsed_seconds },
                };

                log_info!("attention timer signal {:?}", signal);
                let _ = signals.send(signal);
                break;
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn cancel_resume(&self) {
        if let Some(handle) = self.resume.lock().await.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::profile::{AdhdFlag, ProfileStore, ProfileUpdate};

    fn short_block_store() -> ProfileStore {
        let store = ProfileStore::new();
        store.apply(ProfileUpdate::Adhd(AdhdFlag::ShortAttentionBlocks, true));
        store
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_start_keeps_ticking() {
        let store = ProfileStore::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let timer = AttentionTimer::new(10, store.subscribe(), tx, SessionTiming::default());

        for _ in 0..5 {
            timer.start().await;
            time::sleep(Duration::from_millis(500)).await;
        }

        let snapshot = timer.snapshot().await;
        assert_eq!(snapshot.status, TimerStatus::Running);
        assert_eq!(snapshot.elapsed_seconds, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn signals_break_then_completion() {
        let store = short_block_store();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = AttentionTimer::new(10, store.subscribe(), tx, SessionTiming::default());

        timer.start().await;
        assert_eq!(
            rx.recv().await,
            Some(TimerSignal::BreakDue { elapsed_seconds: 300 })
        );
        assert!(timer.snapshot().await.break_pending());

        timer.resume_after_break().await;
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(timer.snapshot().await.elapsed_seconds, 300);

        timer.start().await;
        assert_eq!(
            rx.recv().await,
            Some(TimerSignal::SessionComplete { elapsed_seconds: 600 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn auto_resume_restarts_after_delay() {
        let store = short_block_store();
        store.apply(ProfileUpdate::Adhd(AdhdFlag::AutoResumeAfterBreak, true));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = AttentionTimer::new(10, store.subscribe(), tx, SessionTiming::default());

        timer.start().await;
        assert!(matches!(rx.recv().await, Some(TimerSignal::BreakDue { .. })));

        timer.resume_after_break().await;
        assert_eq!(
            rx.recv().await,
            Some(TimerSignal::SessionComplete { elapsed_seconds: 600 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_reset_stop_the_clock() {
        let store = ProfileStore::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let timer = AttentionTimer::new(10, store.subscribe(), tx, SessionTiming::default());

        timer.start().await;
        time::sleep(Duration::from_millis(5_500)).await;
        timer.pause().await;
        let paused = timer.snapshot().await;
        assert_eq!(paused.elapsed_seconds, 5);
        assert_eq!(paused.status, TimerStatus::Paused);

        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(timer.snapshot().await.elapsed_seconds, 5);

        timer.reset().await;
        let reset = timer.snapshot().await;
        assert_eq!(reset.elapsed_seconds, 0);
        assert_eq!(reset.status, TimerStatus::Idle);
    }
}
