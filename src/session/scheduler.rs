use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::events::SessionEvent;

/// Delivers delayed events back into the session inbox.
///
/// All tasks spawned since the last [`cancel_all`](Self::cancel_all) share one
/// token, so leaving a page drops them in one step.
pub struct Scheduler {
    tx: mpsc::UnboundedSender<SessionEvent>,
    token: CancellationToken,
}

impl Scheduler {
    pub fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            tx,
            token: CancellationToken::new(),
        }
    }

    pub fn schedule(&self, after: Duration, event: SessionEvent) {
        let token = self.token.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    let _ = tx.send(event);
                }
            }
        });
    }

    pub fn cancel_all(&mut self) {
        self.token.cancel();
        self.token = CancellationToken::new();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::events::ScheduledKind;

    #[tokio::test(start_paused = true)]
    async fn cancelled_events_are_never_delivered() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);

        scheduler.schedule(
            Duration::from_secs(5),
            SessionEvent::Scheduled {
                kind: ScheduledKind::PageTimer,
                epoch: 1,
            },
        );
        scheduler.cancel_all();
        scheduler.schedule(
            Duration::from_secs(10),
            SessionEvent::Scheduled {
                kind: ScheduledKind::Advance,
                epoch: 2,
            },
        );

        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::Scheduled {
                kind: ScheduledKind::Advance,
                epoch: 2
            })
        );
        assert!(rx.try_recv().is_err());
    }
}
