use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::{sync::mpsc, time::Instant};

use neuroread_lib::{
    models::{
        CompletionReason, CrowdPrompt, CrowdPromptType, CrowdResponseReport, SessionReport,
        Story, StoryContent, StoryPage,
    },
    profile::{AdhdFlag, AutismFlag, ProfileStore, ProfileUpdate},
    providers::{IllustrationProvider, IllustrationStatus, ReportSink, StoryProvider},
    timer::TimerStatus,
    ReaderPhase, ReadingSessionController, SessionHandle, SessionNotice, SessionServices,
    SessionStartError, SessionTiming,
};

struct StaticStories(Vec<Story>);

#[async_trait]
impl StoryProvider for StaticStories {
    async fn fetch_story(&self, story_id: &str) -> Result<Story> {
        self.0
            .iter()
            .find(|story| story.id == story_id)
            .cloned()
            .ok_or_else(|| anyhow!("story {story_id} not found"))
    }
}

#[derive(Default)]
struct RecordingSink {
    sessions: Mutex<Vec<SessionReport>>,
    responses: Mutex<Vec<CrowdResponseReport>>,
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn session_completed(&self, report: &SessionReport) -> Result<()> {
        self.sessions.lock().unwrap().push(report.clone());
        Ok(())
    }

    async fn crowd_response(&self, report: &CrowdResponseReport) -> Result<()> {
        self.responses.lock().unwrap().push(report.clone());
        Ok(())
    }
}

struct FirstPageOnly;

#[async_trait]
impl IllustrationProvider for FirstPageOnly {
    async fn resolve_illustration(
        &self,
        story_id: &str,
        page_number: u32,
        _prompt: &str,
    ) -> Result<IllustrationStatus> {
        if page_number == 1 {
            Ok(IllustrationStatus::Ready {
                uri: format!("file:///{story_id}/1.png"),
            })
        } else {
            Err(anyhow!("generator offline"))
        }
    }
}

fn story(id: &str, pages: &[(u32, Option<CrowdPromptType>)], reading_time: Option<u32>) -> Story {
    let pages = pages
        .iter()
        .enumerate()
        .map(|(i, (seconds, prompt))| StoryPage {
            page_number: i as u32 + 1,
            text: format!("Page {} of the story.", i + 1),
            illustration_prompt: format!("scene {}", i + 1),
            crowd_prompt: prompt.map(|kind| CrowdPrompt {
                kind,
                text: "What do you think happens next?".into(),
            }),
            reading_time_seconds: *seconds,
            word_count: 5,
        })
        .collect();

    Story {
        id: id.into(),
        title: "The Brave Little Fox".into(),
        content: StoryContent { pages },
        reading_time,
    }
}

fn services(profiles: &ProfileStore, sink: &Arc<RecordingSink>) -> SessionServices {
    SessionServices {
        profiles: profiles.clone(),
        reports: sink.clone(),
        illustrations: None,
        timing: SessionTiming::default(),
    }
}

async fn start(
    story: Story,
    services: SessionServices,
) -> (SessionHandle, mpsc::UnboundedReceiver<SessionNotice>) {
    let id = story.id.clone();
    let provider = StaticStories(vec![story]);
    ReadingSessionController::start(&provider, &id, "child-1", services)
        .await
        .unwrap()
}

async fn drain(notices: &mut mpsc::UnboundedReceiver<SessionNotice>) -> Vec<SessionNotice> {
    let mut seen = Vec::new();
    while let Some(notice) = notices.recv().await {
        seen.push(notice);
    }
    seen
}

async fn wait_for_phase(handle: &SessionHandle, phase: ReaderPhase) {
    handle
        .snapshots()
        .wait_for(|snapshot| snapshot.phase == phase)
        .await
        .unwrap();
}

fn completions(notices: &[SessionNotice]) -> usize {
    notices
        .iter()
        .filter(|notice| matches!(notice, SessionNotice::PageCompleted { .. }))
        .count()
}

#[tokio::test(start_paused = true)]
async fn auto_paced_story_completes_on_its_own() {
    let profiles = ProfileStore::new();
    let sink = Arc::new(RecordingSink::default());
    let (handle, mut notices) = start(
        story("fox", &[(1, None), (1, None), (1, None)], None),
        services(&profiles, &sink),
    )
    .await;

    let seen = drain(&mut notices).await;
    assert_eq!(completions(&seen), 3);
    match seen.last() {
        Some(SessionNotice::Completed(report)) => {
            assert_eq!(report.reason, CompletionReason::Finished);
            assert_eq!(report.story_id, "fox");
            assert_eq!(report.child_id, "child-1");
            assert_eq!(report.last_page_index, 2);
        }
        other => panic!("expected completion, got {other:?}"),
    }

    assert!(handle.snapshot().is_completed());
    assert!(!handle.next());

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(sink.sessions.lock().unwrap().len(), 1);

    let timer = handle.timer().snapshot().await;
    assert_eq!(timer.status, TimerStatus::Idle);
    assert_eq!(timer.elapsed_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn crowd_prompt_waits_for_an_answer() {
    let profiles = ProfileStore::new();
    let sink = Arc::new(RecordingSink::default());
    let (handle, mut notices) = start(
        story(
            "fox",
            &[(1, None), (1, Some(CrowdPromptType::Completion)), (1, None)],
            None,
        ),
        services(&profiles, &sink),
    )
    .await;

    wait_for_phase(&handle, ReaderPhase::CrowdPrompt(1)).await;
    tokio::time::sleep(Duration::from_secs(30)).await;
    handle.next();
    handle.submit_response("   ");
    tokio::time::sleep(Duration::from_secs(5)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.phase, ReaderPhase::CrowdPrompt(1));
    assert!(snapshot.state.show_crowd_prompt);

    handle.submit_response("the fox crossed the river");
    wait_for_phase(&handle, ReaderPhase::Reading(2)).await;

    let seen = drain(&mut notices).await;
    assert!(matches!(seen.last(), Some(SessionNotice::Completed(_))));

    tokio::time::sleep(Duration::from_millis(10)).await;
    let responses = sink.responses.lock().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].page_number, 2);
    assert_eq!(
        responses[0].response_text.as_deref(),
        Some("the fox crossed the river")
    );
}

#[tokio::test(start_paused = true)]
async fn going_back_requires_reading_the_page_again() {
    let profiles = ProfileStore::new();
    profiles.apply(ProfileUpdate::Autism(AutismFlag::EnhancePredictability, true));
    let sink = Arc::new(RecordingSink::default());
    let (handle, _notices) = start(
        story("fox", &[(1, None), (1, None), (1, None)], None),
        services(&profiles, &sink),
    )
    .await;

    wait_for_phase(&handle, ReaderPhase::AwaitingManualConfirmation(0)).await;
    handle.confirm_page();
    wait_for_phase(&handle, ReaderPhase::AwaitingManualConfirmation(1)).await;
    handle.confirm_page();
    handle
        .snapshots()
        .wait_for(|s| s.state.has_completed_current_page)
        .await
        .unwrap();

    handle.previous();
    wait_for_phase(&handle, ReaderPhase::AwaitingManualConfirmation(0)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.state.current_page_index, 0);
    assert!(!snapshot.state.has_completed_current_page);
    assert!(!snapshot.can_go_next);

    // The advance scheduled for page 2 must not fire.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(
        handle.snapshot().phase,
        ReaderPhase::AwaitingManualConfirmation(0)
    );
}

#[tokio::test(start_paused = true)]
async fn page_timer_from_before_a_break_never_fires() {
    let profiles = ProfileStore::new();
    profiles.apply(ProfileUpdate::Adhd(AdhdFlag::ShortAttentionBlocks, true));
    let sink = Arc::new(RecordingSink::default());
    let started = Instant::now();
    let (handle, mut notices) = start(
        story("long", &[(400, None), (400, None)], Some(1200)),
        services(&profiles, &sink),
    )
    .await;

    wait_for_phase(&handle, ReaderPhase::AttentionBreak).await;
    assert_eq!(handle.timer().snapshot().await.elapsed_seconds, 300);

    assert!(handle.resume_after_break());
    wait_for_phase(&handle, ReaderPhase::Reading(0)).await;

    // Past the point where the original page timer would have fired.
    tokio::time::sleep(Duration::from_secs(150)).await;
    assert!(!handle.snapshot().state.has_completed_current_page);

    handle
        .snapshots()
        .wait_for(|s| s.state.has_completed_current_page)
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_secs(700));

    handle.abandon();
    let seen = drain(&mut notices).await;
    assert_eq!(completions(&seen), 1);
    assert!(seen
        .iter()
        .any(|n| matches!(n, SessionNotice::BreakStarted { index: 0 })));
    assert!(seen
        .iter()
        .any(|n| matches!(n, SessionNotice::BreakEnded { index: 0 })));
}

#[tokio::test(start_paused = true)]
async fn timer_completion_ends_the_session() {
    let profiles = ProfileStore::new();
    let sink = Arc::new(RecordingSink::default());
    let (_handle, mut notices) = start(
        story("short", &[(400, None), (400, None)], Some(60)),
        services(&profiles, &sink),
    )
    .await;

    let seen = drain(&mut notices).await;
    assert_eq!(completions(&seen), 0);
    match seen.last() {
        Some(SessionNotice::Completed(report)) => {
            assert_eq!(report.reason, CompletionReason::TimeUp);
            assert_eq!(report.last_page_index, 0);
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn illustration_failures_become_placeholders() {
    let profiles = ProfileStore::new();
    let sink = Arc::new(RecordingSink::default());
    let mut services = services(&profiles, &sink);
    services.illustrations = Some(Arc::new(FirstPageOnly));
    let (_handle, mut notices) = start(story("fox", &[(1, None), (1, None)], None), services).await;

    let seen = drain(&mut notices).await;
    assert!(seen.contains(&SessionNotice::Illustration {
        page_number: 1,
        status: IllustrationStatus::Ready {
            uri: "file:///fox/1.png".into()
        },
    }));
    assert!(seen.contains(&SessionNotice::Illustration {
        page_number: 2,
        status: IllustrationStatus::Failed,
    }));
    assert_eq!(completions(&seen), 2);
}

#[tokio::test]
async fn start_fails_for_missing_or_empty_stories() {
    let profiles = ProfileStore::new();
    let sink = Arc::new(RecordingSink::default());
    let provider = StaticStories(vec![story("blank", &[], None)]);

    let err = ReadingSessionController::start(&provider, "nope", "child-1", services(&profiles, &sink))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, SessionStartError::Fetch { .. }));
    assert_eq!(err.story_id(), "nope");

    let err = ReadingSessionController::start(&provider, "blank", "child-1", services(&profiles, &sink))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, SessionStartError::EmptyStory { .. }));
}
