use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};

use neuroread_lib::{
    init_logging,
    providers::{JsonStoryDirectory, LogReportSink, ReportSink},
    spawn_autosave, Database, Preset, ProfileFile, ProfileStore, ReaderConfig,
    ReadingSessionController, SessionHandle, SessionNotice, SessionServices,
};

const AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(name = "neuroread", about = "Read a story with adaptive pacing", version)]
struct Cli {
    /// Id of the story to read (`<stories-dir>/<id>.json`)
    story_id: String,

    /// Overrides NEUROREAD_STORIES_DIR
    #[arg(long)]
    stories_dir: Option<PathBuf>,

    /// Overrides NEUROREAD_CHILD_ID
    #[arg(long)]
    child: Option<String>,

    /// Apply a preset before the session starts (adhd, autism, dyslexia, default)
    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ReaderConfig::from_env();
    if let Some(dir) = cli.stories_dir {
        config.stories_dir = dir;
    }
    if let Some(child) = cli.child {
        config.child_id = child;
    }
    if cli.debug {
        config.debug = true;
        config.timing.heartbeat_every_ticks = 1;
    }
    init_logging(config.debug);

    let profile_file = ProfileFile::new(config.profile_path());
    let profiles = ProfileStore::with_profile(profile_file.load());
    if let Some(name) = &cli.preset {
        let preset: Preset = name.parse()?;
        profiles.apply_preset(preset);
    }
    let autosave = spawn_autosave(&profiles, profile_file, AUTOSAVE_DEBOUNCE);

    let reports: Arc<dyn ReportSink> = match Database::new(config.database_path()) {
        Ok(db) => Arc::new(db),
        Err(err) => {
            warn!("Session reports will only be logged: {err:#}");
            Arc::new(LogReportSink)
        }
    };

    let provider = JsonStoryDirectory::new(config.stories_dir.clone());
    let services = SessionServices {
        profiles: profiles.clone(),
        reports,
        illustrations: None,
        timing: config.timing.clone(),
    };
    let (handle, mut notices) =
        ReadingSessionController::start(&provider, &cli.story_id, &config.child_id, services)
            .await
            .with_context(|| format!("could not start a session for {}", cli.story_id))?;

    let snapshot = handle.snapshot();
    println!("{} ({} pages)", snapshot.story_title, snapshot.page_count);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            notice = notices.recv() => {
                let Some(notice) = notice else { break };
                print_notice(&notice, &handle);
                if matches!(notice, SessionNotice::Completed(_)) {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    handle.abandon();
                    break;
                };
                if !dispatch(line.trim(), &handle, &profiles) {
                    handle.abandon();
                    break;
                }
            }
        }
    }

    // The last clone of the store; autosave flushes and exits.
    drop(profiles);
    autosave.await.context("profile autosave task failed")?;
    Ok(())
}

/// Runs one input line. Returns false when the reader wants to quit or the
/// session is gone.
fn dispatch(line: &str, handle: &SessionHandle, profiles: &ProfileStore) -> bool {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => true,
        "done" => handle.confirm_page(),
        "next" => handle.next(),
        "prev" => handle.previous(),
        "finish" => handle.finish(),
        "answer" => handle.submit_response(rest),
        "skip" => handle.skip_prompt(),
        "resume" => handle.resume_after_break(),
        "start" => handle.start_timer(),
        "pause" => handle.pause_timer(),
        "preset" => {
            match rest.parse::<Preset>() {
                Ok(preset) => {
                    profiles.apply_preset(preset);
                }
                Err(err) => println!("{err}"),
            }
            true
        }
        "set" => {
            match rest.split_once(' ') {
                Some((path, raw)) => match serde_json::from_str::<Value>(raw) {
                    Ok(value) => {
                        if !profiles.update(path, &value) {
                            println!("profile unchanged");
                        }
                    }
                    Err(err) => println!("invalid JSON value: {err}"),
                },
                None => println!("usage: set <path> <json>"),
            }
            true
        }
        "status" => {
            let snapshot = handle.snapshot();
            println!(
                "page {}/{} {:?} ({:.0}%)",
                snapshot.page_number(),
                snapshot.page_count,
                snapshot.phase,
                snapshot.progress_percent
            );
            true
        }
        "help" => {
            print_help();
            true
        }
        "quit" => false,
        other => {
            println!("unknown command '{other}', try 'help'");
            true
        }
    }
}

fn print_notice(notice: &SessionNotice, handle: &SessionHandle) {
    match notice {
        SessionNotice::PageEntered { index, page_number } => {
            let snapshot = handle.snapshot();
            println!("\n-- page {page_number} of {} --", snapshot.page_count);
            if let Some(page) = handle.story().page(*index) {
                println!("{}", page.text);
            }
        }
        SessionNotice::PageCompleted { .. } => println!("(page read)"),
        SessionNotice::PromptShown { prompt, .. } => {
            println!("\n{}: {}", prompt.kind.title(), prompt.text);
            println!("answer <text> or skip");
        }
        SessionNotice::PromptResolved { answered, .. } => {
            println!("{}", if *answered { "Thanks!" } else { "Skipped." });
        }
        SessionNotice::BreakStarted { .. } => {
            println!("\nTime for a short break. Type 'resume' when ready.");
        }
        SessionNotice::BreakEnded { .. } => println!("Welcome back."),
        SessionNotice::Illustration { page_number, status } => {
            println!("(illustration for page {page_number}: {status:?})");
        }
        SessionNotice::Completed(report) => {
            println!(
                "\nThe end! {} seconds of reading ({}).",
                report.duration_seconds,
                report.reason.as_str()
            );
        }
    }
}

fn print_help() {
    println!(
        "commands: done, next, prev, finish, answer <text>, skip, resume, start, pause, \
         preset <name>, set <path> <json>, status, help, quit"
    );
}
