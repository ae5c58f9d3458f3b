//! Play command: a terminal read-along session.

use super::lecture::read_timings;
use crate::api::{load_lecture, LectureSource};
use crate::cli::Output;
use crate::config::Settings;
use crate::player::{Command, Line, PlaybackSession, SessionUpdate};
use anyhow::Result;
use indicatif::ProgressBar;
use std::io::BufRead;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use uuid::Uuid;

/// Run the play command.
pub async fn run_play(
    source: &dyn LectureSource,
    id: Option<Uuid>,
    file: Option<&str>,
    settings: &Settings,
) -> Result<()> {
    let (title, timings) = match (id, file) {
        (_, Some(path)) => (path.to_string(), read_timings(path)?),
        (Some(id), None) => {
            let loaded = load_lecture(source, id).await?;
            match loaded.timings {
                Some(timings) => (loaded.lecture.title, timings),
                None => {
                    Output::warning("This lecture has no synced audio yet.");
                    Output::info(&format!("Use 'symposium generate-audio {}' first.", id));
                    return Ok(());
                }
            }
        }
        (None, None) => anyhow::bail!("Either a lecture ID or --file is required"),
    };

    let term = console::Term::stdout();
    let mut rows = term.size().0;
    let mut session = PlaybackSession::new(&timings, settings, window_height(rows));

    Output::header(&title);
    Output::info("enter: play/pause  , .: skip  s: speed  0-9: seek  w <n>: word  q: quit");

    let bar = Output::playback_bar();
    render_window(&bar, &session);
    refresh_bar(&bar, &session);

    let mut commands = spawn_input_reader();
    let mut interval = tokio::time::interval(settings.player.frame_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let update = session.apply(Command::TogglePlay);
    show(&bar, &session, update);
    info!(phrases = session.sync().phrases().len(), "Playback started");

    let mut last_tick = Instant::now();
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                debug!("Interrupted");
                break;
            }
            Some(command) = commands.recv() => {
                if command == Command::Quit {
                    break;
                }
                let update = session.apply(command);
                show(&bar, &session, update);
            }
            _ = interval.tick() => {
                let now = Instant::now();
                let update = session.tick(now - last_tick);
                last_tick = now;
                let resized = term.size().0;
                if resized != rows {
                    rows = resized;
                    if session.resize(window_height(rows)) {
                        render_window(&bar, &session);
                    }
                }
                show(&bar, &session, update);
                if update.ended {
                    break;
                }
            }
        }
    }

    session.close();
    bar.finish_and_clear();
    if session.is_ended() {
        Output::success("Lecture finished.");
    } else {
        Output::info(&format!(
            "Stopped at {} / {}",
            session.transport().elapsed_label(),
            session.transport().duration_label()
        ));
    }
    Ok(())
}

/// Forward parsed stdin lines until quit or end of input.
///
/// A detached thread: a pending blocking read must not delay runtime shutdown.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Command> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            if tx.send(command).is_err() || command == Command::Quit {
                break;
            }
        }
    });
    rx
}

/// Transcript lines that fit under the header and progress bar.
fn window_height(rows: u16) -> usize {
    usize::from(rows).saturating_sub(6).max(3)
}

fn show(bar: &ProgressBar, session: &PlaybackSession, update: SessionUpdate) {
    if update.scrolled {
        render_window(bar, session);
    }
    refresh_bar(bar, session);
}

fn render_window(bar: &ProgressBar, session: &PlaybackSession) {
    let active = session.sync().state().active_phrase;
    bar.println("");
    for line in session.visible() {
        match *line {
            Line::Phrase(i) => {
                bar.println(Output::transcript_line(session.phrase_text(i), active == Some(i)))
            }
            Line::Blank => bar.println(""),
        }
    }
}

fn refresh_bar(bar: &ProgressBar, session: &PlaybackSession) {
    let transport = session.transport();
    let state = session.sync().state();
    let icon = if state.is_playing { ">" } else { "||" };

    bar.set_prefix(format!(
        "{} {} / {} {}",
        icon,
        transport.elapsed_label(),
        transport.duration_label(),
        transport.speed_label()
    ));
    bar.set_position((transport.progress() * 1000.0).round() as u64);
    bar.set_message(
        state
            .active_phrase
            .map(|i| crate::cli::output::content_preview(session.phrase_text(i), 60))
            .unwrap_or_default(),
    );
}
