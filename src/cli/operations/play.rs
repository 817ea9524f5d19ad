use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::load_session;
use crate::config::Config;
use crate::core::playback::{
    spawn_player_driver, spawn_poll_feed, spawn_push_feed, FeedMode, PlaybackClock, PlaybackSample,
    SimulatedPlayer,
};
use crate::core::session::LyricsSession;
use crate::signal_handler::{PlayerCommand, SignalHandler};
use crate::ui::{self, Presenter, UiMode};

/// How often the simulated player reports its position in push mode.
const PUSH_REPORT_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Args)]
pub struct PlayArgs {
    /// Audio file with sidecar/embedded lyrics, or a lyrics file
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Start position in seconds
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Override the configured time feed (poll or push)
    #[arg(long)]
    feed: Option<FeedMode>,

    /// Emit one JSON object per change instead of drawing
    #[arg(long)]
    json: bool,

    /// Do not read keyboard controls
    #[arg(long)]
    no_input: bool,
}

/// Whether `play` will take over the terminal with these arguments.
pub fn is_interactive(args: &PlayArgs) -> bool {
    !args.json && UiMode::detect() == UiMode::Terminal
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FollowSummary {
    pub samples: usize,
    pub changes: usize,
    pub quit: bool,
}

/// Drive `session` from `samples` until the stream ends, a sample reaches the
/// player's length, or a `Quit` command arrives. The presenter only hears
/// about samples that changed the active line, apart from one initial
/// no-line render when there are no lyrics at all.
pub async fn follow_lyrics<P>(
    session: &mut LyricsSession,
    player: &SimulatedPlayer,
    samples: &mut mpsc::Receiver<PlaybackSample>,
    commands: &mut mpsc::Receiver<PlayerCommand>,
    presenter: &mut P,
) -> Result<FollowSummary>
where
    P: Presenter + ?Sized,
{
    let mut summary = FollowSummary::default();
    let stop_at = player.length();

    // An empty document never reports a change.
    if session.document().is_empty() {
        presenter.show_active_line(session.document(), None, player.position())?;
    }

    loop {
        tokio::select! {
            biased;

            sample = samples.recv() => {
                let Some(sample) = sample else {
                    break;
                };
                summary.samples += 1;

                let update = session.advance(sample.current_time);
                if update.changed {
                    summary.changes += 1;
                    presenter.show_active_line(session.document(), update.index, sample.current_time)?;
                }

                if stop_at.is_some_and(|end| sample.current_time >= end) {
                    debug!("Reached end of playback at {:.3}s", sample.current_time);
                    break;
                }
            }

            Some(command) = commands.recv() => {
                match command {
                    PlayerCommand::TogglePause => {
                        let playing = player.toggle();
                        presenter.set_status(if playing { "playing" } else { "paused" })?;
                    }
                    PlayerCommand::SeekBy(delta) => player.seek_by(delta),
                    PlayerCommand::Quit => {
                        summary.quit = true;
                        break;
                    }
                }
            }
        }
    }

    Ok(summary)
}

pub async fn execute(args: PlayArgs, config: &Config) -> Result<()> {
    let mut session = load_session(&args.path, config).await?;

    let grace = config.end_grace_seconds as f64;
    let end = session.document().last_timestamp().unwrap_or(0.0).max(args.start.max(0.0)) + grace;
    let player = Arc::new(SimulatedPlayer::new(args.start, Some(end)));

    let (sample_tx, mut sample_rx) = mpsc::channel(64);
    let feed_mode = args.feed.unwrap_or(config.feed_mode);
    let mut feed_handles = Vec::new();
    match feed_mode {
        FeedMode::Poll => {
            let clock: Arc<dyn PlaybackClock> = player.clone();
            let period = Duration::from_millis(config.poll_interval_ms);
            feed_handles.push(spawn_poll_feed(clock, period, sample_tx));
        }
        FeedMode::Push => {
            let positions = player.subscribe();
            feed_handles.push(spawn_player_driver(player.clone(), PUSH_REPORT_INTERVAL));
            feed_handles.push(spawn_push_feed(positions, sample_tx));
        }
    }
    info!("Following {} with {} feed", args.path.display(), feed_mode);

    let interactive = is_interactive(&args);
    let signals = SignalHandler::new();
    let (command_tx, mut command_rx) = mpsc::channel(16);
    let signal_handle = signals.start_signal_monitoring(command_tx.clone());
    let input_handle = if interactive && !args.no_input {
        Some(signals.start_input_monitoring(command_tx.clone()))
    } else {
        None
    };

    let mut presenter = ui::create_presenter(args.json, config.context_lines);
    let track_name = args.path.display().to_string();
    presenter.start(&track_name, session.document(), session.source_type())?;

    player.play();
    let result = follow_lyrics(
        &mut session,
        &player,
        &mut sample_rx,
        &mut command_rx,
        presenter.as_mut(),
    )
    .await;

    signals.shutdown();
    drop(sample_rx);
    for handle in feed_handles {
        handle.abort();
    }
    signal_handle.abort();
    if let Some(handle) = input_handle {
        let _ = handle.await;
    }
    presenter.finish()?;

    let summary = result?;
    info!(
        "Playback finished: {} samples, {} line changes{}",
        summary.samples,
        summary.changes,
        if summary.quit { " (stopped by user)" } else { "" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lyrics::LyricsParser;
    use crate::ui::plain_ui::PlainPresenter;

    const LRC: &str = "[00:00.000]A\n[00:01.000]B\n[00:02.000]C";

    fn session() -> LyricsSession {
        let mut session = LyricsSession::new();
        session.install(LyricsParser::new().parse_str(LRC));
        session
    }

    fn rendered(presenter: PlainPresenter<Vec<u8>>) -> Vec<String> {
        String::from_utf8(presenter.into_inner())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    async fn run_with_feed(mode: FeedMode) -> (Vec<String>, FollowSummary) {
        let mut session = session();
        let player = Arc::new(SimulatedPlayer::new(0.0, Some(3.0)));
        let (sample_tx, mut sample_rx) = mpsc::channel(16);
        let (_command_tx, mut command_rx) = mpsc::channel(4);

        match mode {
            FeedMode::Poll => {
                let clock: Arc<dyn PlaybackClock> = player.clone();
                spawn_poll_feed(clock, Duration::from_millis(100), sample_tx);
            }
            FeedMode::Push => {
                let positions = player.subscribe();
                spawn_player_driver(player.clone(), Duration::from_millis(100));
                spawn_push_feed(positions, sample_tx);
            }
        }

        let mut presenter = PlainPresenter::text(Vec::new());
        player.play();
        let summary = follow_lyrics(
            &mut session,
            &player,
            &mut sample_rx,
            &mut command_rx,
            &mut presenter,
        )
        .await
        .unwrap();

        (rendered(presenter), summary)
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_and_push_render_the_same_lines() {
        let expected = vec!["[00:00.000] A", "[00:01.000] B", "[00:02.000] C"];

        let (poll_lines, poll_summary) = run_with_feed(FeedMode::Poll).await;
        assert_eq!(poll_lines, expected);
        assert_eq!(poll_summary.changes, 3);
        assert!(poll_summary.samples > poll_summary.changes);

        let (push_lines, push_summary) = run_with_feed(FeedMode::Push).await;
        assert_eq!(push_lines, expected);
        assert_eq!(push_summary.changes, 3);
        assert!(!push_summary.quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_back_and_quit() {
        let mut session = LyricsSession::new();
        session.install(LyricsParser::new().parse_str("[00:00.000]A\n[00:05.000]B\n[00:10.000]C"));
        let player = Arc::new(SimulatedPlayer::new(7.0, None));
        let (sample_tx, mut sample_rx) = mpsc::channel(16);
        let (command_tx, mut command_rx) = mpsc::channel(4);

        let clock: Arc<dyn PlaybackClock> = player.clone();
        spawn_poll_feed(clock, Duration::from_millis(100), sample_tx);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            command_tx.send(PlayerCommand::SeekBy(-5.0)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(250)).await;
            command_tx.send(PlayerCommand::TogglePause).await.unwrap();
            tokio::time::sleep(Duration::from_millis(250)).await;
            command_tx.send(PlayerCommand::Quit).await.unwrap();
        });

        // Paused player: the position only moves through seeks.
        let mut presenter = PlainPresenter::text(Vec::new());
        let summary = follow_lyrics(
            &mut session,
            &player,
            &mut sample_rx,
            &mut command_rx,
            &mut presenter,
        )
        .await
        .unwrap();

        assert!(summary.quit);
        assert_eq!(
            rendered(presenter),
            vec!["[00:05.000] B", "[00:00.000] A", "-- playing --"]
        );
    }

    #[tokio::test]
    async fn test_closed_feed_ends_follow() {
        let mut session = session();
        let player = SimulatedPlayer::new(0.0, None);
        let (sample_tx, mut sample_rx) = mpsc::channel(4);
        let (_command_tx, mut command_rx) = mpsc::channel(4);

        sample_tx.send(PlaybackSample::new(1.5)).await.unwrap();
        sample_tx.send(PlaybackSample::new(1.6)).await.unwrap();
        drop(sample_tx);

        let mut presenter = PlainPresenter::text(Vec::new());
        let summary = follow_lyrics(
            &mut session,
            &player,
            &mut sample_rx,
            &mut command_rx,
            &mut presenter,
        )
        .await
        .unwrap();

        assert_eq!(summary, FollowSummary { samples: 2, changes: 1, quit: false });
        assert_eq!(rendered(presenter), vec!["[00:01.000] B"]);
    }

    #[tokio::test]
    async fn test_empty_document_renders_placeholder_once() {
        let mut session = LyricsSession::new();
        let player = SimulatedPlayer::new(4.0, None);
        let (sample_tx, mut sample_rx) = mpsc::channel(4);
        let (_command_tx, mut command_rx) = mpsc::channel(4);

        sample_tx.send(PlaybackSample::new(4.0)).await.unwrap();
        sample_tx.send(PlaybackSample::new(4.5)).await.unwrap();
        drop(sample_tx);

        let mut presenter = PlainPresenter::text(Vec::new());
        let summary = follow_lyrics(
            &mut session,
            &player,
            &mut sample_rx,
            &mut command_rx,
            &mut presenter,
        )
        .await
        .unwrap();

        assert_eq!(summary.changes, 0);
        assert_eq!(rendered(presenter), vec!["[00:04] (no lyrics)"]);
    }
}
