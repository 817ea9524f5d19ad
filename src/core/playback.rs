//! Playback-time sources
//!
//! The synchronizer only ever sees `PlaybackSample`s arriving on one channel.
//! Whether they come from polling a clock on a fixed cadence or from the
//! player pushing every position change is decided here, by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Current playback position in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSample {
    pub current_time: f64,
}

impl PlaybackSample {
    pub fn new(current_time: f64) -> Self {
        Self { current_time }
    }
}

pub trait PlaybackClock: Send + Sync {
    fn position(&self) -> f64;
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    Poll,
    #[default]
    Push,
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedMode::Poll => f.write_str("poll"),
            FeedMode::Push => f.write_str("push"),
        }
    }
}

impl FromStr for FeedMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poll" => Ok(FeedMode::Poll),
            "push" => Ok(FeedMode::Push),
            other => Err(format!("unknown feed mode '{}', expected poll or push", other)),
        }
    }
}

#[derive(Debug)]
struct PlayerState {
    anchor_position: f64,
    anchor_instant: Instant,
    playing: bool,
}

/// Wall-clock driven stand-in for an audio player.
///
/// Position is estimated from the last anchor and the elapsed time while
/// playing, and is always kept within `[0, length]`.
#[derive(Debug)]
pub struct SimulatedPlayer {
    state: Mutex<PlayerState>,
    length: Option<f64>,
    publisher: watch::Sender<f64>,
}

impl SimulatedPlayer {
    pub fn new(start: f64, length: Option<f64>) -> Self {
        let start = clamp_position(start, length);
        let (publisher, _) = watch::channel(start);
        Self {
            state: Mutex::new(PlayerState {
                anchor_position: start,
                anchor_instant: Instant::now(),
                playing: false,
            }),
            length,
            publisher,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn estimate(&self, state: &PlayerState) -> f64 {
        let mut position = state.anchor_position;
        if state.playing {
            position += state.anchor_instant.elapsed().as_secs_f64();
        }
        clamp_position(position, self.length)
    }

    fn reanchor(&self, state: &mut PlayerState, position: f64) {
        state.anchor_position = clamp_position(position, self.length);
        state.anchor_instant = Instant::now();
    }

    pub fn length(&self) -> Option<f64> {
        self.length
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    pub fn play(&self) {
        {
            let mut state = self.lock();
            if state.playing {
                return;
            }
            let position = state.anchor_position;
            self.reanchor(&mut state, position);
            state.playing = true;
        }
        self.publish();
    }

    pub fn pause(&self) {
        {
            let mut state = self.lock();
            if !state.playing {
                return;
            }
            let position = self.estimate(&state);
            self.reanchor(&mut state, position);
            state.playing = false;
        }
        self.publish();
    }

    /// Toggle play/pause, returning whether the player is now playing.
    pub fn toggle(&self) -> bool {
        if self.is_playing() {
            self.pause();
            false
        } else {
            self.play();
            true
        }
    }

    pub fn seek(&self, position: f64) {
        {
            let mut state = self.lock();
            self.reanchor(&mut state, position);
        }
        debug!("Seeked to {:.3}s", self.position());
        self.publish();
    }

    pub fn seek_by(&self, delta: f64) {
        let target = self.position() + delta;
        self.seek(target);
    }

    /// Push the current position to every subscriber.
    pub fn publish(&self) {
        self.publisher.send_replace(self.position());
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.publisher.subscribe()
    }

    fn has_subscribers(&self) -> bool {
        !self.publisher.is_closed()
    }
}

impl PlaybackClock for SimulatedPlayer {
    fn position(&self) -> f64 {
        let state = self.lock();
        self.estimate(&state)
    }
}

fn clamp_position(position: f64, length: Option<f64>) -> f64 {
    let mut position = if position.is_finite() { position.max(0.0) } else { 0.0 };
    if let Some(length) = length {
        if length.is_finite() && position > length {
            position = length.max(0.0);
        }
    }
    position
}

/// Sample `clock` every `period` and forward the position. Stops when the
/// receiving side is dropped.
pub fn spawn_poll_feed(
    clock: Arc<dyn PlaybackClock>,
    period: Duration,
    tx: mpsc::Sender<PlaybackSample>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if tx.send(PlaybackSample::new(clock.position())).await.is_err() {
                debug!("Poll feed stopped");
                break;
            }
        }
    })
}

/// Forward every position the player publishes. Stops when either side of the
/// pipeline goes away.
pub fn spawn_push_feed(
    mut positions: watch::Receiver<f64>,
    tx: mpsc::Sender<PlaybackSample>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let current_time = *positions.borrow_and_update();
            if tx.send(PlaybackSample::new(current_time)).await.is_err() {
                break;
            }
            if positions.changed().await.is_err() {
                break;
            }
        }
        debug!("Push feed stopped");
    })
}

/// Make the player publish its position every `period` while playing, the
/// way an audio engine reports progress. Stops once nobody is subscribed.
pub fn spawn_player_driver(player: Arc<SimulatedPlayer>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while player.has_subscribers() {
            interval.tick().await;
            if player.is_playing() {
                player.publish();
            }
        }
    })
}
