//! Timed lyrics model
//!
//! - `parser`: turns raw `[MM:SS.fff]text` blobs into a `LyricsDocument`
//! - `sync`: maps a playback time onto the active line of a document

pub mod parser;
pub mod sync;

pub use parser::LyricsParser;
pub use sync::{locate_active_line, SyncCursor, SyncUpdate};

use serde::{Deserialize, Serialize};

/// One singable line with the playback time at which it starts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LyricLine {
    pub timestamp_seconds: f64,
    pub text: String,
}

impl LyricLine {
    pub fn new(timestamp_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp_seconds,
            text: text.into(),
        }
    }

    /// Render the start time as `MM:SS.fff`.
    pub fn time_tag(&self) -> String {
        let total_millis = (self.timestamp_seconds * 1000.0).round().max(0.0) as u64;
        let minutes = total_millis / 60_000;
        let seconds = (total_millis / 1000) % 60;
        let millis = total_millis % 1000;
        format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
    }
}

/// Parsed lyrics for one track, in source order.
///
/// There is no mutating API: a track change or a clear installs a whole new
/// document.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct LyricsDocument {
    lines: Vec<LyricLine>,
}

impl LyricsDocument {
    pub fn new(lines: Vec<LyricLine>) -> Self {
        Self { lines }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Start time of the last line in document order.
    pub fn last_timestamp(&self) -> Option<f64> {
        self.lines.last().map(|line| line.timestamp_seconds)
    }
}

impl From<Vec<LyricLine>> for LyricsDocument {
    fn from(lines: Vec<LyricLine>) -> Self {
        Self::new(lines)
    }
}
