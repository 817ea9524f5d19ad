//! Time-synchronized lyrics: parse `[MM:SS.fff]` tagged text and follow the
//! active line as a playback position advances, seeks or the track changes.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod signal_handler;
pub mod ui;
pub mod utils;

pub use crate::core::lyrics::{locate_active_line, LyricLine, LyricsDocument, LyricsParser, SyncCursor, SyncUpdate};
pub use crate::core::session::LyricsSession;
pub use error::{LrcSyncError, Result};
