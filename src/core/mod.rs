//! Core functionality modules
//!
//! - `lyrics`: timed lyrics parsing and active-line synchronization
//! - `session`: per-playback document, cursor and track identity
//! - `source`: where raw lyrics text comes from
//! - `playback`: playback-time sources (poll and push)

pub mod lyrics;
pub mod playback;
pub mod session;
pub mod source;

// Re-export commonly used types for convenience
pub use lyrics::{LyricLine, LyricsDocument, LyricsParser, SyncCursor, SyncUpdate};
pub use session::LyricsSession;
pub use source::{LocalLyricsSource, LyricsModel, LyricsSource, LyricsSourceType};
