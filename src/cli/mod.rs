//! Command Line Interface module
//!
//! - `core`: inspecting lyrics (parse, locate)
//! - `operations`: following lyrics during playback (play)
//! - `management`: configuration

pub mod core;
pub mod operations;
pub mod management;

use anyhow::Result;
use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::core::lyrics::LyricsParser;
use crate::core::session::LyricsSession;
use crate::core::source::LocalLyricsSource;

/// Build a session for a lyrics file, an audio file, or `-` for stdin.
pub async fn load_session(path: &Path, config: &Config) -> Result<LyricsSession> {
    let mut session = LyricsSession::new();

    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        session.install(LyricsParser::new().parse_str(&raw));
        return Ok(session);
    }

    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = LocalLyricsSource::new(config.prefer_embedded_lyrics);
    session.load_track(&source, Some(path)).await;
    Ok(session)
}
