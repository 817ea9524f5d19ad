use async_trait::async_trait;
use lofty::file::TaggedFileExt;
use lofty::read_from_path;
use lofty::tag::ItemKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, SourceError};

/// Where a lyrics text was found.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LyricsSourceType {
    None,
    File,
    Embedded,
}

impl fmt::Display for LyricsSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LyricsSourceType::None => "none",
            LyricsSourceType::File => "file",
            LyricsSourceType::Embedded => "embedded",
        };
        f.write_str(name)
    }
}

/// Raw lyrics text for one track, as delivered by a source.
#[derive(Clone, Debug, PartialEq)]
pub struct LyricsModel {
    pub track_path: PathBuf,
    pub text: String,
    pub source_type: LyricsSourceType,
}

/// Supplies raw lyrics text for a track. Fetching, caching and source
/// selection all live behind this trait.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    async fn get_lyrics(&self, track: &Path) -> Result<Option<LyricsModel>>;
}

/// Reads lyrics from disk: a sidecar `.lrc` next to the audio file, or the
/// lyrics frame embedded in the file's primary tag.
pub struct LocalLyricsSource {
    prefer_embedded: bool,
}

impl LocalLyricsSource {
    pub fn new(prefer_embedded: bool) -> Self {
        Self { prefer_embedded }
    }

    fn read_lyrics_file(&self, track: &Path, path: &Path) -> Result<Option<LyricsModel>> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!("Loaded lyrics file: {}", path.display());
                Ok(Some(LyricsModel {
                    track_path: track.to_path_buf(),
                    text,
                    source_type: LyricsSourceType::File,
                }))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SourceError::Read {
                path: path.to_path_buf(),
                source: e,
            }
            .into()),
        }
    }

    fn read_embedded(&self, track: &Path) -> Result<Option<LyricsModel>> {
        if !track.is_file() {
            return Ok(None);
        }

        let tagged_file = read_from_path(track).map_err(|e| SourceError::Tags {
            path: track.to_path_buf(),
            source: e,
        })?;

        let text = tagged_file
            .primary_tag()
            .and_then(|tag| tag.get_string(&ItemKey::Lyrics))
            .map(|s| s.to_string());

        Ok(text.map(|text| {
            debug!("Loaded embedded lyrics: {}", track.display());
            LyricsModel {
                track_path: track.to_path_buf(),
                text,
                source_type: LyricsSourceType::Embedded,
            }
        }))
    }
}

impl Default for LocalLyricsSource {
    fn default() -> Self {
        Self::new(false)
    }
}

#[async_trait]
impl LyricsSource for LocalLyricsSource {
    async fn get_lyrics(&self, track: &Path) -> Result<Option<LyricsModel>> {
        if is_lyrics_file(track) {
            return self.read_lyrics_file(track, track);
        }

        let sidecar = build_lrc_path(track)?;

        let found = if self.prefer_embedded {
            first_available(
                self.read_embedded(track),
                || self.read_lyrics_file(track, &sidecar),
            )
        } else {
            first_available(
                self.read_lyrics_file(track, &sidecar),
                || self.read_embedded(track),
            )
        };

        if found.is_none() {
            debug!("No lyrics found for: {}", track.display());
        }
        Ok(found)
    }
}

// Failed candidates are logged and the next one is tried.
fn first_available<F>(first: Result<Option<LyricsModel>>, second: F) -> Option<LyricsModel>
where
    F: FnOnce() -> Result<Option<LyricsModel>>,
{
    match first {
        Ok(Some(model)) => return Some(model),
        Ok(None) => {}
        Err(e) => warn!("Lyrics candidate failed: {}", e),
    }

    match second() {
        Ok(found) => found,
        Err(e) => {
            warn!("Lyrics candidate failed: {}", e);
            None
        }
    }
}

fn is_lyrics_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "lrc" | "txt"))
        .unwrap_or(false)
}

/// `<dir>/<stem>.lrc` for a track at `<dir>/<stem>.<ext>`.
pub fn build_lrc_path(track: &Path) -> Result<PathBuf> {
    let invalid = || SourceError::InvalidTrackPath {
        path: track.to_path_buf(),
    };
    let parent = track.parent().ok_or_else(invalid)?;
    let stem = track.file_stem().ok_or_else(invalid)?;

    let mut file_name = stem.to_os_string();
    file_name.push(".lrc");
    Ok(parent.join(file_name))
}
