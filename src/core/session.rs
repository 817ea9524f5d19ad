use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::lyrics::{locate_active_line, LyricLine, LyricsDocument, LyricsParser, SyncCursor, SyncUpdate};
use crate::core::source::{LyricsSource, LyricsSourceType};

/// Lyrics state for one playback session: the installed document, the
/// cursor into it, and which track it belongs to.
///
/// Time samples for a session must be fed sequentially; the cursor update is
/// a plain read-modify-write.
#[derive(Debug, Default)]
pub struct LyricsSession {
    document: Arc<LyricsDocument>,
    cursor: SyncCursor,
    track_path: Option<PathBuf>,
    source_type: Option<LyricsSourceType>,
    busy: Arc<AtomicBool>,
}

impl LyricsSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &Arc<LyricsDocument> {
        &self.document
    }

    pub fn cursor(&self) -> SyncCursor {
        self.cursor
    }

    pub fn track_path(&self) -> Option<&Path> {
        self.track_path.as_deref()
    }

    /// Where the installed lyrics came from, if a source delivered any.
    pub fn source_type(&self) -> LyricsSourceType {
        self.source_type.unwrap_or(LyricsSourceType::None)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Shared flag that reads `true` while `load_track` waits on its source.
    /// Renderers hold a clone to show a loading state.
    pub fn busy_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.busy)
    }

    /// Replace the document and forget the active line.
    pub fn install(&mut self, document: LyricsDocument) {
        debug!("Installing lyrics document with {} lines", document.len());
        self.document = Arc::new(document);
        self.cursor.reset();
    }

    /// Drop the lyrics and the track identity.
    pub fn clear(&mut self) {
        self.install(LyricsDocument::empty());
        self.track_path = None;
        self.source_type = None;
    }

    /// Feed one playback-time sample.
    pub fn advance(&mut self, current_time: f64) -> SyncUpdate {
        locate_active_line(&self.document, current_time, &mut self.cursor)
    }

    pub fn active_line(&self) -> Option<&LyricLine> {
        self.cursor
            .active_index()
            .and_then(|index| self.document.get(index))
    }

    /// Load lyrics for `track`, or clear when there is no track.
    ///
    /// Reloading the track that is already loaded is a no-op. A failing
    /// source leaves the session with an empty document and no track
    /// identity, so the next load of that track fetches again.
    pub async fn load_track<S>(&mut self, source: &S, track: Option<&Path>)
    where
        S: LyricsSource + ?Sized,
    {
        let Some(track) = track else {
            self.clear();
            return;
        };

        if self.track_path.as_deref() == Some(track) && self.source_type.is_some() {
            debug!("Lyrics already loaded for: {}", track.display());
            return;
        }

        let fetched = {
            let _busy = BusyGuard::new(&self.busy);
            source.get_lyrics(track).await
        };

        let model = match fetched {
            Ok(model) => model,
            Err(e) => {
                warn!("Failed to load lyrics for {}: {}", track.display(), e);
                self.clear();
                return;
            }
        };

        self.track_path = Some(track.to_path_buf());
        self.source_type = Some(
            model
                .as_ref()
                .map(|m| m.source_type)
                .unwrap_or(LyricsSourceType::None),
        );

        let document = LyricsParser::new().parse(model.as_ref().map(|m| m.text.as_str()));
        info!(
            "Loaded {} lyric lines for {} (source: {})",
            document.len(),
            track.display(),
            self.source_type()
        );
        self.install(document);
    }
}

// Resets the busy flag even when the load future is dropped mid-fetch.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::LyricsModel;
    use crate::error::{Result, SourceError};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct CountingSource {
        calls: AtomicUsize,
        text: Option<&'static str>,
    }

    impl CountingSource {
        fn new(text: Option<&'static str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                text,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LyricsSource for CountingSource {
        async fn get_lyrics(&self, track: &Path) -> Result<Option<LyricsModel>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.map(|text| LyricsModel {
                track_path: track.to_path_buf(),
                text: text.to_string(),
                source_type: LyricsSourceType::File,
            }))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl LyricsSource for FailingSource {
        async fn get_lyrics(&self, track: &Path) -> Result<Option<LyricsModel>> {
            Err(SourceError::InvalidTrackPath {
                path: track.to_path_buf(),
            }
            .into())
        }
    }

    /// Errors on the first call, then serves `LRC`.
    struct FlakySource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LyricsSource for FlakySource {
        async fn get_lyrics(&self, track: &Path) -> Result<Option<LyricsModel>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(SourceError::InvalidTrackPath {
                    path: track.to_path_buf(),
                }
                .into());
            }
            Ok(Some(LyricsModel {
                track_path: track.to_path_buf(),
                text: LRC.to_string(),
                source_type: LyricsSourceType::Embedded,
            }))
        }
    }

    /// Records what the busy flag read while the fetch was in flight.
    struct ObservingSource {
        busy: Arc<AtomicBool>,
        seen: AtomicBool,
    }

    #[async_trait]
    impl LyricsSource for ObservingSource {
        async fn get_lyrics(&self, _track: &Path) -> Result<Option<LyricsModel>> {
            self.seen.store(self.busy.load(Ordering::SeqCst), Ordering::SeqCst);
            Ok(None)
        }
    }

    const LRC: &str = "[00:00.000]A\n[00:05.000]B\n[00:10.000]C";

    #[tokio::test]
    async fn test_load_track_parses_and_resets_cursor() {
        let source = CountingSource::new(Some(LRC));
        let mut session = LyricsSession::new();

        session.load_track(&source, Some(Path::new("/m/a.mp3"))).await;
        assert_eq!(session.document().len(), 3);
        assert_eq!(session.cursor().as_sentinel(), -1);
        assert_eq!(session.source_type(), LyricsSourceType::File);

        let update = session.advance(6.0);
        assert_eq!(update.as_sentinel(), 1);
        assert!(update.changed);
        assert_eq!(session.active_line().map(|l| l.text.as_str()), Some("B"));
    }

    #[tokio::test]
    async fn test_same_track_is_not_refetched() {
        let source = CountingSource::new(Some(LRC));
        let mut session = LyricsSession::new();
        let track = Path::new("/m/a.mp3");

        session.load_track(&source, Some(track)).await;
        session.advance(11.0);
        session.load_track(&source, Some(track)).await;

        assert_eq!(source.calls(), 1);
        // Cursor survives a no-op reload.
        assert_eq!(session.cursor().as_sentinel(), 2);

        session.load_track(&source, Some(Path::new("/m/b.mp3"))).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(session.cursor().as_sentinel(), -1);
    }

    #[tokio::test]
    async fn test_no_track_clears() {
        let source = CountingSource::new(Some(LRC));
        let mut session = LyricsSession::new();

        session.load_track(&source, Some(Path::new("/m/a.mp3"))).await;
        session.advance(1.0);
        session.load_track(&source, None).await;

        assert!(session.document().is_empty());
        assert!(session.track_path().is_none());
        assert_eq!(session.source_type(), LyricsSourceType::None);
        let update = session.advance(1.0);
        assert_eq!(update.as_sentinel(), -1);
        assert!(!update.changed);
    }

    #[tokio::test]
    async fn test_missing_lyrics_gives_empty_document() {
        let source = CountingSource::new(None);
        let mut session = LyricsSession::new();
        let track = Path::new("/m/instrumental.flac");

        session.load_track(&source, Some(track)).await;
        assert!(session.document().is_empty());
        assert_eq!(session.track_path(), Some(track));

        // Absent lyrics are remembered too, so the same track is not refetched.
        session.load_track(&source, Some(track)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_source_degrades_to_empty() {
        let mut session = LyricsSession::new();
        session.install(LyricsParser::new().parse_str(LRC));

        session.load_track(&FailingSource, Some(Path::new("/m/x.mp3"))).await;
        assert!(session.document().is_empty());
        assert_eq!(session.advance(3.0).as_sentinel(), -1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried() {
        let source = FlakySource {
            calls: AtomicUsize::new(0),
        };
        let mut session = LyricsSession::new();
        let track = Path::new("/m/a.mp3");

        session.load_track(&source, Some(track)).await;
        assert!(session.document().is_empty());
        assert!(session.track_path().is_none());

        session.load_track(&source, Some(track)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.document().len(), 3);
        assert_eq!(session.source_type(), LyricsSourceType::Embedded);
    }

    #[tokio::test]
    async fn test_busy_while_fetching() {
        let mut session = LyricsSession::new();
        let source = ObservingSource {
            busy: session.busy_handle(),
            seen: AtomicBool::new(false),
        };

        assert!(!session.is_busy());
        session.load_track(&source, Some(Path::new("/m/a.mp3"))).await;
        assert!(source.seen.load(Ordering::SeqCst));
        assert!(!session.is_busy());

        session.load_track(&FailingSource, Some(Path::new("/m/b.mp3"))).await;
        assert!(!session.is_busy());
    }

    #[test]
    fn test_install_resets_cursor() {
        let mut session = LyricsSession::new();
        session.install(LyricsParser::new().parse_str(LRC));
        session.advance(12.0);
        assert_eq!(session.cursor().as_sentinel(), 2);

        session.install(LyricsParser::new().parse_str("[00:00.000]only"));
        assert_eq!(session.cursor().as_sentinel(), -1);
        let update = session.advance(12.0);
        assert_eq!(update.as_sentinel(), 0);
        assert!(update.changed);
    }
}
