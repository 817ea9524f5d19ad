use super::LyricsDocument;

/// Which line was last reported active for one playback session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCursor {
    active_index: Option<usize>,
}

impl SyncCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Active index with `-1` standing for "no active line".
    pub fn as_sentinel(&self) -> isize {
        to_sentinel(self.active_index)
    }

    /// Forget the active line. Must be called whenever a new document is
    /// installed.
    pub fn reset(&mut self) {
        self.active_index = None;
    }
}

/// Result of one synchronization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncUpdate {
    pub index: Option<usize>,
    pub changed: bool,
}

impl SyncUpdate {
    pub fn as_sentinel(&self) -> isize {
        to_sentinel(self.index)
    }
}

fn to_sentinel(index: Option<usize>) -> isize {
    index.map_or(-1, |i| i as isize)
}

/// Locate the line active at `current_time` and record it in `cursor`.
///
/// The active line is the one just before the first line (in document order)
/// that starts strictly after `current_time`. Times before the first line
/// clamp to index 0, times at or past every line select the last one. The
/// result is recomputed from scratch, so seeks in either direction work.
pub fn locate_active_line(
    document: &LyricsDocument,
    current_time: f64,
    cursor: &mut SyncCursor,
) -> SyncUpdate {
    let lines = document.lines();

    if lines.is_empty() {
        let changed = cursor.active_index.is_some();
        cursor.active_index = None;
        return SyncUpdate { index: None, changed };
    }

    let candidate = match lines
        .iter()
        .position(|line| line.timestamp_seconds > current_time)
    {
        Some(next) => next.saturating_sub(1),
        None => lines.len() - 1,
    };

    let changed = cursor.active_index != Some(candidate);
    if changed {
        cursor.active_index = Some(candidate);
    }

    SyncUpdate {
        index: Some(candidate),
        changed,
    }
}
