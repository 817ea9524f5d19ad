use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use super::{LyricLine, LyricsDocument};

// [MM:SS.ff] or [MM:SS.fff] followed by the line text
const TIME_TAG_PATTERN: &str = r"^\[([0-9]{2}):([0-9]{2})\.([0-9]{2,3})\](.*)$";

fn time_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(TIME_TAG_PATTERN).expect("valid LRC time tag pattern"))
}

/// Parser for line-oriented `[MM:SS.fff]text` lyrics.
///
/// Parsing is total: lines that do not carry a valid time tag, or whose text
/// is blank, are skipped. Nothing is sorted or de-duplicated.
pub struct LyricsParser;

impl LyricsParser {
    pub fn new() -> Self {
        LyricsParser
    }

    /// Parse optional raw lyrics text. Absent text yields an empty document.
    pub fn parse(&self, raw: Option<&str>) -> LyricsDocument {
        match raw {
            Some(text) => self.parse_str(text),
            None => LyricsDocument::empty(),
        }
    }

    pub fn parse_str(&self, raw: &str) -> LyricsDocument {
        if raw.is_empty() {
            return LyricsDocument::empty();
        }

        let mut lines = Vec::new();
        let mut skipped = 0usize;

        for physical_line in raw.split('\n') {
            match parse_line(physical_line) {
                Some(line) => lines.push(line),
                None => skipped += 1,
            }
        }

        debug!("Parsed {} timed lyric lines ({} skipped)", lines.len(), skipped);
        LyricsDocument::new(lines)
    }
}

impl Default for LyricsParser {
    fn default() -> Self {
        Self::new()
    }
}

// Whitespace plus the byte-order mark, which editors leave at the start of
// UTF-8 .lrc files.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Parse a single physical line. Surrounding whitespace (including a CRLF
/// carriage return and a leading BOM) is ignored before matching.
pub fn parse_line(line: &str) -> Option<LyricLine> {
    let captures = time_tag_regex().captures(trim_line(line))?;

    let minutes: u32 = captures[1].parse().ok()?;
    let seconds: u32 = captures[2].parse().ok()?;
    // Two or three digits, always read as milliseconds.
    let fraction: u32 = captures[3].parse().ok()?;
    let text = trim_line(&captures[4]);

    if text.is_empty() {
        return None;
    }

    let timestamp_seconds = f64::from(minutes) * 60.0 + f64::from(seconds) + f64::from(fraction) / 1000.0;
    Some(LyricLine::new(timestamp_seconds, text))
}
