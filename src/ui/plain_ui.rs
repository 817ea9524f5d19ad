use serde::Serialize;
use std::io::{self, Write};

use crate::core::lyrics::LyricsDocument;
use crate::core::source::LyricsSourceType;
use crate::ui::{format_position, Presenter};

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum PlainEvent<'a> {
    Start {
        track: &'a str,
        source: LyricsSourceType,
        lines: usize,
    },
    Line {
        index: isize,
        position: f64,
        timestamp: Option<f64>,
        text: Option<&'a str>,
    },
    Status {
        status: &'a str,
    },
}

/// Pipe- and CI-friendly output: one record per change, no ANSI codes.
pub struct PlainPresenter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> PlainPresenter<W> {
    pub fn text(out: W) -> Self {
        Self {
            out,
            format: OutputFormat::Text,
        }
    }

    pub fn json(out: W) -> Self {
        Self {
            out,
            format: OutputFormat::Json,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &PlainEvent<'_>, text: impl FnOnce() -> String) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)?;
            }
            OutputFormat::Text => writeln!(self.out, "{}", text())?,
        }
        self.out.flush()
    }
}

impl<W: Write> Presenter for PlainPresenter<W> {
    fn start(&mut self, track: &str, document: &LyricsDocument, source: LyricsSourceType) -> io::Result<()> {
        let event = PlainEvent::Start {
            track,
            source,
            lines: document.len(),
        };
        self.emit(&event, || {
            format!("# {} ({} lines, source: {})", track, document.len(), source)
        })
    }

    fn show_active_line(&mut self, document: &LyricsDocument, index: Option<usize>, current_time: f64) -> io::Result<()> {
        let line = index.and_then(|i| document.get(i));
        let event = PlainEvent::Line {
            index: index.map_or(-1, |i| i as isize),
            position: current_time,
            timestamp: line.map(|l| l.timestamp_seconds),
            text: line.map(|l| l.text.as_str()),
        };
        self.emit(&event, || match line {
            Some(line) => format!("[{}] {}", line.time_tag(), line.text),
            None => format!("[{}] (no lyrics)", format_position(current_time)),
        })
    }

    fn set_status(&mut self, status: &str) -> io::Result<()> {
        self.emit(&PlainEvent::Status { status }, || format!("-- {} --", status))
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
