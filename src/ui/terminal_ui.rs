use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::ops::Range;

use crate::core::lyrics::LyricsDocument;
use crate::core::source::LyricsSourceType;
use crate::ui::{format_position, Presenter};

const ACCENT: Color = Color::Rgb { r: 255, g: 165, b: 0 };
const HEADER_ROWS: u16 = 2;

/// Interactive renderer: keeps a window of lines around the active one on
/// screen and redraws it on every change.
///
/// Every row is positioned explicitly, so output stays intact while the
/// terminal is in raw mode.
pub struct TerminalPresenter<W: Write> {
    out: W,
    context_lines: usize,
    status: String,
    initialized: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, context_lines: usize) -> Self {
        Self {
            out,
            context_lines,
            status: String::new(),
            initialized: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn status_row(&self) -> u16 {
        HEADER_ROWS + (self.context_lines as u16) * 2 + 2
    }

    fn draw_status(&mut self, position: Option<f64>) -> io::Result<()> {
        let row = self.status_row();
        queue!(
            self.out,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::DarkGrey)
        )?;
        if let Some(position) = position {
            queue!(self.out, Print(format!("{}  ", format_position(position))))?;
        }
        queue!(
            self.out,
            Print(&self.status),
            Print("   space: pause  ←/→: seek  q: quit"),
            ResetColor
        )?;
        Ok(())
    }
}

/// Indices of the lines shown around `index`.
pub fn visible_window(len: usize, index: usize, context: usize) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }
    let index = index.min(len - 1);
    let start = index.saturating_sub(context);
    let end = (index + context + 1).min(len);
    start..end
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn start(&mut self, track: &str, document: &LyricsDocument, source: LyricsSourceType) -> io::Result<()> {
        if !self.initialized {
            queue!(self.out, cursor::Hide)?;
            self.initialized = true;
        }
        queue!(
            self.out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            SetForegroundColor(ACCENT),
            SetAttribute(Attribute::Bold),
            Print(track),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("  ({} lines, source: {})", document.len(), source)),
            ResetColor
        )?;
        self.out.flush()
    }

    fn show_active_line(&mut self, document: &LyricsDocument, index: Option<usize>, current_time: f64) -> io::Result<()> {
        let first_row = HEADER_ROWS;
        queue!(
            self.out,
            cursor::MoveTo(0, first_row),
            terminal::Clear(ClearType::FromCursorDown)
        )?;

        match index {
            Some(active) if !document.is_empty() => {
                // Keep the active line on the same row as long as there is
                // enough context above it.
                let window = visible_window(document.len(), active, self.context_lines);
                let above = active.saturating_sub(window.start);
                let offset = self.context_lines.saturating_sub(above) as u16;

                for (row, line_index) in window.enumerate() {
                    let Some(line) = document.get(line_index) else {
                        continue;
                    };
                    queue!(self.out, cursor::MoveTo(2, first_row + offset + row as u16))?;
                    if line_index == active {
                        queue!(
                            self.out,
                            SetForegroundColor(ACCENT),
                            SetAttribute(Attribute::Bold),
                            Print(format!("▶ {}", line.text)),
                            SetAttribute(Attribute::Reset),
                            ResetColor
                        )?;
                    } else {
                        queue!(
                            self.out,
                            SetForegroundColor(Color::DarkGrey),
                            Print(format!("  {}", line.text)),
                            ResetColor
                        )?;
                    }
                }
            }
            _ => {
                queue!(
                    self.out,
                    cursor::MoveTo(2, first_row + self.context_lines as u16),
                    SetForegroundColor(Color::DarkGrey),
                    Print("No synced lyrics for this track"),
                    ResetColor
                )?;
            }
        }

        self.draw_status(Some(current_time))?;
        self.out.flush()
    }

    fn set_status(&mut self, status: &str) -> io::Result<()> {
        self.status = status.to_string();
        self.draw_status(None)?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        let row = self.status_row() + 1;
        queue!(self.out, cursor::MoveTo(0, row), cursor::Show, ResetColor, Print("\r\n"))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lyrics::LyricsParser;

    #[test]
    fn test_visible_window() {
        assert_eq!(visible_window(0, 0, 3), 0..0);
        assert_eq!(visible_window(10, 0, 3), 0..4);
        assert_eq!(visible_window(10, 5, 3), 2..9);
        assert_eq!(visible_window(10, 9, 3), 6..10);
        assert_eq!(visible_window(10, 4, 0), 4..5);
        assert_eq!(visible_window(3, 7, 1), 1..3);
    }

    #[test]
    fn test_renders_active_line_with_context() {
        let doc = LyricsParser::new().parse_str(
            "[00:00.000]first\n[00:01.000]second\n[00:02.000]third\n[00:03.000]fourth",
        );
        let mut presenter = TerminalPresenter::new(Vec::new(), 1);
        presenter.start("song.flac", &doc, LyricsSourceType::File).unwrap();
        presenter.show_active_line(&doc, Some(1), 1.5).unwrap();
        presenter.finish().unwrap();

        let output = String::from_utf8_lossy(&presenter.into_inner()).into_owned();
        assert!(output.contains("song.flac"));
        assert!(output.contains("  first"));
        assert!(output.contains("▶ second"));
        assert!(output.contains("  third"));
        assert!(!output.contains("fourth"));
    }

    #[test]
    fn test_renders_placeholder_without_lyrics() {
        let doc = LyricsDocument::empty();
        let mut presenter = TerminalPresenter::new(Vec::new(), 2);
        presenter.show_active_line(&doc, None, 0.0).unwrap();
        presenter.set_status("paused").unwrap();

        let output = String::from_utf8_lossy(&presenter.into_inner()).into_owned();
        assert!(output.contains("No synced lyrics"));
        assert!(output.contains("paused"));
    }
}
