pub mod plain_ui;
pub mod terminal_ui;

use std::io;

use crate::core::lyrics::LyricsDocument;
use crate::core::source::LyricsSourceType;

/// Detect the UI mode based on environment
#[derive(Debug, Clone, PartialEq)]
pub enum UiMode {
    Plain,     // Line-per-change output for pipes, containers and CI
    Terminal,  // Redrawn lyrics window for interactive terminals
}

impl UiMode {
    pub fn detect() -> Self {
        use tracing::debug;

        // Allow forcing the terminal renderer for testing
        if std::env::var("LRCSYNC_FORCE_TERMINAL_UI").is_ok() {
            debug!("UI Mode: Terminal (forced by LRCSYNC_FORCE_TERMINAL_UI)");
            return UiMode::Terminal;
        }

        let has_docker = std::env::var("DOCKER").is_ok();
        let has_ci = std::env::var("CI").is_ok();
        let is_tty = atty::is(atty::Stream::Stdout);

        debug!("UI Mode detection - DOCKER: {}, CI: {}, TTY: {}", has_docker, has_ci, is_tty);

        if has_docker || has_ci || !is_tty {
            UiMode::Plain
        } else {
            UiMode::Terminal
        }
    }
}

/// Consumer of synchronization results.
///
/// `show_active_line` is only called when the active line actually changed.
pub trait Presenter {
    /// A new document was installed for `track`.
    fn start(&mut self, track: &str, document: &LyricsDocument, source: LyricsSourceType) -> io::Result<()>;

    fn show_active_line(&mut self, document: &LyricsDocument, index: Option<usize>, current_time: f64) -> io::Result<()>;

    /// Player state such as "paused" or "playing".
    fn set_status(&mut self, _status: &str) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()>;
}

/// Factory function to create the appropriate presenter
pub fn create_presenter(json: bool, context_lines: usize) -> Box<dyn Presenter + Send> {
    if json {
        return Box::new(plain_ui::PlainPresenter::json(io::stdout()));
    }

    match UiMode::detect() {
        UiMode::Plain => Box::new(plain_ui::PlainPresenter::text(io::stdout())),
        UiMode::Terminal => Box::new(terminal_ui::TerminalPresenter::new(io::stdout(), context_lines)),
    }
}

/// Format seconds as `MM:SS`
pub fn format_position(seconds: f64) -> String {
    let total_secs = if seconds.is_finite() { seconds.max(0.0) as u64 } else { 0 };
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
