use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Seconds skipped by one arrow key press.
pub const SEEK_STEP_SECONDS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    TogglePause,
    SeekBy(f64),
    Quit,
}

/// Turns OS signals and key presses into `PlayerCommand`s.
#[derive(Clone)]
pub struct SignalHandler {
    shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Stop the monitoring tasks.
    pub fn shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::Release);
    }

    /// Send `Quit` on Ctrl-C or SIGTERM.
    pub fn start_signal_monitoring(&self, tx: mpsc::Sender<PlayerCommand>) -> JoinHandle<()> {
        let shutdown = Arc::clone(&self.shutdown_requested);

        tokio::spawn(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl-C");
                }
                _ = terminate() => {
                    warn!("Received SIGTERM signal");
                }
            }
            shutdown.store(true, Ordering::Release);
            let _ = tx.send(PlayerCommand::Quit).await;
        })
    }

    /// Read keys in raw mode until shutdown. Raw mode swallows Ctrl-C as a
    /// signal, so it is mapped to `Quit` here as well.
    pub fn start_input_monitoring(&self, tx: mpsc::Sender<PlayerCommand>) -> JoinHandle<()> {
        let shutdown = Arc::clone(&self.shutdown_requested);

        tokio::task::spawn_blocking(move || {
            if let Err(e) = enable_raw_mode() {
                warn!("Failed to enable raw mode: {}", e);
                return;
            }

            while !shutdown.load(Ordering::Acquire) {
                if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                    continue;
                }

                let command = match event::read() {
                    Ok(Event::Key(key)) => map_key(key),
                    Ok(_) => None,
                    Err(_) => None,
                };

                if let Some(command) = command {
                    if tx.blocking_send(command).is_err() || command == PlayerCommand::Quit {
                        break;
                    }
                }
            }

            let _ = disable_raw_mode();
        })
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to create SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Key bindings for the `play` command.
pub fn map_key(key: KeyEvent) -> Option<PlayerCommand> {
    // Only process key presses, not releases
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char(' '), _) => Some(PlayerCommand::TogglePause),
        (KeyCode::Left, _) => Some(PlayerCommand::SeekBy(-SEEK_STEP_SECONDS)),
        (KeyCode::Right, _) => Some(PlayerCommand::SeekBy(SEEK_STEP_SECONDS)),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(PlayerCommand::Quit),
        (KeyCode::Char('q'), _) | (KeyCode::Char('Q'), _) | (KeyCode::Esc, _) => Some(PlayerCommand::Quit),
        _ => None,
    }
}
