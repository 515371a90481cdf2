//! Terminal UI wrapper.
//!
//! This module provides [`Tui`], a wrapper around ratatui's Terminal that
//! handles the event loop, raw mode, and the alternate screen. Frames are
//! drawn on stderr so stdout stays free for the picker's JSON output.

use std::io::Stderr;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crossterm::cursor;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use futures::{FutureExt, StreamExt};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const GRACEFUL_SHUTDOWN_TIMEOUT_MS: u64 = 500;
const FORCEFUL_SHUTDOWN_TIMEOUT_MS: u64 = 2000;

pub type Backend = CrosstermBackend<Stderr>;

#[derive(Clone, Debug)]
pub enum Event {
    Init,
    Quit,
    Suspend,
    Error(String),
    Render,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Terminal UI wrapper.
///
/// Manages the terminal state (raw mode, alternate screen) and provides
/// an async event stream.
pub struct Tui {
    terminal: Terminal<Backend>,
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
    event_rx: UnboundedReceiver<Event>,
    event_tx: UnboundedSender<Event>,
    frame_rate: f64,
    entered: bool,
}

impl Tui {
    /// Create a new TUI rendering at `frame_rate` frames per second.
    ///
    /// Nothing is shown until [`Tui::enter`] is called.
    pub fn new(frame_rate: f64) -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: Terminal::new(Backend::new(std::io::stderr()))?,
            task: tokio::spawn(async {}),
            cancellation_token: CancellationToken::new(),
            event_rx,
            event_tx,
            frame_rate,
            entered: false,
        })
    }

    /// Enter the TUI (raw mode, alternate screen).
    pub fn enter(&mut self) -> color_eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnterAlternateScreen, cursor::Hide)?;
        self.entered = true;
        self.terminal.clear()?;
        self.start();
        Ok(())
    }

    /// Exit the TUI (restore terminal state). Safe to call more than once.
    pub fn exit(&mut self) -> color_eyre::Result<()> {
        self.stop()?;
        if self.entered {
            self.entered = false;
            self.flush()?;
            crossterm::execute!(std::io::stderr(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    /// Suspend the TUI (for Ctrl+Z handling) and resume once the shell
    /// brings the process back to the foreground.
    pub fn suspend(&mut self) -> color_eyre::Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::SIGTSTP)?;
        self.enter()
    }

    /// Get the next event from the event stream.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    fn start(&mut self) {
        self.cancel();
        self.cancellation_token = CancellationToken::new();
        let event_loop = Self::event_loop(
            self.event_tx.clone(),
            self.cancellation_token.clone(),
            self.frame_rate,
        );
        self.task = tokio::spawn(event_loop);
    }

    fn stop(&mut self) -> color_eyre::Result<()> {
        self.cancel();
        let mut shutdown_counter = 0;
        while !self.task.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
            shutdown_counter += 1;
            if shutdown_counter >= GRACEFUL_SHUTDOWN_TIMEOUT_MS {
                self.task.abort();
            }
            if shutdown_counter >= FORCEFUL_SHUTDOWN_TIMEOUT_MS {
                return Err(color_eyre::eyre::eyre!("Failed to stop TUI task"));
            }
        }
        Ok(())
    }

    fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    fn translate_key(key: KeyEvent) -> Option<Event> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return Some(Event::Quit),
                KeyCode::Char('z') => return Some(Event::Suspend),
                _ => {}
            }
        }
        Some(Event::Key(key))
    }

    async fn event_loop(
        event_tx: UnboundedSender<Event>,
        cancellation_token: CancellationToken,
        frame_rate: f64,
    ) {
        let mut event_stream = EventStream::new();
        let mut frame_interval = interval(Duration::from_secs_f64(1.0 / frame_rate));

        // SIGTERM closes the dialog like Ctrl+C does.
        #[cfg(unix)]
        {
            let event_tx = event_tx.clone();
            let cancellation_token = cancellation_token.clone();
            tokio::spawn(async move {
                let Ok(mut sigterm) =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                else {
                    warn!("Failed to install SIGTERM handler");
                    return;
                };
                tokio::select! {
                    _ = cancellation_token.cancelled() => {}
                    _ = sigterm.recv() => {
                        let _ = event_tx.send(Event::Quit);
                    }
                }
            });
        }

        if event_tx.send(Event::Init).is_err() {
            return;
        }

        loop {
            let event = tokio::select! {
                _ = cancellation_token.cancelled() => {
                    break;
                }
                _ = frame_interval.tick() => Event::Render,
                crossterm_event = event_stream.next().fuse() => {
                    match crossterm_event {
                        Some(Ok(CrosstermEvent::Key(key))) => match Self::translate_key(key) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Ok(CrosstermEvent::Resize(width, height))) => Event::Resize(width, height),
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => Event::Error(e.to_string()),
                        None => break,
                    }
                }
            };
            if event_tx.send(event).is_err() {
                break;
            }
        }
        debug!("TUI event loop stopped");
        cancellation_token.cancel();
    }
}

impl Deref for Tui {
    type Target = Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            warn!("Failed to restore terminal: {err:#}");
        }
    }
}
