//! Screen-share source picker.
//!
//! [`show_selection_dialog`] runs one session: fetch sources, show the
//! dialog on a [`DialogHost`], and resolve exactly once with the user's
//! [`SelectionResult`] or `None`.

mod dialog;
mod preset;
mod provider;
mod session;
mod source;
mod state;

use std::sync::Arc;

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use tracing::{debug, info, warn};

use crate::config::KeyResolver;

pub use dialog::SourcePickerDialog;
pub use preset::Quality;
pub use provider::{FileSourceProvider, SourceProvider};
use session::{CancelReason, Session};
pub use state::SelectionResult;
use state::SelectionState;

/// Input delivered to a session by its host.
#[derive(Debug, Clone)]
pub enum HostEvent {
    Key(KeyEvent),
    /// The host wants a fresh frame.
    Render,
    /// The host can no longer show the dialog.
    Closed,
}

/// Presentation surface for the picker dialog.
#[async_trait]
pub trait DialogHost: Send {
    /// Make the dialog visible.
    fn attach(&mut self) -> color_eyre::Result<()>;

    /// Wait for the next input. `None` means the host has no more input.
    async fn next_event(&mut self) -> Option<HostEvent>;

    /// Draw the dialog.
    fn draw(&mut self, dialog: &mut SourcePickerDialog) -> color_eyre::Result<()>;

    /// Remove everything the dialog put on screen.
    fn detach(&mut self) -> color_eyre::Result<()>;
}

/// Initial choices for a new session.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickerOptions {
    pub capture_audio: bool,
    pub quality: Quality,
}

/// Open one picker session and wait for its outcome.
///
/// Resolves to `None` when the user cancels, presses Escape, the host goes
/// away, or the provider fails to enumerate sources. Provider failures are
/// logged; the dialog is never attached in that case.
pub async fn show_selection_dialog(
    provider: &dyn SourceProvider,
    host: &mut dyn DialogHost,
    resolver: Arc<KeyResolver>,
    options: PickerOptions,
) -> Option<SelectionResult> {
    let sources = match provider.sources().await {
        Ok(sources) => sources,
        Err(err) => {
            warn!("Failed to enumerate capture sources: {err:#}");
            return None;
        }
    };
    info!("Opening picker with {} sources", sources.len());

    let state = SelectionState::new(options.capture_audio, options.quality);
    let (mut session, outcome) = Session::open(SourcePickerDialog::new(sources, state, resolver));

    match host.attach() {
        Ok(()) => run_session(&mut session, host).await,
        Err(err) => {
            warn!("Failed to show picker: {err:#}");
            session.cancel(CancelReason::HostClosed);
        }
    }

    if let Err(err) = host.detach() {
        warn!("Failed to tear down picker: {err:#}");
    }
    drop(session);

    outcome.await.unwrap_or_default()
}

async fn run_session(session: &mut Session, host: &mut dyn DialogHost) {
    redraw(session, host);
    while !session.is_settled() {
        match host.next_event().await {
            Some(HostEvent::Key(key)) => {
                session.handle_key(key);
                if !session.is_settled() {
                    redraw(session, host);
                }
            }
            Some(HostEvent::Render) => redraw(session, host),
            Some(HostEvent::Closed) | None => {
                debug!("Host closed while picker was open");
                session.cancel(CancelReason::HostClosed);
            }
        }
    }
}

fn redraw(session: &mut Session, host: &mut dyn DialogHost) {
    if let Err(err) = host.draw(session.dialog_mut()) {
        warn!("Failed to draw picker: {err:#}");
        session.cancel(CancelReason::HostClosed);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use color_eyre::eyre::eyre;
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::picker::source::{Source, SourceKind};
    use crate::picker::state::CaptureOptions;

    /// Host that replays a fixed list of events and records what happened.
    #[derive(Default)]
    struct ScriptedHost {
        events: VecDeque<HostEvent>,
        attached: bool,
        attach_count: usize,
        draws: usize,
        fail_draw: bool,
    }

    impl ScriptedHost {
        fn with_keys(codes: &[KeyCode]) -> Self {
            Self {
                events: codes
                    .iter()
                    .map(|code| HostEvent::Key(KeyEvent::new(*code, KeyModifiers::NONE)))
                    .collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl DialogHost for ScriptedHost {
        fn attach(&mut self) -> color_eyre::Result<()> {
            self.attached = true;
            self.attach_count += 1;
            Ok(())
        }

        async fn next_event(&mut self) -> Option<HostEvent> {
            self.events.pop_front()
        }

        fn draw(&mut self, _dialog: &mut SourcePickerDialog) -> color_eyre::Result<()> {
            if self.fail_draw {
                return Err(eyre!("terminal gone"));
            }
            self.draws += 1;
            Ok(())
        }

        fn detach(&mut self) -> color_eyre::Result<()> {
            self.attached = false;
            Ok(())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl SourceProvider for FailingProvider {
        async fn sources(&self) -> color_eyre::Result<Vec<Source>> {
            Err(eyre!("permission denied"))
        }
    }

    /// A fixed, in-memory source list.
    struct StaticSourceProvider {
        sources: Vec<Source>,
    }

    impl StaticSourceProvider {
        const fn new(sources: Vec<Source>) -> Self {
            Self { sources }
        }
    }

    #[async_trait]
    impl SourceProvider for StaticSourceProvider {
        async fn sources(&self) -> color_eyre::Result<Vec<Source>> {
            Ok(self.sources.clone())
        }
    }

    fn example_provider() -> StaticSourceProvider {
        StaticSourceProvider::new(vec![
            Source::screen("s1", "Screen 1"),
            Source::window("w1", "Editor"),
        ])
    }

    async fn run(provider: &dyn SourceProvider, host: &mut ScriptedHost) -> Option<SelectionResult> {
        show_selection_dialog(
            provider,
            host,
            Arc::new(KeyResolver::default()),
            PickerOptions::default(),
        )
        .await
    }

    #[tokio::test]
    async fn test_example_session() {
        let mut host = ScriptedHost::with_keys(&[
            KeyCode::Tab,
            KeyCode::Enter,
            KeyCode::Char('a'),
            KeyCode::Char(']'),
            KeyCode::Char('s'),
        ]);

        let result = run(&example_provider(), &mut host).await.unwrap();

        assert_eq!(
            result,
            SelectionResult {
                source_id: "w1".to_string(),
                source_name: "Editor".to_string(),
                source_type: SourceKind::Window,
                options: CaptureOptions {
                    capture_audio: true,
                    width: 3840,
                    height: 2160,
                    frame_rate: 30,
                },
            }
        );
        assert!(!host.attached);
    }

    #[tokio::test]
    async fn test_provider_failure_resolves_none_without_ui() {
        let mut host = ScriptedHost::with_keys(&[KeyCode::Enter, KeyCode::Char('s')]);

        let result = run(&FailingProvider, &mut host).await;

        assert_eq!(result, None);
        assert_eq!(host.attach_count, 0);
        assert_eq!(host.draws, 0);
        assert!(!host.attached);
        // No input was consumed.
        assert_eq!(host.events.len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_resolves_none() {
        let mut host = ScriptedHost::with_keys(&[KeyCode::Enter, KeyCode::Char('c')]);
        assert_eq!(run(&example_provider(), &mut host).await, None);
        assert!(!host.attached);
    }

    #[tokio::test]
    async fn test_escape_resolves_none_and_stops_reading_input() {
        let mut host = ScriptedHost::with_keys(&[
            KeyCode::Enter,
            KeyCode::Esc,
            KeyCode::Char('s'),
            KeyCode::Esc,
        ]);

        assert_eq!(run(&example_provider(), &mut host).await, None);
        // Keys after the terminal event stay with the host.
        assert_eq!(host.events.len(), 2);
    }

    #[tokio::test]
    async fn test_escape_does_not_leak_into_next_session() {
        let provider = example_provider();

        let mut first = ScriptedHost::with_keys(&[KeyCode::Esc]);
        assert_eq!(run(&provider, &mut first).await, None);

        let mut second = ScriptedHost::with_keys(&[KeyCode::Enter, KeyCode::Char('s')]);
        let result = run(&provider, &mut second).await.unwrap();
        assert_eq!(result.source_id, "s1");
    }

    #[tokio::test]
    async fn test_share_without_selection_needs_more_input() {
        // Share is pressed first and ignored; the session ends when input runs out.
        let mut host = ScriptedHost::with_keys(&[KeyCode::Char('s')]);
        assert_eq!(run(&example_provider(), &mut host).await, None);
    }

    #[tokio::test]
    async fn test_draw_failure_cancels() {
        let mut host = ScriptedHost {
            fail_draw: true,
            ..ScriptedHost::with_keys(&[KeyCode::Enter, KeyCode::Char('s')])
        };
        assert_eq!(run(&example_provider(), &mut host).await, None);
        assert!(!host.attached);
    }

    #[tokio::test]
    async fn test_initial_options_are_used() {
        let mut host = ScriptedHost::with_keys(&[KeyCode::Enter, KeyCode::Char('s')]);
        let result = show_selection_dialog(
            &example_provider(),
            &mut host,
            Arc::new(KeyResolver::default()),
            PickerOptions {
                capture_audio: true,
                quality: Quality::Gaming,
            },
        )
        .await
        .unwrap();

        assert!(result.options.capture_audio);
        assert_eq!(result.options.frame_rate, 60);
    }
}
