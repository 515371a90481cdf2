use std::fmt;

use crossterm::event::KeyEvent;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::picker::dialog::{PickerEvent, SourcePickerDialog};
use crate::picker::state::SelectionResult;
use crate::ui::{Component, EventResult};

/// Why a session ended without a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The Cancel button.
    Button,
    /// The Escape key.
    Escape,
    /// The host went away (terminal closed, quit signal, draw failure).
    HostClosed,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button => write!(f, "cancel button"),
            Self::Escape => write!(f, "escape key"),
            Self::HostClosed => write!(f, "host closed"),
        }
    }
}

/// Single-assignment slot for the session outcome.
///
/// The first call to [`ResultSlot::settle`] sends the value; every later call
/// is a no-op.
pub struct ResultSlot {
    tx: Option<oneshot::Sender<Option<SelectionResult>>>,
}

impl ResultSlot {
    pub fn new() -> (Self, oneshot::Receiver<Option<SelectionResult>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Returns `true` if this call settled the slot.
    pub fn settle(&mut self, value: Option<SelectionResult>) -> bool {
        let Some(tx) = self.tx.take() else {
            return false;
        };
        // The receiver may already be gone if the caller stopped waiting.
        let _ = tx.send(value);
        true
    }

    pub const fn is_settled(&self) -> bool {
        self.tx.is_none()
    }
}

/// One open-to-resolved run of the picker dialog.
///
/// Owns the dialog (and with it the selection state) and the result slot.
/// Once settled, key events are ignored; dropping the session drops the
/// dialog's key handling with it.
pub struct Session {
    dialog: SourcePickerDialog,
    slot: ResultSlot,
}

impl Session {
    pub fn open(dialog: SourcePickerDialog) -> (Self, oneshot::Receiver<Option<SelectionResult>>) {
        let (slot, rx) = ResultSlot::new();
        (Self { dialog, slot }, rx)
    }

    pub const fn dialog_mut(&mut self) -> &mut SourcePickerDialog {
        &mut self.dialog
    }

    pub const fn is_settled(&self) -> bool {
        self.slot.is_settled()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.is_settled() {
            debug!("Ignoring key {:?} after session settled", key.code);
            return;
        }

        // Dialog key handling is infallible; an error here means a bug in the
        // dialog, which is treated like the host closing.
        match self.dialog.handle_key(key) {
            Ok(EventResult::Event(PickerEvent::Shared(result))) => self.confirm(result),
            Ok(EventResult::Event(PickerEvent::Canceled(reason))) => self.cancel(reason),
            Ok(EventResult::Consumed | EventResult::Ignored) => {}
            Err(err) => {
                tracing::warn!("Picker dialog failed to handle key: {err:#}");
                self.cancel(CancelReason::HostClosed);
            }
        }
    }

    fn confirm(&mut self, result: SelectionResult) {
        info!(
            "Sharing {} {:?} at {}x{}@{} (audio: {})",
            result.source_type,
            result.source_id,
            result.options.width,
            result.options.height,
            result.options.frame_rate,
            result.options.capture_audio
        );
        self.slot.settle(Some(result));
    }

    pub fn cancel(&mut self, reason: CancelReason) {
        if self.slot.settle(None) {
            info!("Picker canceled: {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::config::KeyResolver;
    use crate::picker::source::Source;
    use crate::picker::state::SelectionState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn open_session() -> (Session, oneshot::Receiver<Option<SelectionResult>>) {
        let dialog = SourcePickerDialog::new(
            vec![Source::screen("s1", "Screen 1"), Source::window("w1", "Editor")],
            SelectionState::default(),
            Arc::new(KeyResolver::default()),
        );
        Session::open(dialog)
    }

    #[test]
    fn test_slot_settles_once() {
        let (mut slot, mut rx) = ResultSlot::new();
        assert!(!slot.is_settled());
        assert!(slot.settle(None));
        assert!(slot.is_settled());
        assert!(!slot.settle(None));
        assert_eq!(rx.try_recv().unwrap(), None);
    }

    #[test]
    fn test_escape_resolves_none() {
        let (mut session, mut rx) = open_session();
        session.handle_key(key(KeyCode::Esc));

        assert!(session.is_settled());
        assert_eq!(rx.try_recv().unwrap(), None);
    }

    #[test]
    fn test_second_terminal_event_is_ignored() {
        let (mut session, mut rx) = open_session();
        session.handle_key(key(KeyCode::Enter)); // select s1
        session.handle_key(key(KeyCode::Char('c'))); // cancel
        session.handle_key(key(KeyCode::Char('s'))); // share, too late
        session.handle_key(key(KeyCode::Esc));

        assert_eq!(rx.try_recv().unwrap(), None);
    }

    #[test]
    fn test_share_after_escape_does_not_resolve_again() {
        let (mut session, mut rx) = open_session();
        session.handle_key(key(KeyCode::Enter));
        session.handle_key(key(KeyCode::Char('s')));
        session.cancel(CancelReason::Escape);

        let result = rx.try_recv().unwrap().unwrap();
        assert_eq!(result.source_id, "s1");
    }

    #[test]
    fn test_share_without_selection_keeps_session_open() {
        let (mut session, mut rx) = open_session();
        session.handle_key(key(KeyCode::Char('s')));

        assert!(!session.is_settled());
        assert!(rx.try_recv().is_err());
    }
}
