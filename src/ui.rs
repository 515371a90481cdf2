mod guidance_dialog;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use guidance_dialog::{GuidanceDialog, GuidanceDialogEvent};

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize or handle this input
/// - `Consumed` - The input was handled but produced no event
/// - `Event(E)` - The input was handled and produced an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    /// Input was not handled, parent should process it.
    Ignored,
    /// Input was consumed but produced no event.
    Consumed,
    /// Input was consumed and produced an event.
    Event(E),
}

impl<E> EventResult<E> {
    /// Returns the event if one was produced.
    pub fn event(self) -> Option<E> {
        match self {
            Self::Event(event) => Some(event),
            Self::Ignored | Self::Consumed => None,
        }
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Interactive UI building block.
///
/// Components handle key events and emit generic outputs. The picker dialog
/// and the guidance dialog are both components, and the terminal host drives
/// them without knowing what they contain.
pub trait Component {
    /// The output type produced by this component.
    type Output;

    /// Handle a key event.
    ///
    /// Returns `Ok(EventResult::...)` where:
    /// - `Ignored` - key was not handled, parent should process it
    /// - `Consumed` - key was handled but produced no output
    /// - `Event(output)` - key was handled and produced an output
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Render the component to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}
