use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{DialogAction, NavAction, PickerAction};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps raw key events onto the configured actions.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn nav_binding(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::Left => &kb.left,
            NavAction::Right => &kb.right,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    fn picker_binding(&self, action: PickerAction) -> &KeyBinding {
        let kb = &self.keybindings.picker;
        match action {
            PickerAction::NextTab => &kb.next_tab,
            PickerAction::ToggleAudio => &kb.toggle_audio,
            PickerAction::NextQuality => &kb.next_quality,
            PickerAction::PreviousQuality => &kb.previous_quality,
            PickerAction::Share => &kb.share,
            PickerAction::Cancel => &kb.cancel,
            PickerAction::Escape => &kb.escape,
        }
    }

    // Navigation actions
    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav_binding(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav_binding(action).hint()
    }

    // Picker actions
    pub fn matches_picker(&self, event: &KeyEvent, action: PickerAction) -> bool {
        self.picker_binding(action).matches(event)
    }

    pub fn display_picker(&self, action: PickerAction) -> String {
        self.picker_binding(action).hint()
    }

    // Dialog actions
    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Dismiss => kb.dismiss.matches(event),
        }
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Dismiss => kb.dismiss.hint(),
        }
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}
