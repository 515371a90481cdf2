use crossterm::event::KeyCode;

use crate::config::key::{Key, KeyBinding};
use crate::config::keybindings::{DialogKeybindings, NavigationKeybindings, PickerKeybindings};

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::new(KeyCode::Char('k')), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![Key::new(KeyCode::Char('j')), Key::new(KeyCode::Down)]),
            left: KeyBinding::multiple(vec![Key::new(KeyCode::Char('h')), Key::new(KeyCode::Left)]),
            right: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('l')),
                Key::new(KeyCode::Right),
            ]),
            home: KeyBinding::multiple(vec![Key::new(KeyCode::Char('g')), Key::new(KeyCode::Home)]),
            end: KeyBinding::multiple(vec![Key::new(KeyCode::Char('G')), Key::new(KeyCode::End)]),
            select: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Char(' ')),
            ]),
        }
    }
}

impl Default for PickerKeybindings {
    fn default() -> Self {
        Self {
            next_tab: Key::new(KeyCode::Tab).into(),
            toggle_audio: Key::new(KeyCode::Char('a')).into(),
            next_quality: Key::new(KeyCode::Char(']')).into(),
            previous_quality: Key::new(KeyCode::Char('[')).into(),
            share: Key::new(KeyCode::Char('s')).into(),
            cancel: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('c')),
                Key::new(KeyCode::Char('q')),
                Key::with_ctrl(KeyCode::Char('c')),
            ]),
            escape: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            dismiss: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Esc),
                Key::new(KeyCode::Char('q')),
            ]),
        }
    }
}
