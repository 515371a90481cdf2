use serde::{Deserialize, Serialize};

use crate::config::key::KeyBinding;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub left: KeyBinding,
    pub right: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerKeybindings {
    pub next_tab: KeyBinding,
    pub toggle_audio: KeyBinding,
    pub next_quality: KeyBinding,
    pub previous_quality: KeyBinding,
    pub share: KeyBinding,
    pub cancel: KeyBinding,
    pub escape: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    pub dismiss: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub navigation: NavigationKeybindings,
    pub picker: PickerKeybindings,
    pub dialog: DialogKeybindings,
}
