use serde::Serialize;

use crate::picker::preset::Quality;
use crate::picker::source::{Source, SourceKind};

/// Capture parameters handed to whatever performs the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOptions {
    pub capture_audio: bool,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

/// The user's final choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    pub source_id: String,
    pub source_name: String,
    pub source_type: SourceKind,
    pub options: CaptureOptions,
}

/// Mutable choices of one picker session.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<Source>,
    capture_audio: bool,
    quality: Quality,
}

impl SelectionState {
    pub fn new(capture_audio: bool, quality: Quality) -> Self {
        Self {
            selected: None,
            capture_audio,
            quality,
        }
    }

    /// Replaces any previous selection.
    pub fn select(&mut self, source: Source) {
        self.selected = Some(source);
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_ref().is_some_and(|source| source.id == id)
    }

    pub const fn capture_audio(&self) -> bool {
        self.capture_audio
    }

    pub const fn toggle_audio(&mut self) {
        self.capture_audio = !self.capture_audio;
    }

    pub const fn quality(&self) -> Quality {
        self.quality
    }

    pub const fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    pub const fn can_confirm(&self) -> bool {
        self.selected.is_some()
    }

    /// Builds the result, or `None` while nothing is selected.
    pub fn to_result(&self) -> Option<SelectionResult> {
        let source = self.selected.as_ref()?;
        let preset = self.quality.preset();
        Some(SelectionResult {
            source_id: source.id.clone(),
            source_name: source.name.clone(),
            source_type: source.kind,
            options: CaptureOptions {
                capture_audio: self.capture_audio,
                width: preset.width,
                height: preset.height,
                frame_rate: preset.frame_rate,
            },
        })
    }
}
