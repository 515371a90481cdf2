use std::fmt;

use serde::Serialize;

/// Capture resolution and frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityPreset {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

/// The fixed set of quality presets offered by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    Hd720,
    #[default]
    Hd1080,
    /// Capped at 30 fps like the HD presets; only `Gaming` runs at 60.
    Uhd4k,
    Gaming,
}

impl Quality {
    /// Every preset, in dropdown order.
    pub const ALL: [Self; 4] = [Self::Hd720, Self::Hd1080, Self::Uhd4k, Self::Gaming];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Hd720 => "720p",
            Self::Hd1080 => "1080p",
            Self::Uhd4k => "4K",
            Self::Gaming => "gaming",
        }
    }

    pub const fn preset(self) -> QualityPreset {
        let (width, height, frame_rate) = match self {
            Self::Hd720 => (1280, 720, 30),
            Self::Hd1080 => (1920, 1080, 30),
            Self::Uhd4k => (3840, 2160, 30),
            Self::Gaming => (1920, 1080, 60),
        };
        QualityPreset {
            width,
            height,
            frame_rate,
        }
    }

    /// Exact lookup by preset key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|quality| quality.key() == key)
    }

    /// Lookup that never fails: absent or unknown keys fall back to the default.
    pub fn resolve(key: Option<&str>) -> Self {
        key.and_then(Self::from_key).unwrap_or_default()
    }

    const fn index(self) -> usize {
        match self {
            Self::Hd720 => 0,
            Self::Hd1080 => 1,
            Self::Uhd4k => 2,
            Self::Gaming => 3,
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preset = self.preset();
        write!(
            f,
            "{} ({}x{} @ {} fps)",
            self.key(),
            preset.width,
            preset.height,
            preset.frame_rate
        )
    }
}
