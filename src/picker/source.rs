use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of capture source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A whole display.
    Screen,
    /// A single application window.
    Window,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Screen => write!(f, "screen"),
            Self::Window => write!(f, "window"),
        }
    }
}

/// Opaque reference to an image (file path, URL or data URL).
///
/// The picker never decodes it; it is shown as a label on the source card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    #[cfg(test)]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short form for display: the last path segment, or a marker for inline data.
    pub fn short_label(&self) -> &str {
        if self.0.starts_with("data:") {
            return "inline image";
        }
        self.0
            .rsplit(['/', '\\'])
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(&self.0)
    }
}

/// A capturable screen or window offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default)]
    pub thumbnail: ImageRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_icon: Option<ImageRef>,
}

#[cfg(test)]
impl Source {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            thumbnail: ImageRef::default(),
            app_icon: None,
        }
    }

    pub fn screen(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, SourceKind::Screen)
    }

    pub fn window(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, SourceKind::Window)
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = ImageRef::new(thumbnail);
        self
    }

    #[must_use]
    pub fn with_app_icon(mut self, icon: impl Into<String>) -> Self {
        self.app_icon = Some(ImageRef::new(icon));
        self
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.kind, self.id)
    }
}
