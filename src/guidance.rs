//! Screen-recording permission guidance.
//!
//! Stateless: the text depends only on the platform family. It is shown
//! through an optional [`ModalFacility`]; without one it is flattened to
//! plain text and shown with a blocking [`Alert`].

use std::io::{BufRead, Write};

use async_trait::async_trait;
use clap::ValueEnum;
use tracing::{debug, warn};

const TITLE: &str = "Screen Sharing Permissions";

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Mac,
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// The platform this binary runs on.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" | "darwin" | "ios" => Self::Mac,
            "windows" => Self::Windows,
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Self::Linux,
            _ => Self::Other,
        }
    }
}

/// One block of rich guidance text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidanceBlock {
    Heading(&'static str),
    Paragraph(&'static str),
    /// A numbered step; numbering is assigned when rendered.
    Step(&'static str),
}

/// Rich text: an ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    pub blocks: Vec<GuidanceBlock>,
}

impl RichText {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flattens the blocks to plain lines, numbering steps.
    pub fn to_plain_text(&self) -> String {
        let mut step = 0;
        let lines: Vec<String> = self
            .blocks
            .iter()
            .map(|block| match block {
                GuidanceBlock::Heading(text) | GuidanceBlock::Paragraph(text) => {
                    (*text).to_string()
                }
                GuidanceBlock::Step(text) => {
                    step += 1;
                    format!("{step}. {text}")
                }
            })
            .collect();
        lines.join("\n")
    }
}

/// Guidance for the given platform. Empty for [`Platform::Other`].
pub fn guidance_for(platform: Platform) -> RichText {
    use GuidanceBlock::{Heading, Paragraph, Step};

    let blocks = match platform {
        Platform::Mac => vec![
            Heading("macOS"),
            Paragraph("Screen sharing needs the Screen Recording permission."),
            Step("Open System Settings > Privacy & Security > Screen & System Audio Recording."),
            Step("Enable the application that will capture the screen."),
            Step("Quit and reopen that application so the permission takes effect."),
            Paragraph("System audio capture may additionally require an audio driver."),
        ],
        Platform::Windows => vec![
            Heading("Windows"),
            Paragraph("Screen sharing usually works without extra setup."),
            Step("Open Settings > Privacy & security > Screenshots and screen recording."),
            Step("Allow apps to capture the screen, including desktop apps."),
            Paragraph("Protected windows (DRM video, some secure prompts) may appear black."),
        ],
        Platform::Linux => vec![
            Heading("Linux"),
            Paragraph("On Wayland, screen capture goes through xdg-desktop-portal and PipeWire."),
            Step("Install xdg-desktop-portal and the portal backend for your desktop."),
            Step("Make sure PipeWire is running."),
            Step("Approve the portal prompt when capture starts."),
            Paragraph("On X11, no extra permission is required."),
        ],
        Platform::Other => Vec::new(),
    };
    RichText { blocks }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Primary,
    #[allow(dead_code)]
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalButton {
    pub text: String,
    pub kind: ButtonKind,
}

/// What a modal facility is asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalRequest {
    pub title: String,
    pub content: RichText,
    pub buttons: Vec<ModalButton>,
}

/// A generic facility that can show a modal dialog.
#[async_trait]
pub trait ModalFacility: Send {
    async fn show(&mut self, request: ModalRequest) -> color_eyre::Result<()>;
}

/// A blocking plain-text alert.
pub trait Alert {
    fn alert(&mut self, text: &str) -> color_eyre::Result<()>;
}

/// Writes the alert and blocks until a line (Enter) is read.
pub struct StreamAlert<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamAlert<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl StreamAlert<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Alert for StreamAlert<R, W> {
    fn alert(&mut self, text: &str) -> color_eyre::Result<()> {
        writeln!(self.output, "{TITLE}")?;
        writeln!(self.output)?;
        if !text.is_empty() {
            writeln!(self.output, "{text}")?;
            writeln!(self.output)?;
        }
        write!(self.output, "Press Enter to continue...")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

/// Show permission guidance for `platform`.
///
/// Uses `modal` when one is available, otherwise `alert` with plain text.
/// Display failures are logged and otherwise ignored.
pub async fn show_permission_guidance(
    platform: Platform,
    modal: Option<&mut dyn ModalFacility>,
    alert: &mut dyn Alert,
) {
    let content = guidance_for(platform);
    if content.is_empty() {
        debug!("No permission guidance for {platform:?}");
    } else {
        debug!("Showing permission guidance for {platform:?}");
    }

    let result = match modal {
        Some(modal) => {
            let request = ModalRequest {
                title: TITLE.to_string(),
                content,
                buttons: vec![ModalButton {
                    text: "Got it".to_string(),
                    kind: ButtonKind::Primary,
                }],
            };
            modal.show(request).await
        }
        None => alert.alert(&content.to_plain_text()),
    };

    if let Err(err) = result {
        warn!("Failed to show permission guidance: {err:#}");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use color_eyre::eyre::eyre;

    use super::*;

    #[derive(Default)]
    struct RecordingModal {
        requests: Vec<ModalRequest>,
        fail: bool,
    }

    #[async_trait]
    impl ModalFacility for RecordingModal {
        async fn show(&mut self, request: ModalRequest) -> color_eyre::Result<()> {
            self.requests.push(request);
            if self.fail {
                return Err(eyre!("modal unavailable"));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingAlert {
        texts: Vec<String>,
    }

    impl Alert for RecordingAlert {
        fn alert(&mut self, text: &str) -> color_eyre::Result<()> {
            self.texts.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_platform_from_os() {
        assert_eq!(Platform::from_os("macos"), Platform::Mac);
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(Platform::from_os("haiku"), Platform::Other);
        assert_eq!(Platform::from_os(""), Platform::Other);
    }

    #[test]
    fn test_each_known_platform_has_guidance() {
        for platform in [Platform::Mac, Platform::Windows, Platform::Linux] {
            assert!(!guidance_for(platform).is_empty(), "{platform:?}");
        }
        assert!(guidance_for(Platform::Other).is_empty());
    }

    #[test]
    fn test_plain_text_numbers_steps() {
        let text = RichText {
            blocks: vec![
                GuidanceBlock::Heading("Title"),
                GuidanceBlock::Step("first"),
                GuidanceBlock::Paragraph("note"),
                GuidanceBlock::Step("second"),
            ],
        };
        assert_eq!(text.to_plain_text(), "Title\n1. first\nnote\n2. second");
    }

    #[tokio::test]
    async fn test_modal_is_preferred() {
        let mut modal = RecordingModal::default();
        let mut alert = RecordingAlert::default();

        show_permission_guidance(Platform::Mac, Some(&mut modal), &mut alert).await;

        assert!(alert.texts.is_empty());
        assert_eq!(modal.requests.len(), 1);
        let request = &modal.requests[0];
        assert_eq!(request.title, TITLE);
        assert_eq!(request.content, guidance_for(Platform::Mac));
        assert_eq!(request.buttons[0].kind, ButtonKind::Primary);
    }

    #[tokio::test]
    async fn test_falls_back_to_plain_alert() {
        let mut alert = RecordingAlert::default();

        show_permission_guidance(Platform::Linux, None, &mut alert).await;

        assert_eq!(alert.texts.len(), 1);
        assert!(alert.texts[0].contains("1. Install xdg-desktop-portal"));
        assert!(alert.texts[0].starts_with("Linux\n"));
    }

    #[tokio::test]
    async fn test_other_platform_still_displays() {
        let mut alert = RecordingAlert::default();
        show_permission_guidance(Platform::Other, None, &mut alert).await;
        assert_eq!(alert.texts, vec![String::new()]);
    }

    #[tokio::test]
    async fn test_modal_failure_is_swallowed() {
        let mut modal = RecordingModal {
            fail: true,
            ..RecordingModal::default()
        };
        let mut alert = RecordingAlert::default();

        show_permission_guidance(Platform::Windows, Some(&mut modal), &mut alert).await;

        assert_eq!(modal.requests.len(), 1);
        assert!(alert.texts.is_empty());
    }

    #[test]
    fn test_stream_alert_blocks_on_enter() {
        let mut output = Vec::new();
        let mut alert = StreamAlert::new(Cursor::new(b"\n".to_vec()), &mut output);
        alert.alert("1. Do the thing").unwrap();

        let written = String::from_utf8(output).unwrap();
        assert!(written.starts_with(TITLE));
        assert!(written.contains("1. Do the thing"));
        assert!(written.ends_with("Press Enter to continue..."));
    }
}
