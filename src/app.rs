use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::Result;
use tracing::{info, warn};

use crate::Theme;
use crate::cli::Command;
use crate::config::{AppConfig, KeyResolver};
use crate::guidance::{self, ModalFacility, Platform, StreamAlert};
use crate::host::{TerminalHost, TerminalModal};
use crate::picker::{self, FileSourceProvider, PickerOptions, Quality, SelectionResult};
use crate::theme;

pub struct App {
    resolver: Arc<KeyResolver>,
    theme: Theme,
    platform: Platform,
}

impl App {
    pub fn new(config: &AppConfig, platform: Platform) -> Self {
        Self {
            resolver: Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone()))),
            theme: theme::theme_from_name(&config.theme.name),
            platform,
        }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Pick {
                sources,
                audio,
                quality,
            } => {
                if let Some(key) = quality.as_deref()
                    && Quality::from_key(key).is_none()
                {
                    warn!("Unknown quality preset {key:?}, using {}", Quality::default().key());
                }
                let options = PickerOptions {
                    capture_audio: audio,
                    quality: Quality::resolve(quality.as_deref()),
                };
                let selection = self.pick(sources, options).await?;
                println!("{}", render_selection(selection.as_ref())?);
                Ok(())
            }
            Command::Guidance { plain } => {
                self.guidance(plain).await;
                Ok(())
            }
        }
    }

    async fn pick(&self, sources: PathBuf, options: PickerOptions) -> Result<Option<SelectionResult>> {
        let provider = FileSourceProvider::new(sources);
        let mut host = TerminalHost::new(self.theme)?;
        let selection =
            picker::show_selection_dialog(&provider, &mut host, Arc::clone(&self.resolver), options)
                .await;
        info!("Picker finished with selection: {}", selection.is_some());
        Ok(selection)
    }

    async fn guidance(&self, plain: bool) {
        let mut alert = StreamAlert::stdio();
        let mut terminal_modal = TerminalModal::new(self.theme, Arc::clone(&self.resolver));
        let modal: Option<&mut dyn ModalFacility> = if plain || !std::io::stderr().is_terminal() {
            None
        } else {
            Some(&mut terminal_modal)
        };
        guidance::show_permission_guidance(self.platform, modal, &mut alert).await;
    }
}

/// JSON written to stdout: the selection, or `null`.
fn render_selection(selection: Option<&SelectionResult>) -> Result<String> {
    Ok(serde_json::to_string(&selection)?)
}
