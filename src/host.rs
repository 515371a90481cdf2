//! Terminal-backed implementations of the picker host and the modal facility.

use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tracing::{debug, warn};

use crate::Theme;
use crate::config::KeyResolver;
use crate::guidance::{ModalFacility, ModalRequest};
use crate::picker::{DialogHost, HostEvent, SourcePickerDialog};
use crate::tui::{Event, Tui};
use crate::ui::{Component, GuidanceDialog, GuidanceDialogEvent};

const FRAME_RATE: f64 = 30.0;

/// Shows the picker dialog full-screen on the terminal.
pub struct TerminalHost {
    tui: Tui,
    theme: Theme,
}

impl TerminalHost {
    pub fn new(theme: Theme) -> Result<Self> {
        Ok(Self {
            tui: Tui::new(FRAME_RATE)?,
            theme,
        })
    }
}

#[async_trait]
impl DialogHost for TerminalHost {
    fn attach(&mut self) -> Result<()> {
        self.tui.enter()
    }

    async fn next_event(&mut self) -> Option<HostEvent> {
        loop {
            match self.tui.next_event().await? {
                Event::Key(key) => return Some(HostEvent::Key(key)),
                Event::Init | Event::Render | Event::Resize(..) => return Some(HostEvent::Render),
                Event::Quit => return Some(HostEvent::Closed),
                Event::Suspend => {
                    if let Err(err) = self.tui.suspend() {
                        warn!("Failed to suspend: {err:#}");
                        return Some(HostEvent::Closed);
                    }
                }
                Event::Error(err) => {
                    warn!("Terminal event error: {err}");
                    return Some(HostEvent::Closed);
                }
            }
        }
    }

    fn draw(&mut self, dialog: &mut SourcePickerDialog) -> Result<()> {
        let theme = self.theme;
        self.tui
            .draw(|frame| dialog.render(frame, frame.area(), &theme))?;
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        self.tui.exit()
    }
}

/// Shows modal requests as a centered dialog on the terminal.
pub struct TerminalModal {
    theme: Theme,
    resolver: Arc<KeyResolver>,
}

impl TerminalModal {
    pub const fn new(theme: Theme, resolver: Arc<KeyResolver>) -> Self {
        Self { theme, resolver }
    }

    async fn run(&self, tui: &mut Tui, dialog: &mut GuidanceDialog) -> Result<()> {
        let theme = self.theme;
        while let Some(event) = tui.next_event().await {
            match event {
                Event::Init | Event::Render | Event::Resize(..) => {
                    tui.draw(|frame| dialog.render(frame, frame.area(), &theme))?;
                }
                Event::Key(key) => {
                    if let Some(GuidanceDialogEvent::Dismissed) = dialog.handle_key(key)?.event() {
                        debug!("Guidance dismissed");
                        return Ok(());
                    }
                }
                Event::Suspend => tui.suspend()?,
                Event::Quit => return Ok(()),
                Event::Error(err) => return Err(color_eyre::eyre::eyre!(err)),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ModalFacility for TerminalModal {
    async fn show(&mut self, request: ModalRequest) -> Result<()> {
        let mut dialog = GuidanceDialog::new(request, Arc::clone(&self.resolver));
        let mut tui = Tui::new(FRAME_RATE)?;
        tui.enter()?;
        let result = self.run(&mut tui, &mut dialog).await;
        tui.exit()?;
        result
    }
}
