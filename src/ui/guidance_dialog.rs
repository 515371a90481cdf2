use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::guidance::{ButtonKind, GuidanceBlock, ModalRequest};
use crate::ui::{Component, EventResult, Result};

pub enum GuidanceDialogEvent {
    Dismissed,
}

/// Centered modal showing a [`ModalRequest`] until dismissed.
pub struct GuidanceDialog {
    request: ModalRequest,
    resolver: Arc<KeyResolver>,
}

impl GuidanceDialog {
    pub const fn new(request: ModalRequest, resolver: Arc<KeyResolver>) -> Self {
        Self { request, resolver }
    }

    fn content_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let heading_style = Style::default()
            .fg(theme.info())
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(theme.text());
        let step_style = Style::default().fg(theme.key_hint());

        let mut step = 0;
        let mut lines = vec![Line::from("")];
        for block in &self.request.content.blocks {
            match block {
                GuidanceBlock::Heading(text) => {
                    lines.push(Line::from(Span::styled(*text, heading_style)));
                }
                GuidanceBlock::Paragraph(text) => {
                    lines.push(Line::from(Span::styled(*text, text_style)));
                }
                GuidanceBlock::Step(text) => {
                    step += 1;
                    lines.push(Line::from(vec![
                        Span::styled(format!("{step}. "), step_style),
                        Span::styled(*text, text_style),
                    ]));
                }
            }
        }
        lines
    }

    fn button_line(&self, theme: &Theme) -> Line<'static> {
        let hint = self.resolver.display_dialog(DialogAction::Dismiss);
        let mut spans = vec![Span::styled(
            format!("[{hint}] "),
            Style::default()
                .fg(theme.key_hint())
                .add_modifier(Modifier::BOLD),
        )];
        for button in &self.request.buttons {
            let style = match button.kind {
                ButtonKind::Primary => Style::default()
                    .fg(theme.success())
                    .add_modifier(Modifier::BOLD),
                ButtonKind::Secondary => Style::default().fg(theme.muted()),
            };
            spans.push(Span::styled(format!("[ {} ]", button.text), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

impl Component for GuidanceDialog {
    type Output = GuidanceDialogEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_dialog(&key, DialogAction::Dismiss) {
            return Ok(GuidanceDialogEvent::Dismissed.into());
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(70), Constraint::Percentage(60));
        frame.render_widget(Clear, popup_area);

        let mut lines = self.content_lines(theme);
        lines.push(Line::from(""));
        lines.push(self.button_line(theme));

        let block = Block::default()
            .title(format!(" {} ", self.request.title))
            .title_style(
                Style::default()
                    .fg(theme.warning())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.warning()))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}
