use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};

use crate::Theme;
use crate::config::{KeyResolver, NavAction, PickerAction};
use crate::picker::session::CancelReason;
use crate::picker::source::{Source, SourceKind};
use crate::picker::state::{SelectionResult, SelectionState};
use crate::picker::Quality;
use crate::ui::{Component, EventResult, Result};

const GRID_COLUMNS: usize = 3;
const CARD_HEIGHT: u16 = 5;

/// Terminal outcome of the picker dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    Shared(SelectionResult),
    Canceled(CancelReason),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Screens,
    Windows,
}

impl Tab {
    const fn index(self) -> usize {
        match self {
            Self::Screens => 0,
            Self::Windows => 1,
        }
    }

    const fn toggled(self) -> Self {
        match self {
            Self::Screens => Self::Windows,
            Self::Windows => Self::Screens,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Screens => "Screens",
            Self::Windows => "Windows",
        }
    }
}

/// Modal dialog for choosing a source, the audio flag and a quality preset.
///
/// Sources are split into a screens group and a windows group; only the
/// group of the active tab is shown. Each group keeps its own cursor, and the
/// selection lives in [`SelectionState`] so switching tabs never touches it.
pub struct SourcePickerDialog {
    screens: Vec<Source>,
    windows: Vec<Source>,
    tab: Tab,
    cursors: [usize; 2],
    state: SelectionState,
    resolver: Arc<KeyResolver>,
}

impl SourcePickerDialog {
    pub fn new(sources: Vec<Source>, state: SelectionState, resolver: Arc<KeyResolver>) -> Self {
        let (screens, windows) = sources
            .into_iter()
            .partition(|source| source.kind == SourceKind::Screen);
        Self {
            screens,
            windows,
            tab: Tab::default(),
            cursors: [0; 2],
            state,
            resolver,
        }
    }

    #[cfg(test)]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    #[cfg(test)]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    fn group(&self, tab: Tab) -> &[Source] {
        match tab {
            Tab::Screens => &self.screens,
            Tab::Windows => &self.windows,
        }
    }

    fn cursor(&self) -> usize {
        self.cursors[self.tab.index()]
    }

    fn move_cursor(&mut self, action: NavAction) {
        let len = self.group(self.tab).len();
        if len == 0 {
            return;
        }
        let last = len - 1;
        let current = self.cursor().min(last);
        let next = match action {
            NavAction::Left => current.saturating_sub(1),
            NavAction::Right => (current + 1).min(last),
            NavAction::Up => current.checked_sub(GRID_COLUMNS).unwrap_or(current),
            NavAction::Down if current + GRID_COLUMNS <= last => current + GRID_COLUMNS,
            NavAction::Home => 0,
            NavAction::End => last,
            NavAction::Down | NavAction::Select => current,
        };
        self.cursors[self.tab.index()] = next;
    }

    fn select_under_cursor(&mut self) {
        if let Some(source) = self.group(self.tab).get(self.cursor()).cloned() {
            tracing::debug!("Selected source {source}");
            self.state.select(source);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let titles = [Tab::Screens, Tab::Windows].map(|tab| {
            format!(" {} ({}) ", tab.label(), self.group(tab).len())
        });
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .style(Style::default().fg(theme.muted()))
            .highlight_style(
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let sources = self.group(self.tab);
        if sources.is_empty() {
            let message = format!("No {} available", self.tab.label().to_lowercase());
            let empty = Paragraph::new(message)
                .style(Style::default().fg(theme.muted()))
                .alignment(Alignment::Center);
            let [_, middle, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);
            frame.render_widget(empty, middle);
            return;
        }

        let cursor = self.cursor().min(sources.len() - 1);
        let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
        let cursor_row = cursor / GRID_COLUMNS;
        let first_row = (cursor_row + 1).saturating_sub(visible_rows);

        let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
            .split(area);
        for (row_area, row) in row_areas.iter().zip(first_row..) {
            let cell_areas = Layout::horizontal([Constraint::Ratio(1, 3); GRID_COLUMNS])
                .split(*row_area);
            for (column, cell_area) in cell_areas.iter().enumerate() {
                let index = row * GRID_COLUMNS + column;
                if let Some(source) = sources.get(index) {
                    self.render_card(frame, *cell_area, source, index == cursor, theme);
                }
            }
        }
    }

    fn render_card(
        &self,
        frame: &mut Frame,
        area: Rect,
        source: &Source,
        focused: bool,
        theme: &Theme,
    ) {
        let selected = self.state.is_selected(&source.id);
        let border_color = if selected {
            theme.success()
        } else if focused {
            theme.border_focused()
        } else {
            theme.border()
        };
        let title = if selected {
            format!(" ✓ {} ", source.name)
        } else {
            format!(" {} ", source.name)
        };

        let mut block = Block::default()
            .title(title)
            .title_style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border_color));
        if focused {
            block = block.style(Style::default().bg(theme.selection_bg()));
        }

        let icon = source
            .app_icon
            .as_ref()
            .map_or_else(|| source.kind.to_string(), |icon| icon.short_label().to_string());
        let thumbnail = if source.thumbnail.is_empty() {
            "no preview".to_string()
        } else {
            source.thumbnail.short_label().to_string()
        };

        let lines = vec![
            Line::from(Span::styled(icon, Style::default().fg(theme.info()))),
            Line::from(Span::styled(thumbnail, Style::default().fg(theme.muted()))),
            Line::from(Span::styled(
                source.id.clone(),
                Style::default().fg(theme.disabled()),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_options(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [audio_area, quality_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        let checkbox = if self.state.capture_audio() { "[x]" } else { "[ ]" };
        let audio = Line::from(vec![
            Span::styled(checkbox, Style::default().fg(theme.accent())),
            Span::styled(" Capture audio", Style::default().fg(theme.text())),
        ]);
        frame.render_widget(Paragraph::new(audio), audio_area);

        let mut spans = vec![Span::styled("Quality: ", Style::default().fg(theme.text()))];
        for quality in Quality::ALL {
            if quality == self.state.quality() {
                spans.push(Span::styled(
                    format!("[{quality}]"),
                    Style::default()
                        .fg(theme.accent())
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(
                    quality.key(),
                    Style::default().fg(theme.muted()),
                ));
            }
            spans.push(Span::raw("  "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), quality_area);
    }

    fn render_buttons(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let share_style = if self.state.can_confirm() {
            Style::default()
                .fg(theme.success())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(theme.disabled())
                .add_modifier(Modifier::DIM)
        };
        let buttons = Line::from(vec![
            Span::styled("[ Cancel ]", Style::default().fg(theme.muted())),
            Span::raw("   "),
            Span::styled("[ Share ]", share_style),
        ]);
        frame.render_widget(Paragraph::new(buttons).alignment(Alignment::Right), area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let resolver = &self.resolver;
        let hints = [
            (resolver.display_picker(PickerAction::NextTab), "tabs"),
            (resolver.display_nav(NavAction::Select), "select"),
            (resolver.display_picker(PickerAction::ToggleAudio), "audio"),
            (
                format!(
                    "{}/{}",
                    resolver.display_picker(PickerAction::PreviousQuality),
                    resolver.display_picker(PickerAction::NextQuality)
                ),
                "quality",
            ),
            (resolver.display_picker(PickerAction::Share), "share"),
            (resolver.display_picker(PickerAction::Escape), "cancel"),
        ];

        let key_style = Style::default()
            .fg(theme.key_hint())
            .add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(theme.muted());
        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key, key_style),
                    Span::styled(format!(" {label}  "), label_style),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for SourcePickerDialog {
    type Output = PickerEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_picker(&key, PickerAction::Escape) {
            return Ok(PickerEvent::Canceled(CancelReason::Escape).into());
        }
        if self.resolver.matches_picker(&key, PickerAction::Cancel) {
            return Ok(PickerEvent::Canceled(CancelReason::Button).into());
        }
        if self.resolver.matches_picker(&key, PickerAction::Share) {
            // Share stays inert until a source is selected.
            return Ok(self
                .state
                .to_result()
                .map_or(EventResult::Consumed, |result| {
                    PickerEvent::Shared(result).into()
                }));
        }

        if self.resolver.matches_picker(&key, PickerAction::NextTab) {
            self.tab = self.tab.toggled();
        } else if self.resolver.matches_picker(&key, PickerAction::ToggleAudio) {
            self.state.toggle_audio();
        } else if self.resolver.matches_picker(&key, PickerAction::NextQuality) {
            self.state.set_quality(self.state.quality().next());
        } else if self.resolver.matches_picker(&key, PickerAction::PreviousQuality) {
            self.state.set_quality(self.state.quality().previous());
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            self.select_under_cursor();
        } else if let Some(action) = [
            NavAction::Up,
            NavAction::Down,
            NavAction::Left,
            NavAction::Right,
            NavAction::Home,
            NavAction::End,
        ]
        .into_iter()
        .find(|action| self.resolver.matches_nav(&key, *action))
        {
            self.move_cursor(action);
        }

        // The dialog is modal: every other key is swallowed.
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(90), Constraint::Percentage(90));
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Share your screen ")
            .title_style(
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.base()));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let [tabs_area, grid_area, options_area, buttons_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .spacing(1)
        .areas(inner);

        self.render_tabs(frame, tabs_area, theme);
        self.render_grid(frame, grid_area, theme);
        self.render_options(frame, options_area, theme);
        self.render_buttons(frame, buttons_area, theme);
        self.render_hints(frame, hints_area, theme);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dialog(sources: Vec<Source>) -> SourcePickerDialog {
        SourcePickerDialog::new(
            sources,
            SelectionState::default(),
            Arc::new(KeyResolver::default()),
        )
    }

    fn example_sources() -> Vec<Source> {
        vec![
            Source::screen("s1", "Screen 1").with_thumbnail("/tmp/thumbs/s1.png"),
            Source::window("w1", "Editor").with_app_icon("/icons/editor.png"),
        ]
    }

    fn press(dialog: &mut SourcePickerDialog, codes: &[KeyCode]) -> Option<PickerEvent> {
        codes
            .iter()
            .filter_map(|code| dialog.handle_key(key(*code)).unwrap().event())
            .last()
    }

    fn draw(dialog: &mut SourcePickerDialog) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| dialog.render(frame, frame.area(), &theme))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn find_text(buffer: &Buffer, text: &str) -> Option<(u16, u16)> {
        let area = buffer.area;
        let chars: Vec<String> = text.chars().map(String::from).collect();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let matched = chars.iter().enumerate().all(|(offset, ch)| {
                    let Ok(offset) = u16::try_from(offset) else {
                        return false;
                    };
                    x + offset < area.right() && buffer[(x + offset, y)].symbol() == ch
                });
                if matched {
                    return Some((x, y));
                }
            }
        }
        None
    }

    #[test]
    fn test_example_selection() {
        let mut dialog = dialog(example_sources());

        // Switch to windows, select the editor, enable audio and pick 4K.
        let event = press(
            &mut dialog,
            &[
                KeyCode::Tab,
                KeyCode::Enter,
                KeyCode::Char('a'),
                KeyCode::Char(']'),
                KeyCode::Char('s'),
            ],
        );

        let Some(PickerEvent::Shared(result)) = event else {
            panic!("expected a shared result, got {event:?}");
        };
        assert_eq!(result.source_id, "w1");
        assert_eq!(result.source_name, "Editor");
        assert_eq!(result.source_type, SourceKind::Window);
        assert!(result.options.capture_audio);
        assert_eq!(
            (result.options.width, result.options.height, result.options.frame_rate),
            (3840, 2160, 30)
        );
    }

    #[test]
    fn test_every_preset_reaches_the_result() {
        let cases = [
            (0, Quality::Hd1080),
            (1, Quality::Uhd4k),
            (2, Quality::Gaming),
            (3, Quality::Hd720),
        ];
        for (steps, expected) in cases {
            let mut dialog = dialog(example_sources());
            let mut keys = vec![KeyCode::Enter];
            keys.extend(std::iter::repeat_n(KeyCode::Char(']'), steps));
            keys.push(KeyCode::Char('s'));

            let Some(PickerEvent::Shared(result)) = press(&mut dialog, &keys) else {
                panic!("expected a shared result");
            };
            let preset = expected.preset();
            assert_eq!(result.options.width, preset.width);
            assert_eq!(result.options.height, preset.height);
            assert_eq!(result.options.frame_rate, preset.frame_rate);
        }
    }

    #[test]
    fn test_share_is_inert_without_selection() {
        let mut dialog = dialog(example_sources());
        let result = dialog.handle_key(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(result, EventResult::Consumed);
    }

    #[test]
    fn test_cancel_and_escape() {
        let mut dialog = dialog(example_sources());
        assert_eq!(
            press(&mut dialog, &[KeyCode::Char('c')]),
            Some(PickerEvent::Canceled(CancelReason::Button))
        );
        assert_eq!(
            press(&mut dialog, &[KeyCode::Esc]),
            Some(PickerEvent::Canceled(CancelReason::Escape))
        );
    }

    #[test]
    fn test_initial_tab_is_screens() {
        let dialog = dialog(example_sources());
        assert_eq!(dialog.tab(), Tab::Screens);
    }

    #[test]
    fn test_switching_tabs_keeps_selection() {
        let mut dialog = dialog(example_sources());
        press(&mut dialog, &[KeyCode::Enter]);
        assert!(dialog.state().is_selected("s1"));

        press(&mut dialog, &[KeyCode::Tab]);
        assert_eq!(dialog.tab(), Tab::Windows);
        assert!(dialog.state().is_selected("s1"));

        press(&mut dialog, &[KeyCode::Tab]);
        assert!(dialog.state().is_selected("s1"));
    }

    #[test]
    fn test_selecting_replaces_previous_selection() {
        let mut dialog = dialog(example_sources());
        press(&mut dialog, &[KeyCode::Enter, KeyCode::Tab, KeyCode::Enter]);
        assert!(dialog.state().is_selected("w1"));
        assert!(!dialog.state().is_selected("s1"));
    }

    #[test]
    fn test_grid_navigation() {
        let sources = (1..=5)
            .map(|n| Source::window(format!("w{n}"), format!("Window {n}")))
            .collect();
        let mut dialog = dialog(sources);
        press(&mut dialog, &[KeyCode::Tab]);

        // Row-major grid, three columns: Down jumps a row, Right stops at the end.
        press(&mut dialog, &[KeyCode::Down, KeyCode::Enter]);
        assert!(dialog.state().is_selected("w4"));

        press(&mut dialog, &[KeyCode::Right, KeyCode::Right, KeyCode::Enter]);
        assert!(dialog.state().is_selected("w5"));

        press(&mut dialog, &[KeyCode::Up, KeyCode::Enter]);
        assert!(dialog.state().is_selected("w2"));

        press(&mut dialog, &[KeyCode::Home, KeyCode::Enter]);
        assert!(dialog.state().is_selected("w1"));

        press(&mut dialog, &[KeyCode::End, KeyCode::Enter]);
        assert!(dialog.state().is_selected("w5"));
    }

    #[test]
    fn test_select_in_empty_group_does_nothing() {
        let mut dialog = dialog(vec![Source::screen("s1", "Screen 1")]);
        press(&mut dialog, &[KeyCode::Tab, KeyCode::Down, KeyCode::Enter]);
        assert!(!dialog.state().can_confirm());
    }

    #[test]
    fn test_render_shows_controls() {
        let mut dialog = dialog(example_sources());
        let buffer = draw(&mut dialog);

        for label in ["Screens (1)", "Windows (1)", "Screen 1", "s1.png", "[ ] Capture audio"] {
            assert!(find_text(&buffer, label).is_some(), "missing {label:?}");
        }
        for quality in Quality::ALL {
            assert!(find_text(&buffer, quality.key()).is_some(), "missing {quality:?}");
        }
        // Only the visible group is drawn.
        assert!(find_text(&buffer, "Editor").is_none());
    }

    #[test]
    fn test_share_button_enabled_after_selection() {
        let theme = Theme::default();
        let mut dialog = dialog(example_sources());

        let buffer = draw(&mut dialog);
        let (x, y) = find_text(&buffer, "[ Share ]").unwrap();
        assert_eq!(buffer[(x, y)].fg, theme.disabled());

        press(&mut dialog, &[KeyCode::Enter]);
        let buffer = draw(&mut dialog);
        let (x, y) = find_text(&buffer, "[ Share ]").unwrap();
        assert_eq!(buffer[(x, y)].fg, theme.success());
        assert!(find_text(&buffer, "✓ Screen 1").is_some());
    }

    #[test]
    fn test_render_windows_tab() {
        let mut dialog = dialog(example_sources());
        press(&mut dialog, &[KeyCode::Tab]);
        let buffer = draw(&mut dialog);

        assert!(find_text(&buffer, "Editor").is_some());
        assert!(find_text(&buffer, "editor.png").is_some());
        assert!(find_text(&buffer, "Screen 1").is_none());
    }

    #[test]
    fn test_render_empty_group() {
        let mut dialog = dialog(vec![Source::screen("s1", "Screen 1")]);
        press(&mut dialog, &[KeyCode::Tab]);
        let buffer = draw(&mut dialog);
        assert!(find_text(&buffer, "No windows available").is_some());
    }
}
