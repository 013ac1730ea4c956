use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::centered_rect;

use super::catalog_grid::render_sprite_slot;
use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::detail::EntryDetail;
use crate::state::{AppState, HoverTarget};

const POPUP_WIDTH: u16 = 64;
const POPUP_HEIGHT: u16 = 20;
const SPRITE_WIDTH: u16 = 28;

pub struct DetailOverlayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Popup with the selected entry's detail fields
#[derive(Default)]
pub struct DetailOverlay {
    area: Option<Rect>,
    sprite_area: Option<Rect>,
}

impl DetailOverlay {
    /// Popup rect inside `area`.
    pub fn popup_area(area: Rect) -> Rect {
        centered_rect(POPUP_WIDTH, POPUP_HEIGHT, area)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    pub fn sprite_contains(&self, column: u16, row: u16) -> bool {
        self.sprite_area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    /// Forget recorded areas once the popup is no longer drawn.
    pub fn hide(&mut self) {
        self.area = None;
        self.sprite_area = None;
    }
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(TEXT_DIM)),
        Span::styled(value, Style::default().fg(TEXT_MAIN)),
    ])
}

fn detail_lines(detail: &EntryDetail) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            detail.name.clone(),
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        field_line("Type", join_or_placeholder(&detail.types)),
        field_line("Height", detail.height.clone()),
        field_line("Weight", detail.weight.clone()),
        Line::default(),
    ];
    lines.extend(
        detail
            .stat_rows()
            .into_iter()
            .map(|(label, value)| field_line(label, value)),
    );
    lines.push(Line::default());
    lines.push(field_line("Abilities", join_or_placeholder(&detail.abilities)));
    lines
}

fn join_or_placeholder(values: &[String]) -> String {
    if values.is_empty() {
        crate::detail::PLACEHOLDER.to_string()
    } else {
        values.join(", ")
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => Some(Action::DetailClose),
            KeyCode::Char('b') | KeyCode::Char(' ') => Some(Action::DetailFlip),
            KeyCode::Char('/') => Some(Action::SearchStart),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let Some(entry) = state.selection.visible_entry() else {
            self.hide();
            return;
        };
        let detail = EntryDetail::from_entry(entry);

        let popup = Self::popup_area(area);
        self.area = Some(popup);
        frame.render_widget(Clear, popup);

        let border = if props.is_focused { ACCENT_TEAL } else { TEXT_DIM };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                format!(" #{} ", entry.id),
                Style::default().fg(ACCENT_TEAL),
            ))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [sprite_area, info_area] = Layout::horizontal([
            Constraint::Length(SPRITE_WIDTH.min(inner.width / 2)),
            Constraint::Min(0),
        ])
        .spacing(1)
        .areas(inner);
        self.sprite_area = Some(sprite_area);

        let url = if state.shows_back(HoverTarget::Detail) {
            detail.back_sprite.as_deref().or(detail.front_sprite.as_deref())
        } else {
            detail.front_sprite.as_deref()
        };
        render_sprite_slot(frame, sprite_area, state, url);

        frame.render_widget(
            Paragraph::new(detail_lines(&detail)).wrap(Wrap { trim: true }),
            info_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CatalogEntry, StatSlot};
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn state_with_selection() -> AppState {
        let mut state = AppState::default();
        state.selection.open(CatalogEntry {
            id: 25,
            name: "pikachu".into(),
            height: Some(4),
            weight: Some(60),
            stats: [35, 55, 40, 50, 50, 90]
                .into_iter()
                .map(|base_stat| StatSlot {
                    base_stat: Some(base_stat),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        });
        state
    }

    #[test]
    fn test_keys_close_and_flip() {
        let state = state_with_selection();
        let mut overlay = DetailOverlay::default();
        let props = || DetailOverlayProps {
            state: &state,
            is_focused: true,
        };
        let actions: Vec<_> = overlay
            .handle_event(&EventKind::Key(key("b")), props())
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailFlip);

        let actions: Vec<_> = overlay
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
                props(),
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailClose);
    }

    #[test]
    fn test_render_shows_fields() {
        let state = state_with_selection();
        let mut overlay = DetailOverlay::default();
        let mut render = RenderHarness::new(80, 24);
        let output = render.render_to_string_plain(|frame| {
            let props = DetailOverlayProps {
                state: &state,
                is_focused: true,
            };
            overlay.render(frame, frame.area(), props);
        });

        assert!(output.contains("Pikachu"));
        assert!(output.contains("0.4 M"));
        assert!(output.contains("6 Kg"));
        assert!(output.contains("90"));
        assert!(overlay.contains(40, 12));
        assert!(!overlay.contains(0, 0));
    }

    #[test]
    fn test_popup_is_centered_with_margin() {
        let popup = DetailOverlay::popup_area(Rect::new(0, 0, 80, 24));
        assert_eq!(popup, Rect::new(8, 2, POPUP_WIDTH, POPUP_HEIGHT));

        // Small terminals keep a one-cell border around the popup.
        let popup = DetailOverlay::popup_area(Rect::new(0, 3, 40, 12));
        assert_eq!(popup, Rect::new(1, 4, 38, 10));
    }

    #[test]
    fn test_render_without_selection_clears_areas() {
        let mut overlay = DetailOverlay::default();
        let state = AppState::default();
        let mut render = RenderHarness::new(80, 24);
        render.render_to_string_plain(|frame| {
            let props = DetailOverlayProps {
                state: &state,
                is_focused: true,
            };
            overlay.render(frame, frame.area(), props);
        });
        assert!(!overlay.contains(40, 12));
    }
}
