use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::centered_rect;

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_HIGHLIGHT, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::detail::format_name;
use crate::state::{AppState, CatalogEntry, GridMove, HoverTarget, GRID_COLUMNS, PAGE_SIZE};

pub struct CatalogGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// 3x3 card grid for the current page
#[derive(Default)]
pub struct CatalogGrid {
    card_areas: Vec<Rect>,
}

impl CatalogGrid {
    /// Index of the card under a terminal cell, as of the last render.
    pub fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        let position = Position::new(column, row);
        self.card_areas
            .iter()
            .position(|area| area.contains(position))
    }

    fn render_card(
        &self,
        frame: &mut Frame,
        area: Rect,
        index: usize,
        entry: &CatalogEntry,
        props: &CatalogGridProps<'_>,
    ) {
        let state = props.state;
        let is_cursor = props.is_focused && index == state.grid_index;
        let border = if is_cursor { ACCENT_GOLD } else { TEXT_DIM };
        let bg = if is_cursor { BG_HIGHLIGHT } else { BG_BASE };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(bg))
            .title_bottom(
                Line::from(Span::styled(
                    format!(" {} ", format_name(&entry.name)),
                    Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            )
            .title(Span::styled(
                format!(" #{} ", entry.id),
                Style::default().fg(ACCENT_TEAL),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let url = if state.shows_back(HoverTarget::Card(index)) {
            entry.back_sprite().or(entry.front_sprite())
        } else {
            entry.front_sprite()
        };
        render_sprite_slot(frame, inner, state, url);
    }
}

/// Draw a sprite centered in `area`, or a placeholder while it is missing.
pub fn render_sprite_slot(frame: &mut Frame, area: Rect, state: &AppState, url: Option<&str>) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let lines = match (url, state.sprite(url)) {
        (_, Some(sprite)) => sprite.lines(area.width, area.height),
        (Some(url), None) if state.sprites_failed.contains(url) => {
            vec![Line::from(Span::styled("no image", Style::default().fg(TEXT_DIM)))]
        }
        (Some(_), None) => vec![Line::from(Span::styled("...", Style::default().fg(TEXT_DIM)))],
        (None, None) => vec![Line::from(Span::styled("?", Style::default().fg(TEXT_DIM)))],
    };
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + (area.height - height) / 2;
    let slot = Rect {
        x: area.x,
        y: top,
        width: area.width,
        height,
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), slot);
}

impl Component<Action> for CatalogGrid {
    type Props<'a> = CatalogGridProps<'a>;

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
        let has_entry = props.state.grid_entry().is_some();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::GridMove(GridMove::Left)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::GridMove(GridMove::Right)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::GridMove(GridMove::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::GridMove(GridMove::Down)),
            KeyCode::Enter | KeyCode::Char(' ') if has_entry => {
                Some(Action::EntryOpen(props.state.grid_index))
            }
            KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::PageDown => {
                Some(Action::PageForward)
            }
            KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::PageUp => {
                Some(Action::PageBackward)
            }
            KeyCode::Char('r') => Some(Action::PageReload),
            KeyCode::Char('/') => Some(Action::SearchStart),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.card_areas.clear();
        let items = &props.state.page.items;
        if items.is_empty() {
            let text = if props.state.page_loading {
                "Loading..."
            } else {
                "No entries on this page"
            };
            let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(TEXT_DIM)))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, centered_rect(area.width, 1, area));
            return;
        }

        let rows = PAGE_SIZE.div_ceil(GRID_COLUMNS);
        let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);
        for (row, row_area) in row_areas.iter().enumerate() {
            let col_areas =
                Layout::horizontal(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                    .split(*row_area);
            for (col, card_area) in col_areas.iter().enumerate() {
                let index = row * GRID_COLUMNS + col;
                let Some(entry) = items.get(index) else {
                    return;
                };
                self.card_areas.push(*card_area);
                self.render_card(frame, *card_area, index, entry, &props);
            }
        }
    }
}
