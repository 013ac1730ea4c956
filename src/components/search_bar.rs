use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;

pub const TITLE: &str = "PokeDex 2.0";
const PLACEHOLDER: &str = "Search a Pokemon";

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_focused: bool,
    pub pending: Option<&'a str>,
}

/// Title bar with the search field
#[derive(Default)]
pub struct SearchBar;

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

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
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) => Some(Action::SearchInput(ch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let field = if props.query.is_empty() && !props.is_focused {
            Span::styled(PLACEHOLDER, Style::default().fg(TEXT_DIM))
        } else if props.is_focused {
            Span::styled(
                format!("{}_", props.query),
                Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(props.query.to_string(), Style::default().fg(TEXT_MAIN))
        };
        let mut spans = vec![Span::styled("/ ", Style::default().fg(ACCENT_TEAL)), field];
        if let Some(term) = props.pending {
            spans.push(Span::styled(
                format!("  searching {term}..."),
                Style::default().fg(ACCENT_GOLD),
            ));
        } else if props.is_focused {
            spans.push(Span::styled(
                "  [Enter] Search",
                Style::default().fg(TEXT_DIM),
            ));
        }

        let border = if props.is_focused { ACCENT_TEAL } else { TEXT_DIM };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                TITLE,
                Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(Style::default().fg(border));
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}
