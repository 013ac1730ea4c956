use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Borders,
    Frame,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::AppState;

pub struct PagerProps<'a> {
    pub state: &'a AppState,
}

/// Footer: key hints, page indicator with back/forward arrows, load status
pub struct Pager {
    status_bar: StatusBar,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            status_bar: StatusBar::new(),
        }
    }
}

impl Pager {
    fn hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
        if state.notice.is_some() {
            return vec![StatusBarHint::new("Enter", "Dismiss")];
        }
        if state.search.active {
            return vec![
                StatusBarHint::new("Enter", "Search"),
                StatusBarHint::new("Esc", "Back"),
            ];
        }
        if state.selection.detail_visible {
            return vec![
                StatusBarHint::new("b", "Flip"),
                StatusBarHint::new("Esc", "Close"),
                StatusBarHint::new("q", "Quit"),
            ];
        }
        vec![
            StatusBarHint::new("hjkl", "Move"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("n/p", "Page"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("q", "Quit"),
        ]
    }

    fn status(state: &AppState) -> String {
        if let Some(term) = &state.search.pending {
            format!("Searching {term}...")
        } else if state.page_loading {
            format!("Loading page {}...", state.pagination.current_page())
        } else {
            String::new()
        }
    }
}

impl Component<Action> for Pager {
    type Props<'a> = PagerProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let hints = Self::hints(state);

        let enabled = Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD);
        let back_style = if state.pagination.can_page_backward() {
            enabled
        } else {
            Style::default().fg(TEXT_DIM).add_modifier(Modifier::DIM)
        };
        let indicator = [
            StatusBarItem::span(Span::styled("<", back_style)),
            StatusBarItem::span(Span::styled(
                state.page_indicator(),
                Style::default().fg(TEXT_MAIN),
            )),
            StatusBarItem::span(Span::styled(">", enabled)),
        ];

        let status = Self::status(state);
        let status_items = [StatusBarItem::span(Span::styled(
            status.as_str(),
            Style::default().fg(ACCENT_GOLD),
        ))];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: Some(Style::default().fg(ACCENT_TEAL)),
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::items(&indicator).with_separator(" "),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }
}
