use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::centered_rect;

use super::{Component, ACCENT_RED, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::Notice;

const DIALOG_WIDTH: u16 = 48;

pub struct NoticeDialogProps<'a> {
    pub notice: Option<&'a Notice>,
}

/// Error dialog. Captures all keys while shown.
#[derive(Default)]
pub struct NoticeDialog;

impl Component<Action> for NoticeDialog {
    type Props<'a> = NoticeDialogProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if props.notice.is_none() {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::NoticeDismiss),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let Some(notice) = props.notice else {
            return;
        };
        let text_width = DIALOG_WIDTH.saturating_sub(4).max(1) as usize;
        let message_rows = notice.message.chars().count().div_ceil(text_width).max(1) as u16;
        let dialog = centered_rect(DIALOG_WIDTH, message_rows + 5, area);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT_RED))
            .title(Span::styled(
                format!(" {} ", notice.title),
                Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));

        let lines = vec![
            Line::default(),
            Line::from(notice.message.clone()),
            Line::default(),
            Line::from(Span::styled("[Enter] OK", Style::default().fg(TEXT_DIM))),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            dialog,
        );
    }
}
