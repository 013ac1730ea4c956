//! Screen composition and event routing

use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};
use tui_dispatch::{EventContext, EventKind, EventRoutingState, HandlerResponse};

use crate::action::Action;
use crate::components::{
    CatalogGrid, CatalogGridProps, Component, DetailOverlay, DetailOverlayProps, NoticeDialog,
    NoticeDialogProps, Pager, PagerProps, SearchBar, SearchBarProps, BG_BASE,
};
use crate::state::{AppState, HoverTarget};

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CatalogComponentId {
    Search,
    Grid,
    Detail,
    Notice,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogContext {
    Search,
    Grid,
    Detail,
    Notice,
}

impl EventRoutingState<CatalogComponentId, CatalogContext> for AppState {
    fn focused(&self) -> Option<CatalogComponentId> {
        self.modal().or(Some(CatalogComponentId::Grid))
    }

    fn modal(&self) -> Option<CatalogComponentId> {
        if self.notice.is_some() {
            Some(CatalogComponentId::Notice)
        } else if self.search.active {
            Some(CatalogComponentId::Search)
        } else if self.selection.detail_visible {
            Some(CatalogComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: CatalogComponentId) -> CatalogContext {
        match id {
            CatalogComponentId::Search => CatalogContext::Search,
            CatalogComponentId::Grid => CatalogContext::Grid,
            CatalogComponentId::Detail => CatalogContext::Detail,
            CatalogComponentId::Notice => CatalogContext::Notice,
        }
    }

    fn default_context(&self) -> CatalogContext {
        CatalogContext::Grid
    }
}

/// Areas drawn in the last frame, keyed by component.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UiAreas {
    pub search: Rect,
    pub grid: Rect,
    pub footer: Rect,
    pub detail: Option<Rect>,
}

#[derive(Default)]
pub struct CatalogUi {
    search: SearchBar,
    grid: CatalogGrid,
    pager: Pager,
    detail: DetailOverlay,
    notice: NoticeDialog,
}

impl CatalogUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        event_ctx: &mut EventContext<CatalogComponentId>,
    ) {
        let areas = self.draw(frame, area, state);
        event_ctx.set_component_area(CatalogComponentId::Search, areas.search);
        event_ctx.set_component_area(CatalogComponentId::Grid, areas.grid);
        match areas.detail {
            Some(detail) => event_ctx.set_component_area(CatalogComponentId::Detail, detail),
            None => {
                event_ctx
                    .component_areas
                    .remove(&CatalogComponentId::Detail);
            }
        }
        if state.notice.is_some() {
            event_ctx.set_component_area(CatalogComponentId::Notice, area);
        } else {
            event_ctx
                .component_areas
                .remove(&CatalogComponentId::Notice);
        }
    }

    /// Draw every component and return where each landed.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> UiAreas {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let [search_area, grid_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .areas(area);

        let focused = state.focused();
        self.search.render(
            frame,
            search_area,
            SearchBarProps {
                query: &state.search.query,
                is_focused: focused == Some(CatalogComponentId::Search),
                pending: state.search.pending.as_deref(),
            },
        );
        self.grid.render(
            frame,
            grid_area,
            CatalogGridProps {
                state,
                is_focused: focused == Some(CatalogComponentId::Grid),
            },
        );
        self.pager
            .render(frame, footer_area, PagerProps { state });

        let detail = if state.selection.visible_entry().is_some() {
            self.detail.render(
                frame,
                grid_area,
                DetailOverlayProps {
                    state,
                    is_focused: focused == Some(CatalogComponentId::Detail),
                },
            );
            Some(DetailOverlay::popup_area(grid_area))
        } else {
            self.detail.hide();
            None
        };

        self.notice.render(
            frame,
            area,
            NoticeDialogProps {
                notice: state.notice.as_ref(),
            },
        );

        UiAreas {
            search: search_area,
            grid: grid_area,
            footer: footer_area,
            detail,
        }
    }

    /// Sprite slot under the pointer. The detail popup hides the grid below it.
    pub fn hover_target(&self, column: u16, row: u16, state: &AppState) -> Option<HoverTarget> {
        if state.selection.detail_visible {
            return self
                .detail
                .sprite_contains(column, row)
                .then_some(HoverTarget::Detail);
        }
        self.grid.card_at(column, row).map(HoverTarget::Card)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            query: &state.search.query,
            is_focused: true,
            pending: state.search.pending.as_deref(),
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        // Modal: typed characters never fall through to grid shortcuts.
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    pub fn handle_grid_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CatalogGridProps {
            state,
            is_focused: true,
        };
        handler_response(self.grid.handle_event(event, props).into_iter().collect())
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DetailOverlayProps {
            state,
            is_focused: true,
        };
        handler_response(self.detail.handle_event(event, props).into_iter().collect())
    }

    pub fn handle_notice_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = NoticeDialogProps {
            notice: state.notice.as_ref(),
        };
        let actions: Vec<_> = self.notice.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    /// Pointer hover and clicks, hit-tested against the last frame.
    pub fn handle_mouse_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let EventKind::Mouse(mouse) = event else {
            return HandlerResponse::ignored();
        };
        let (column, row) = (mouse.column, mouse.row);
        let mut actions = Vec::new();
        match mouse.kind {
            MouseEventKind::Moved => {
                if state.notice.is_some() || state.search.active {
                    return HandlerResponse::ignored();
                }
                let target = self.hover_target(column, row, state);
                if target != state.hover {
                    actions.push(Action::HoverSet(target));
                }
                if let Some(HoverTarget::Card(index)) = target {
                    if index != state.grid_index {
                        actions.push(Action::GridSelect(index));
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if state.notice.is_some() {
                    return HandlerResponse::ignored();
                }
                if state.selection.detail_visible {
                    if !self.detail.contains(column, row) {
                        actions.push(Action::DetailClose);
                    }
                } else if let Some(index) = self.grid.card_at(column, row) {
                    if state.search.active {
                        actions.push(Action::SearchCancel);
                    }
                    actions.push(Action::EntryOpen(index));
                }
            }
            _ => {}
        }
        handler_response(actions)
    }
}

/// Application-wide keys that apply outside text entry.
pub fn handle_global_key(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    match event {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}
