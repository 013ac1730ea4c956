//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{normalize_search_term, AppState, Notice};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init | Action::PageReload => load_current_page(state),

        // ===== Pagination =====
        Action::PageForward => {
            state.pagination.page_forward();
            load_current_page(state)
        }

        Action::PageBackward => {
            if !state.pagination.page_backward() {
                return DispatchResult::unchanged();
            }
            load_current_page(state)
        }

        Action::PageDidLoad { offset, page } => {
            if offset != state.pagination.offset() {
                return DispatchResult::unchanged();
            }
            state.page = page;
            state.page_offset = Some(offset);
            state.page_loading = false;
            state.grid_index = 0;
            if matches!(state.hover, Some(crate::state::HoverTarget::Card(_))) {
                state.hover = None;
            }
            let effects = sprite_effects(state);
            if effects.is_empty() {
                DispatchResult::changed()
            } else {
                DispatchResult::changed_with_many(effects)
            }
        }

        Action::PageDidError { offset, error } => {
            if offset != state.pagination.offset() {
                return DispatchResult::unchanged();
            }
            let failed_page = state.pagination.current_page();
            state.page_loading = false;
            if let Some(displayed) = state.page_offset {
                state.pagination.restore(displayed);
            }
            state.notice = Some(Notice::page_failed(failed_page, &error));
            DispatchResult::changed()
        }

        // ===== Grid =====
        Action::GridMove(step) => {
            if state.move_grid(step) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::GridSelect(index) => {
            if index >= state.page.items.len() || index == state.grid_index {
                return DispatchResult::unchanged();
            }
            state.grid_index = index;
            DispatchResult::changed()
        }

        // ===== Detail =====
        Action::EntryOpen(index) => {
            let Some(entry) = state.page.items.get(index).cloned() else {
                return DispatchResult::unchanged();
            };
            state.grid_index = index;
            open_detail(state, entry)
        }

        Action::DetailClose => {
            if !state.selection.detail_visible {
                return DispatchResult::unchanged();
            }
            state.selection.close();
            state.show_back = false;
            if state.hover == Some(crate::state::HoverTarget::Detail) {
                state.hover = None;
            }
            prune_sprites(state);
            DispatchResult::changed()
        }

        Action::DetailFlip => {
            if !state.selection.detail_visible {
                return DispatchResult::unchanged();
            }
            state.show_back = !state.show_back;
            DispatchResult::changed()
        }

        Action::HoverSet(target) => {
            if state.hover == target {
                return DispatchResult::unchanged();
            }
            state.hover = target;
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            let Some(id) = normalize_search_term(&state.search.query) else {
                return DispatchResult::unchanged();
            };
            let term = state.search.query.trim().to_string();
            state.search.pending = Some(term.clone());
            DispatchResult::changed_with(Effect::SearchEntry { term, id })
        }

        Action::SearchDidLoad { term, entry } => {
            if state.search.pending.as_deref() == Some(term.as_str()) {
                state.search.pending = None;
            }
            state.search.active = false;
            open_detail(state, entry)
        }

        Action::SearchDidError { term, error: _ } => {
            if state.search.pending.as_deref() == Some(term.as_str()) {
                state.search.pending = None;
            }
            state.notice = Some(Notice::search_failed(&term));
            DispatchResult::changed()
        }

        // ===== Sprites =====
        Action::SpriteDidLoad { url, sprite } => {
            state.sprites_pending.remove(&url);
            if !state.referenced_sprites().contains(&url) {
                return DispatchResult::unchanged();
            }
            state.sprites.insert(url, sprite);
            DispatchResult::changed()
        }

        Action::SpriteDidError { url, error: _ } => {
            state.sprites_pending.remove(&url);
            state.sprites_failed.insert(url);
            DispatchResult::changed()
        }

        Action::NoticeDismiss => {
            if state.notice.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn load_current_page(state: &mut AppState) -> DispatchResult<Effect> {
    state.page_loading = true;
    DispatchResult::changed_with(Effect::LoadPage {
        offset: state.pagination.offset(),
    })
}

fn open_detail(state: &mut AppState, entry: crate::state::CatalogEntry) -> DispatchResult<Effect> {
    state.selection.open(entry);
    state.show_back = false;
    let effects = sprite_effects(state);
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

/// Drop sprites nobody shows and request the missing ones.
fn sprite_effects(state: &mut AppState) -> Vec<Effect> {
    prune_sprites(state);
    let mut effects = Vec::new();
    let mut wanted: Vec<String> = state.referenced_sprites().into_iter().collect();
    wanted.sort();
    for url in wanted {
        if state.sprites.contains_key(&url)
            || state.sprites_pending.contains(&url)
            || state.sprites_failed.contains(&url)
        {
            continue;
        }
        state.sprites_pending.insert(url.clone());
        effects.push(Effect::LoadSprite { url });
    }
    effects
}

fn prune_sprites(state: &mut AppState) {
    let referenced = state.referenced_sprites();
    state.sprites.retain(|url, _| referenced.contains(url));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CatalogEntry, CatalogPage, EntrySprites, HoverTarget, PAGE_SIZE};

    fn entry(id: u32, name: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn page(names: &[&str], total_count: usize) -> CatalogPage {
        CatalogPage {
            items: names
                .iter()
                .enumerate()
                .map(|(idx, name)| entry(idx as u32 + 1, name))
                .collect(),
            total_count,
        }
    }

    #[test]
    fn test_init_requests_first_page() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert!(state.page_loading);
        assert_eq!(result.effects, vec![Effect::LoadPage { offset: 0 }]);
    }

    #[test]
    fn test_page_backward_noop_at_zero() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::PageBackward);

        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.pagination.offset(), 0);
    }

    #[test]
    fn test_page_forward_then_backward() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::PageForward);
        assert_eq!(result.effects, vec![Effect::LoadPage { offset: PAGE_SIZE }]);

        let result = reducer(&mut state, Action::PageBackward);
        assert_eq!(result.effects, vec![Effect::LoadPage { offset: 0 }]);
        assert_eq!(state.pagination.offset(), 0);
    }

    #[test]
    fn test_stale_page_is_discarded() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::PageForward);
        reducer(&mut state, Action::PageForward);

        let result = reducer(
            &mut state,
            Action::PageDidLoad {
                offset: PAGE_SIZE,
                page: page(&["stale"], 1302),
            },
        );
        assert!(!result.changed);
        assert!(state.page.items.is_empty());
        assert!(state.page_loading);

        reducer(
            &mut state,
            Action::PageDidLoad {
                offset: 2 * PAGE_SIZE,
                page: page(&["fresh"], 1302),
            },
        );
        assert_eq!(state.page.items[0].name, "fresh");
        assert_eq!(state.page_offset, Some(18));
        assert!(!state.page_loading);
        assert_eq!(state.page_indicator(), "3/144");
    }

    #[test]
    fn test_page_error_keeps_page_and_rolls_back_offset() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(
            &mut state,
            Action::PageDidLoad {
                offset: 0,
                page: page(&["bulbasaur", "ivysaur"], 1302),
            },
        );
        reducer(&mut state, Action::PageForward);
        let result = reducer(
            &mut state,
            Action::PageDidError {
                offset: PAGE_SIZE,
                error: "timeout".into(),
            },
        );

        assert!(result.changed);
        assert_eq!(state.pagination.offset(), 0);
        assert_eq!(state.page.items.len(), 2);
        assert!(!state.page_loading);
        let notice = state.notice.as_ref().unwrap();
        assert_eq!(notice.message, "Could not load page 2: timeout");
    }

    #[test]
    fn test_stale_page_error_is_ignored() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PageForward);
        let result = reducer(
            &mut state,
            Action::PageDidError {
                offset: 0,
                error: "late".into(),
            },
        );
        assert!(!result.changed);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_empty_search_does_nothing() {
        let mut state = AppState::default();
        state.search.active = true;
        let result = reducer(&mut state, Action::SearchSubmit);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.selection.selected, None);
    }

    #[test]
    fn test_search_normalizes_term() {
        let mut state = AppState::default();
        for ch in "PIKACHU".chars() {
            reducer(&mut state, Action::SearchInput(ch));
        }
        let result = reducer(&mut state, Action::SearchSubmit);
        assert_eq!(
            result.effects,
            vec![Effect::SearchEntry {
                term: "PIKACHU".into(),
                id: "pikachu".into(),
            }]
        );
        assert_eq!(state.search.pending.as_deref(), Some("PIKACHU"));
    }

    #[test]
    fn test_search_error_leaves_selection() {
        let mut state = AppState::default();
        state.selection.open(entry(1, "bulbasaur"));
        state.search.query = "Agumon".into();
        reducer(&mut state, Action::SearchSubmit);

        reducer(
            &mut state,
            Action::SearchDidError {
                term: "Agumon".into(),
                error: "agumon not found".into(),
            },
        );
        assert_eq!(state.selection.selected.as_ref().unwrap().name, "bulbasaur");
        assert!(state.selection.detail_visible);
        assert_eq!(state.notice, Some(Notice::search_failed("Agumon")));
        assert_eq!(state.search.pending, None);
    }

    #[test]
    fn test_search_success_opens_detail() {
        let mut state = AppState::default();
        state.search.active = true;
        let result = reducer(
            &mut state,
            Action::SearchDidLoad {
                term: "pikachu".into(),
                entry: entry(25, "pikachu"),
            },
        );
        assert!(result.changed);
        assert!(!state.search.active);
        assert!(state.selection.detail_visible);
        assert_eq!(state.selection.selected.as_ref().unwrap().id, 25);
    }

    #[test]
    fn test_open_and_close_detail() {
        let mut state = AppState::default();
        state.page = page(&["bulbasaur", "ivysaur", "venusaur"], 3);

        reducer(&mut state, Action::EntryOpen(2));
        assert_eq!(state.grid_index, 2);
        assert_eq!(state.selection.visible_entry().unwrap().name, "venusaur");

        reducer(&mut state, Action::DetailFlip);
        assert!(state.show_back);

        reducer(&mut state, Action::DetailClose);
        assert_eq!(state.selection.selected, None);
        assert!(!state.selection.detail_visible);
        assert!(!state.show_back);

        let result = reducer(&mut state, Action::EntryOpen(7));
        assert!(!result.changed);
    }

    #[test]
    fn test_page_load_requests_missing_sprites_once() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let mut loaded = page(&["bulbasaur"], 1);
        loaded.items[0].sprites = EntrySprites {
            front_default: Some("http://img/1.png".into()),
            back_default: Some("http://img/back/1.png".into()),
        };

        let result = reducer(
            &mut state,
            Action::PageDidLoad {
                offset: 0,
                page: loaded,
            },
        );
        assert_eq!(result.effects.len(), 2);
        assert_eq!(state.sprites_pending.len(), 2);

        // Opening the same entry must not refetch pending sprites.
        let result = reducer(&mut state, Action::EntryOpen(0));
        assert!(result.effects.is_empty());

        reducer(
            &mut state,
            Action::SpriteDidError {
                url: "http://img/back/1.png".into(),
                error: "404".into(),
            },
        );
        assert!(state.sprites_failed.contains("http://img/back/1.png"));
        assert_eq!(state.sprites_pending.len(), 1);
    }

    #[test]
    fn test_hover_set() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::HoverSet(Some(HoverTarget::Card(4))));
        assert!(result.changed);
        assert!(state.shows_back(HoverTarget::Card(4)));
        assert!(!state.shows_back(HoverTarget::Card(3)));

        let result = reducer(&mut state, Action::HoverSet(Some(HoverTarget::Card(4))));
        assert!(!result.changed);
    }

    #[test]
    fn test_notice_dismiss() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::NoticeDismiss).changed);
        state.notice = Some(Notice::search_failed("x"));
        assert!(reducer(&mut state, Action::NoticeDismiss).changed);
        assert!(state.notice.is_none());
    }
}
