//! Application state - single source of truth

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::sprite::SpriteData;

/// Number of entries requested per listing call.
pub const PAGE_SIZE: usize = 9;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedResource {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrySprites {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeSlot {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub type_info: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitySlot {
    #[serde(deserialize_with = "null_as_default")]
    pub ability: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatSlot {
    pub base_stat: Option<u16>,
    #[serde(deserialize_with = "null_as_default")]
    pub stat: NamedResource,
}

/// Full creature record as returned by `/pokemon/{id}`.
///
/// Every field is optional on the wire, nested slots included, and `null`
/// reads as absent. An incomplete record still decodes and the presenter
/// fills the gaps with placeholders.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sprites: EntrySprites,
    #[serde(deserialize_with = "null_as_default")]
    pub types: Vec<TypeSlot>,
    #[serde(deserialize_with = "null_as_default")]
    pub abilities: Vec<AbilitySlot>,
    pub height: Option<u32>,
    pub weight: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub stats: Vec<StatSlot>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogEntry {
    /// A record without a name or id does not describe any creature.
    pub fn is_identified(&self) -> bool {
        self.id != 0 && !self.name.is_empty()
    }

    pub fn front_sprite(&self) -> Option<&str> {
        self.sprites.front_default.as_deref()
    }

    pub fn back_sprite(&self) -> Option<&str> {
        self.sprites.back_default.as_deref()
    }

    /// Base stat at a fixed position of the API's stat array.
    pub fn base_stat(&self, index: usize) -> Option<u16> {
        self.stats.get(index).and_then(|slot| slot.base_stat)
    }

    pub fn sprite_urls(&self) -> impl Iterator<Item = &str> {
        self.front_sprite().into_iter().chain(self.back_sprite())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogEntry>,
    pub total_count: usize,
}

/// Offset into the full result set. Only moves in steps of [`PAGE_SIZE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    offset: usize,
}

impl PaginationState {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn can_page_backward(&self) -> bool {
        self.offset > 0
    }

    pub fn page_forward(&mut self) {
        self.offset += PAGE_SIZE;
    }

    /// Returns false (and leaves the offset alone) on the first page.
    pub fn page_backward(&mut self) -> bool {
        if !self.can_page_backward() {
            return false;
        }
        self.offset -= PAGE_SIZE;
        true
    }

    /// Jump back to an offset previously produced by this controller.
    pub fn restore(&mut self, offset: usize) {
        self.offset = offset - offset % PAGE_SIZE;
    }

    pub fn current_page(&self) -> usize {
        self.offset / PAGE_SIZE + 1
    }

    /// Truncating division: 20 entries report 2 pages, not 3.
    pub fn total_pages(total_count: usize) -> usize {
        total_count / PAGE_SIZE
    }

    pub fn indicator(&self, total_count: usize) -> String {
        format!("{}/{}", self.current_page(), Self::total_pages(total_count))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected: Option<CatalogEntry>,
    pub detail_visible: bool,
}

impl SelectionState {
    pub fn open(&mut self, entry: CatalogEntry) {
        self.selected = Some(entry);
        self.detail_visible = true;
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.detail_visible = false;
    }

    pub fn visible_entry(&self) -> Option<&CatalogEntry> {
        if self.detail_visible {
            self.selected.as_ref()
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    pub pending: Option<String>,
}

/// Lowercased, trimmed search identifier. `None` means "do not search".
pub fn normalize_search_term(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn search_failed(term: &str) -> Self {
        Self {
            title: "Oops...".to_string(),
            message: format!("Pokemon {term} not found"),
        }
    }

    pub fn page_failed(page: usize, error: &str) -> Self {
        Self {
            title: "Oops...".to_string(),
            message: format!("Could not load page {page}: {error}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverTarget {
    Card(usize),
    Detail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridMove {
    Left,
    Right,
    Up,
    Down,
}

pub const GRID_COLUMNS: usize = 3;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub pagination: PaginationState,
    /// Last page successfully fetched for `pagination`.
    pub page: CatalogPage,
    /// Offset the displayed `page` was fetched for.
    pub page_offset: Option<usize>,
    pub page_loading: bool,
    pub grid_index: usize,

    pub selection: SelectionState,
    pub show_back: bool,
    pub hover: Option<HoverTarget>,

    pub search: SearchState,
    pub notice: Option<Notice>,

    pub sprites: HashMap<String, SpriteData>,
    pub sprites_pending: HashSet<String>,
    pub sprites_failed: HashSet<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            pagination: PaginationState::default(),
            page: CatalogPage::default(),
            page_offset: None,
            page_loading: false,
            grid_index: 0,
            selection: SelectionState::default(),
            show_back: false,
            hover: None,
            search: SearchState::default(),
            notice: None,
            sprites: HashMap::new(),
            sprites_pending: HashSet::new(),
            sprites_failed: HashSet::new(),
        }
    }
}

impl AppState {
    pub fn page_indicator(&self) -> String {
        self.pagination.indicator(self.page.total_count)
    }

    pub fn grid_entry(&self) -> Option<&CatalogEntry> {
        self.page.items.get(self.grid_index)
    }

    /// Move the card cursor within the 3-column grid. Returns true if it moved.
    pub fn move_grid(&mut self, step: GridMove) -> bool {
        let len = self.page.items.len();
        if len == 0 {
            return false;
        }
        let current = self.grid_index.min(len - 1);
        let next = match step {
            GridMove::Left if current % GRID_COLUMNS > 0 => current - 1,
            GridMove::Right if current % GRID_COLUMNS + 1 < GRID_COLUMNS => current + 1,
            GridMove::Up if current >= GRID_COLUMNS => current - GRID_COLUMNS,
            GridMove::Down => current + GRID_COLUMNS,
            _ => current,
        };
        if next >= len || next == self.grid_index {
            return false;
        }
        self.grid_index = next;
        true
    }

    /// Whether a sprite slot should show the back image.
    pub fn shows_back(&self, target: HoverTarget) -> bool {
        match target {
            HoverTarget::Detail => self.show_back ^ (self.hover == Some(HoverTarget::Detail)),
            HoverTarget::Card(_) => self.hover == Some(target),
        }
    }

    pub fn sprite(&self, url: Option<&str>) -> Option<&SpriteData> {
        self.sprites.get(url?)
    }

    /// URLs still on screen: the visible page and the selected entry.
    pub fn referenced_sprites(&self) -> HashSet<String> {
        self.page
            .items
            .iter()
            .chain(self.selection.selected.as_ref())
            .flat_map(|entry| entry.sprite_urls())
            .map(str::to_string)
            .collect()
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry("offset", ron_string(&self.pagination.offset()))
                .entry("page", ron_string(&self.page_indicator()))
                .entry("page_offset", ron_string(&self.page_offset))
                .entry("entries", ron_string(&self.page.items.len()))
                .entry("loading", ron_string(&self.page_loading))
                .entry("grid_index", ron_string(&self.grid_index)),
            DebugSection::new("Selection")
                .entry(
                    "selected",
                    ron_string(&self.selection.selected.as_ref().map(|e| e.name.clone())),
                )
                .entry("detail_visible", ron_string(&self.selection.detail_visible))
                .entry("show_back", ron_string(&self.show_back))
                .entry("hover", ron_string(&self.hover)),
            DebugSection::new("Search")
                .entry("active", ron_string(&self.search.active))
                .entry("query", ron_string(&self.search.query))
                .entry("pending", ron_string(&self.search.pending)),
            DebugSection::new("Status")
                .entry("notice", ron_string(&self.notice))
                .entry("sprites", ron_string(&self.sprites.len()))
                .entry("sprites_pending", ron_string(&self.sprites_pending.len()))
                .entry("sprites_failed", ron_string(&self.sprites_failed.len())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_backward_is_noop_on_first_page() {
        let mut pagination = PaginationState::default();
        assert!(!pagination.can_page_backward());
        assert!(!pagination.page_backward());
        assert_eq!(pagination.offset(), 0);

        pagination.page_forward();
        assert!(pagination.page_backward());
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_offset_stays_multiple_of_page_size() {
        let mut pagination = PaginationState::default();
        for _ in 0..5 {
            pagination.page_forward();
        }
        pagination.page_backward();
        assert_eq!(pagination.offset(), 36);
        assert_eq!(pagination.offset() % PAGE_SIZE, 0);

        pagination.restore(40);
        assert_eq!(pagination.offset(), 36);
    }

    #[test]
    fn test_current_page_for_offsets() {
        let mut pagination = PaginationState::default();
        for page in 1..=20 {
            assert_eq!(pagination.current_page(), page);
            assert_eq!(pagination.current_page(), pagination.offset() / PAGE_SIZE + 1);
            pagination.page_forward();
        }
    }

    #[test]
    fn test_total_pages_truncates() {
        assert_eq!(PaginationState::total_pages(20), 2);
        assert_eq!(PaginationState::total_pages(18), 2);
        assert_eq!(PaginationState::total_pages(8), 0);
        assert_eq!(PaginationState::total_pages(1302), 144);
        assert_eq!(PaginationState::default().indicator(1302), "1/144");
    }

    #[test]
    fn test_normalize_search_term() {
        assert_eq!(normalize_search_term(""), None);
        assert_eq!(normalize_search_term("   "), None);
        assert_eq!(normalize_search_term("PIKACHU"), Some("pikachu".to_string()));
        assert_eq!(normalize_search_term(" 25 "), Some("25".to_string()));
    }

    #[test]
    fn test_grid_moves_stay_inside_page() {
        let mut state = AppState::default();
        state.page.items = vec![CatalogEntry::default(); 7];

        assert!(!state.move_grid(GridMove::Left));
        assert!(!state.move_grid(GridMove::Up));
        assert!(state.move_grid(GridMove::Right));
        assert!(state.move_grid(GridMove::Right));
        assert!(!state.move_grid(GridMove::Right));
        assert_eq!(state.grid_index, 2);

        assert!(state.move_grid(GridMove::Down));
        assert_eq!(state.grid_index, 5);
        // Row three only holds index 6.
        assert!(!state.move_grid(GridMove::Down));
        state.grid_index = 3;
        assert!(state.move_grid(GridMove::Down));
        assert_eq!(state.grid_index, 6);
    }

    #[test]
    fn test_entry_decodes_with_missing_fields() {
        let entry: CatalogEntry = serde_json::from_str(r#"{"name":"missingno"}"#).unwrap();
        assert_eq!(entry.name, "missingno");
        assert_eq!(entry.base_stat(5), None);
        assert_eq!(entry.front_sprite(), None);
        assert!(entry.types.is_empty());
    }

    #[test]
    fn test_entry_decodes_with_null_and_incomplete_slots() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{
                "id": 132,
                "name": null,
                "sprites": null,
                "types": [{ "slot": 1 }, { "type": null }],
                "abilities": [{ "ability": { "name": "limber", "url": null } }],
                "stats": [
                    { "stat": { "name": "hp" } },
                    { "base_stat": 48, "stat": null },
                    { "base_stat": null }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(entry.id, 132);
        assert_eq!(entry.name, "");
        assert!(!entry.is_identified());
        assert_eq!(entry.front_sprite(), None);
        assert_eq!(entry.types.len(), 2);
        assert_eq!(entry.types[0].type_info.name, "");
        assert_eq!(entry.abilities[0].ability.name, "limber");
        assert_eq!(entry.base_stat(0), None);
        assert_eq!(entry.base_stat(1), Some(48));
        assert_eq!(entry.base_stat(2), None);
    }
}
