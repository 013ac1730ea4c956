use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{CatalogEntry, CatalogPage, GridMove, HoverTarget};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    PageForward,
    PageBackward,
    PageReload,
    PageDidLoad { offset: usize, page: CatalogPage },
    PageDidError { offset: usize, error: String },

    GridMove(GridMove),
    GridSelect(usize),

    EntryOpen(usize),
    DetailClose,
    DetailFlip,
    HoverSet(Option<HoverTarget>),

    SearchStart,
    SearchCancel,
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
    SearchDidLoad { term: String, entry: CatalogEntry },
    SearchDidError { term: String, error: String },

    SpriteDidLoad { url: String, sprite: SpriteData },
    SpriteDidError { url: String, error: String },

    NoticeDismiss,

    UiTerminalResize(u16, u16),
    Quit,
}
