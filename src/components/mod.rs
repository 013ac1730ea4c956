pub mod catalog_grid;
pub mod detail_overlay;
pub mod notice_dialog;
pub mod pager;
pub mod search_bar;

use ratatui::style::Color;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_grid::{CatalogGrid, CatalogGridProps};
pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use notice_dialog::{NoticeDialog, NoticeDialogProps};
pub use pager::{Pager, PagerProps};
pub use search_bar::{SearchBar, SearchBarProps};

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const ACCENT_RED: Color = Color::Rgb(222, 92, 84);
