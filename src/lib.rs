//! Pokedex - paginated PokeAPI catalog browser built on tui-dispatch
//!
//! The binary wires these modules to a terminal; the library exposes them for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod detail;
pub mod effect;
pub mod reducer;
pub mod sprite;
pub mod state;
pub mod ui;
