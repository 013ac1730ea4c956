//! Detail view-model for a single entry.

use crate::state::CatalogEntry;

// Positions in the API's stat array: hp, attack, defense, special-attack,
// special-defense, speed.
const STAT_HP: usize = 0;
const STAT_ATTACK: usize = 1;
const STAT_DEFENSE: usize = 2;
const STAT_SPEED: usize = 5;

pub const PLACEHOLDER: &str = "--";

#[derive(Clone, Debug, PartialEq)]
pub struct EntryDetail {
    pub name: String,
    pub front_sprite: Option<String>,
    pub back_sprite: Option<String>,
    pub types: Vec<String>,
    pub height: String,
    pub weight: String,
    pub attack: Option<u16>,
    pub defense: Option<u16>,
    pub hp: Option<u16>,
    pub speed: Option<u16>,
    pub abilities: Vec<String>,
}

impl EntryDetail {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            name: if entry.name.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                format_name(&entry.name)
            },
            front_sprite: entry.sprites.front_default.clone(),
            back_sprite: entry.sprites.back_default.clone(),
            types: entry
                .types
                .iter()
                .map(|slot| format_name(&slot.type_info.name))
                .collect(),
            height: format_tenths(entry.height, "M"),
            weight: format_tenths(entry.weight, "Kg"),
            attack: entry.base_stat(STAT_ATTACK),
            defense: entry.base_stat(STAT_DEFENSE),
            hp: entry.base_stat(STAT_HP),
            speed: entry.base_stat(STAT_SPEED),
            abilities: entry
                .abilities
                .iter()
                .map(|slot| format_name(&slot.ability.name))
                .collect(),
        }
    }

    /// Labelled stats in display order.
    pub fn stat_rows(&self) -> [(&'static str, String); 4] {
        [
            ("ATK", stat_text(self.attack)),
            ("DEF", stat_text(self.defense)),
            ("HP", stat_text(self.hp)),
            ("SPD", stat_text(self.speed)),
        ]
    }
}

fn stat_text(value: Option<u16>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Decimetres/hectograms to metres/kilograms, printed without a trailing `.0`.
pub fn format_tenths(value: Option<u32>, unit: &str) -> String {
    match value {
        Some(value) => format!("{} {unit}", value as f64 / 10.0),
        None => format!("{PLACEHOLDER} {unit}"),
    }
}

/// Capitalise each hyphen-separated word, keeping the hyphens: `mr-mime` -> `Mr-Mime`
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
