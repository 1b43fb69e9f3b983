//! The fashion reference palette and its precomputed L*a*b* index.

use std::collections::HashMap;

use palette::Srgb;

use crate::RgbColor;
use crate::lab::{LabColor, delta_e, srgb_to_lab};

/// Named reference colors in matching order. Earlier entries win distance ties,
/// which is why "yellow" shadows "gold".
pub const FASHION_COLORS: [(&str, RgbColor); 33] = [
    ("black", Srgb::new(0, 0, 0)),
    ("white", Srgb::new(255, 255, 255)),
    ("gray", Srgb::new(128, 128, 128)),
    ("light gray", Srgb::new(200, 200, 200)),
    ("charcoal", Srgb::new(54, 69, 79)),
    ("red", Srgb::new(220, 20, 60)),
    ("maroon", Srgb::new(128, 0, 0)),
    ("burgundy", Srgb::new(128, 0, 32)),
    ("pink", Srgb::new(255, 105, 180)),
    ("rose", Srgb::new(255, 192, 203)),
    ("orange", Srgb::new(255, 140, 0)),
    ("peach", Srgb::new(255, 218, 185)),
    ("coral", Srgb::new(255, 127, 80)),
    ("yellow", Srgb::new(255, 215, 0)),
    ("mustard", Srgb::new(204, 173, 0)),
    ("green", Srgb::new(0, 128, 0)),
    ("olive", Srgb::new(128, 128, 0)),
    ("mint", Srgb::new(152, 255, 152)),
    ("emerald", Srgb::new(80, 200, 120)),
    ("blue", Srgb::new(0, 0, 255)),
    ("navy", Srgb::new(0, 0, 128)),
    ("sky blue", Srgb::new(135, 206, 235)),
    ("teal", Srgb::new(0, 128, 128)),
    ("turquoise", Srgb::new(64, 224, 208)),
    ("purple", Srgb::new(128, 0, 128)),
    ("lavender", Srgb::new(230, 230, 250)),
    ("violet", Srgb::new(238, 130, 238)),
    ("brown", Srgb::new(139, 69, 19)),
    ("beige", Srgb::new(245, 245, 220)),
    ("tan", Srgb::new(210, 180, 140)),
    ("camel", Srgb::new(193, 154, 107)),
    ("silver", Srgb::new(192, 192, 192)),
    ("gold", Srgb::new(255, 215, 0)),
];

/// One named reference color with its cached L*a*b* coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteEntry {
    pub name: &'static str,
    pub rgb: RgbColor,
    pub lab: LabColor,
}

/// Immutable palette with L*a*b* values computed once at construction.
///
/// Lookups by name are O(1); nearest-color queries scan every entry in table
/// order. Nothing is mutated after `new`, so one index can be shared freely
/// between threads.
#[derive(Clone, Debug)]
pub struct PaletteIndex {
    entries: Vec<PaletteEntry>,
    by_name: HashMap<&'static str, usize>,
}

impl PaletteIndex {
    /// Build an index from `(name, rgb)` pairs. A repeated name keeps its first
    /// position and color.
    pub fn new(colors: &[(&'static str, RgbColor)]) -> Self {
        let mut entries = Vec::with_capacity(colors.len());
        let mut by_name = HashMap::with_capacity(colors.len());

        for &(name, rgb) in colors {
            if by_name.contains_key(name) {
                continue;
            }
            by_name.insert(name, entries.len());
            entries.push(PaletteEntry {
                name,
                rgb,
                lab: srgb_to_lab(rgb),
            });
        }

        Self { entries, by_name }
    }

    /// The built-in fashion palette.
    pub fn fashion() -> Self {
        Self::new(&FASHION_COLORS)
    }

    pub fn get(&self, name: &str) -> Option<&PaletteEntry> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closest entry to `lab` by Euclidean L*a*b* distance, with that distance.
    ///
    /// Returns `None` only for an empty palette. Ties keep the earliest entry.
    pub fn nearest(&self, lab: &LabColor) -> Option<(&PaletteEntry, f64)> {
        let mut best: Option<(&PaletteEntry, f64)> = None;
        for entry in &self.entries {
            let dist = delta_e(lab, &entry.lab);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((entry, dist)),
            }
        }
        best
    }
}

impl Default for PaletteIndex {
    fn default() -> Self {
        Self::fashion()
    }
}
