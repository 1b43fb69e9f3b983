//! Mapping a single RGB color to a human-readable fashion color name.

use crate::RgbColor;
use crate::fashion::PaletteIndex;
use crate::lab::srgb_to_lab;

pub const WHITE: &str = "white";
pub const BLACK: &str = "black";
pub const CHARCOAL: &str = "charcoal";
pub const GRAY: &str = "gray";
pub const LIGHT_GRAY: &str = "light gray";

/// How a color ended up with its name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorMatch {
    /// Resolved by the luminance/chroma shortcuts before any palette lookup.
    Achromatic(&'static str),
    /// Nearest palette entry and its L*a*b* distance.
    Palette { name: &'static str, distance: f64 },
}

impl ColorMatch {
    pub fn name(&self) -> &'static str {
        match *self {
            ColorMatch::Achromatic(name) => name,
            ColorMatch::Palette { name, .. } => name,
        }
    }
}

/// Rec. 709 weighted luminance on the 0-255 scale.
#[inline(always)]
pub fn luminance(rgb: RgbColor) -> f64 {
    0.2126 * rgb.red as f64 + 0.7152 * rgb.green as f64 + 0.0722 * rgb.blue as f64
}

/// Spread between the strongest and weakest channel.
#[inline(always)]
pub fn chroma(rgb: RgbColor) -> u8 {
    let max = rgb.red.max(rgb.green).max(rgb.blue);
    let min = rgb.red.min(rgb.green).min(rgb.blue);
    max - min
}

/// Names colors against a borrowed [`PaletteIndex`].
#[derive(Clone, Copy, Debug)]
pub struct ColorNamer<'p> {
    palette: &'p PaletteIndex,
}

impl<'p> ColorNamer<'p> {
    pub fn new(palette: &'p PaletteIndex) -> Self {
        Self { palette }
    }

    /// Classify `rgb`; the first rule that applies wins:
    ///
    /// 1. very bright and nearly colorless → white
    /// 2. very dark and low chroma → black
    /// 3. any other low-chroma color → charcoal / gray / light gray by luminance
    /// 4. everything else → nearest palette entry in L*a*b*
    ///
    /// The achromatic names are fixed strings and do not depend on the palette.
    pub fn classify(&self, rgb: RgbColor) -> ColorMatch {
        let lum = luminance(rgb);
        let chroma = chroma(rgb);

        if lum > 245.0 && chroma < 10 {
            return ColorMatch::Achromatic(WHITE);
        }
        if lum < 20.0 && chroma < 20 {
            return ColorMatch::Achromatic(BLACK);
        }
        if chroma < 20 {
            let name = if lum < 70.0 {
                CHARCOAL
            } else if lum < 140.0 {
                GRAY
            } else {
                LIGHT_GRAY
            };
            return ColorMatch::Achromatic(name);
        }

        match self.palette.nearest(&srgb_to_lab(rgb)) {
            Some((entry, distance)) => ColorMatch::Palette {
                name: entry.name,
                distance,
            },
            // Only reachable with a caller-built empty palette.
            None => ColorMatch::Achromatic(if lum < 140.0 { GRAY } else { LIGHT_GRAY }),
        }
    }

    pub fn name(&self, rgb: RgbColor) -> &'static str {
        self.classify(rgb).name()
    }
}
