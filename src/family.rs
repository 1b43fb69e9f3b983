//! Warm / cool / neutral grouping of color names for outfit pairing.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    Neutral,
    Warm,
    Cool,
}

const NEUTRAL: &[&str] = &[
    "black", "white", "gray", "grey", "beige", "cream", "tan", "camel", "navy",
];
const WARM: &[&str] = &[
    "red", "orange", "yellow", "brown", "burgundy", "maroon", "rust", "mustard", "coral",
];
const COOL: &[&str] = &[
    "blue", "green", "teal", "mint", "olive", "purple", "lavender", "pink",
];

impl ColorFamily {
    /// Family of a color name, ignoring ASCII case. Names outside the known
    /// lists (including palette names like "peach" or "violet") count as
    /// neutral.
    pub fn of(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        [
            (ColorFamily::Neutral, NEUTRAL),
            (ColorFamily::Warm, WARM),
            (ColorFamily::Cool, COOL),
        ]
        .into_iter()
        .find(|(_, names)| names.contains(&name.as_str()))
        .map_or(ColorFamily::Neutral, |(family, _)| family)
    }

    /// Neutrals go with anything; warm and cool go with neutrals and with each
    /// other, but not with their own family.
    pub fn is_compatible_with(self, other: ColorFamily) -> bool {
        match self {
            ColorFamily::Neutral => true,
            ColorFamily::Warm => matches!(other, ColorFamily::Neutral | ColorFamily::Cool),
            ColorFamily::Cool => matches!(other, ColorFamily::Neutral | ColorFamily::Warm),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorFamily::Neutral => "neutral",
            ColorFamily::Warm => "warm",
            ColorFamily::Cool => "cool",
        }
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether two garments of the given colors can be worn together.
pub fn colors_compatible(a: &str, b: &str) -> bool {
    ColorFamily::of(a).is_compatible_with(ColorFamily::of(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_of_known_names() {
        assert_eq!(ColorFamily::of("navy"), ColorFamily::Neutral);
        assert_eq!(ColorFamily::of("Mustard"), ColorFamily::Warm);
        assert_eq!(ColorFamily::of("OLIVE"), ColorFamily::Cool);
    }

    #[test]
    fn unknown_names_are_neutral() {
        assert_eq!(ColorFamily::of("violet"), ColorFamily::Neutral);
        assert_eq!(ColorFamily::of("light gray"), ColorFamily::Neutral);
        assert_eq!(ColorFamily::of(""), ColorFamily::Neutral);
    }

    #[test]
    fn compatibility_table() {
        assert!(colors_compatible("black", "red"));
        assert!(colors_compatible("red", "blue"));
        assert!(colors_compatible("teal", "beige"));
        assert!(!colors_compatible("red", "orange"));
        assert!(!colors_compatible("blue", "green"));
    }

    #[test]
    fn display_uses_lowercase_label() {
        assert_eq!(ColorFamily::Warm.to_string(), "warm");
    }
}
