//! Display colors for category labels

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Color used for labels outside the known vocabulary
pub const FALLBACK_COLOR: Rgb = Rgb::new(0x68, 0x68, 0x68);

/// Known labels and their badge colors
pub const CATEGORY_COLORS: [(&str, Rgb); 18] = [
    ("normal", Rgb::new(0xA8, 0xA7, 0x7A)),
    ("fire", Rgb::new(0xEE, 0x81, 0x30)),
    ("water", Rgb::new(0x63, 0x90, 0xF0)),
    ("electric", Rgb::new(0xF7, 0xD0, 0x2C)),
    ("grass", Rgb::new(0x7A, 0xC7, 0x4C)),
    ("ice", Rgb::new(0x96, 0xD9, 0xD6)),
    ("fighting", Rgb::new(0xC2, 0x2E, 0x28)),
    ("poison", Rgb::new(0xA3, 0x3E, 0xA1)),
    ("ground", Rgb::new(0xE2, 0xBF, 0x65)),
    ("flying", Rgb::new(0xA9, 0x8F, 0xF3)),
    ("psychic", Rgb::new(0xF9, 0x55, 0x87)),
    ("bug", Rgb::new(0xA6, 0xB9, 0x1A)),
    ("rock", Rgb::new(0xB6, 0xA1, 0x36)),
    ("ghost", Rgb::new(0x73, 0x57, 0x97)),
    ("dragon", Rgb::new(0x6F, 0x35, 0xFC)),
    ("dark", Rgb::new(0x70, 0x57, 0x46)),
    ("steel", Rgb::new(0xB7, 0xB7, 0xCE)),
    ("fairy", Rgb::new(0xD6, 0x85, 0xAD)),
];

/// Badge color for a label (case-insensitive), `None` if unknown
pub fn category_color(label: &str) -> Option<Rgb> {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|(_, color)| *color)
}

/// Badge color, never failing
pub fn category_color_or_fallback(label: &str) -> Rgb {
    category_color(label).unwrap_or(FALLBACK_COLOR)
}

/// Text shown inside a badge
pub fn badge_text(label: &str) -> String {
    label.to_uppercase()
}
