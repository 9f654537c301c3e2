//! RTF value types shared by the formatting state and the output model.

use std::collections::BTreeMap;

/// Font reference (id set by `\fN`).
pub type FontRef = i32;

/// Color reference (index into the color table, `-1` for automatic).
pub type ColorRef = i32;

/// RTF color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red component (0-255)
    pub red: u8,
    /// Green component (0-255)
    pub green: u8,
    /// Blue component (0-255)
    pub blue: u8,
}

impl Color {
    /// Create a new color.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Black color.
    #[inline]
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Build a color from raw `\red`, `\green` and `\blue` parameters.
    pub fn from_components(red: i32, green: i32, blue: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        Self::new(clamp(red), clamp(green), clamp(blue))
    }

    /// `#rrggbb` notation.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Color table containing document colors.
///
/// `\cfN` indexes the table directly. The leading `;` that most writers emit
/// for the automatic color produces entry 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<Color>,
}

impl ColorTable {
    /// Create a new color table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a color to the table and return its index.
    #[inline]
    pub fn add(&mut self, color: Color) -> ColorRef {
        let index = self.colors.len() as ColorRef;
        self.colors.push(color);
        index
    }

    /// Get a color by reference; negative or out-of-range references yield `None`.
    #[inline]
    pub fn get(&self, color_ref: ColorRef) -> Option<Color> {
        usize::try_from(color_ref)
            .ok()
            .and_then(|i| self.colors.get(i))
            .copied()
    }

    /// Get a color by reference, falling back to black.
    #[inline]
    pub fn resolve(&self, color_ref: ColorRef) -> Color {
        self.get(color_ref).unwrap_or_else(Color::black)
    }

    /// Get all colors in the table.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Font family categories (`\froman`, `\fswiss`, ...), used as a style hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    /// Nil (unknown or default)
    #[default]
    Nil,
    /// Roman (serif) fonts
    Roman,
    /// Swiss (sans-serif) fonts
    Swiss,
    /// Modern (monospace) fonts
    Modern,
    /// Script fonts
    Script,
    /// Decorative fonts
    Decor,
    /// Technical, symbol, and mathematical fonts
    Tech,
}

/// Font table: resolved family names keyed by font id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontTable {
    fonts: BTreeMap<FontRef, String>,
}

impl FontTable {
    /// Create a new font table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a font.
    #[inline]
    pub fn insert(&mut self, id: FontRef, family: String) {
        self.fonts.insert(id, family);
    }

    /// Get a family name by id.
    #[inline]
    pub fn get(&self, id: FontRef) -> Option<&str> {
        self.fonts.get(&id).map(String::as_str)
    }

    /// Fonts in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (FontRef, &str)> {
        self.fonts.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Left-aligned
    #[default]
    Left,
    /// Right-aligned
    Right,
    /// Justified
    Justify,
    /// Centered
    Center,
}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlineStyle {
    /// No underline
    #[default]
    None,
    /// Single underline
    Single,
    /// Double underline
    Double,
    /// Thick underline
    Thick,
    /// Word-only underline
    Words,
    /// Dashed underline
    Dashed,
    /// Dotted underline
    Dotted,
    /// Dash-dot underline
    DashDot,
    /// Dash-dot-dot underline
    DashDotDot,
    /// Wave underline
    Wave,
}

/// Vertical position of text set by `\super`, `\sub` and `\nosupersub`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Normal,
    Subscript,
    Superscript,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_table_lookup() {
        let mut table = ColorTable::new();
        assert_eq!(table.add(Color::new(255, 0, 0)), 0);
        assert_eq!(table.add(Color::new(0, 255, 0)), 1);

        assert_eq!(table.get(1), Some(Color::new(0, 255, 0)));
        assert_eq!(table.get(2), None);
        assert_eq!(table.get(-1), None);
        assert_eq!(table.resolve(7), Color::black());
    }

    #[test]
    fn test_color_components_are_clamped() {
        assert_eq!(Color::from_components(300, -5, 128), Color::new(255, 0, 128));
        assert_eq!(Color::new(255, 0, 128).to_hex(), "#ff0080");
    }

    #[test]
    fn test_font_table_replaces_by_id() {
        let mut fonts = FontTable::new();
        fonts.insert(3, "Times".to_string());
        fonts.insert(0, "Arial".to_string());
        fonts.insert(3, "Courier".to_string());

        assert_eq!(fonts.get(3), Some("Courier"));
        assert_eq!(fonts.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![0, 3]);
    }
}
