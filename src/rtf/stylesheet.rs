//! RTF stylesheet support.
//!
//! Each entry of `{\stylesheet ...}` is a group whose formatting words define
//! the style and whose text, up to `;`, is the style name.

use super::state::{CharacterFormat, ParagraphLayout};

/// RTF style definition
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Style name
    pub name: String,
    /// Character formatting
    pub format: CharacterFormat,
    /// Paragraph layout; `layout.style` is the style id
    pub layout: ParagraphLayout,
    /// Id of the style for the next paragraph (`\snext`)
    pub next: i32,
}

impl Style {
    /// Style id (`\sN`).
    #[inline]
    pub fn id(&self) -> i32 {
        self.layout.style
    }
}

/// Stylesheet containing all style definitions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    styles: Vec<Style>,
}

/// Name of the style used when a paragraph refers to an unknown id.
pub const DEFAULT_STYLE_NAME: &str = "Standard";

impl StyleSheet {
    /// Create a new stylesheet
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a style definition
    #[inline]
    pub fn add_style(&mut self, style: Style) {
        self.styles.push(style);
    }

    /// Find the style with the given id.
    pub fn get(&self, id: i32) -> Option<&Style> {
        self.styles.iter().find(|style| style.id() == id)
    }

    /// Name of the style with the given id, `Standard` if unknown.
    pub fn name_of(&self, id: i32) -> &str {
        self.get(id).map_or(DEFAULT_STYLE_NAME, |style| &style.name)
    }

    /// Name of the style that follows `style`, if defined.
    pub fn following(&self, style: &Style) -> Option<&str> {
        self.get(style.next).map(|next| next.name.as_str())
    }

    /// Get all styles
    #[inline]
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(id: i32, name: &str, next: i32) -> Style {
        let mut layout = ParagraphLayout::default();
        layout.style = id;
        Style {
            name: name.to_string(),
            format: CharacterFormat::default(),
            layout,
            next,
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let mut sheet = StyleSheet::new();
        sheet.add_style(style(0, "Normal", 0));
        sheet.add_style(style(1, "Heading 1", 0));

        assert_eq!(sheet.name_of(1), "Heading 1");
        assert_eq!(sheet.name_of(7), "Standard");
        assert_eq!(sheet.following(&sheet.styles()[1]), Some("Normal"));
    }

    #[test]
    fn test_unknown_following_style() {
        let mut sheet = StyleSheet::new();
        sheet.add_style(style(3, "Quote", 9));
        assert_eq!(sheet.following(&sheet.styles()[0]), None);
    }
}
