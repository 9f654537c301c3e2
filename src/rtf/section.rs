//! Page and section layout.
//!
//! Document-level words (`\paperw`, `\margl`, `\facingp` ...) fill
//! [`DocumentSettings`]; section words live in the group state. Both are
//! combined into the [`PageLayout`] handed to the builder.

use super::destination::TextSlot;

/// Document-level settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSettings {
    /// Paper width in twips
    pub paper_width: i32,
    /// Paper height in twips
    pub paper_height: i32,
    pub margin_left: i32,
    pub margin_right: i32,
    pub margin_top: i32,
    pub margin_bottom: i32,
    /// Default tab width (`\deftab`)
    pub default_tab: i32,
    /// Default font (`\deff`)
    pub default_font: i32,
    pub landscape: bool,
    /// Different odd and even pages (`\facingp`)
    pub facing_pages: bool,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            paper_width: 12240,
            paper_height: 15840,
            margin_left: 1800,
            margin_right: 1800,
            margin_top: 1440,
            margin_bottom: 1440,
            default_tab: 720,
            default_font: 0,
            landscape: false,
            facing_pages: false,
        }
    }
}

/// Which header and footer variants the pages use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderType {
    /// Same header on every page
    Uniform = 0,
    /// Separate odd and even headers
    OddEven = 1,
    /// Separate first-page header
    FirstPage = 2,
    /// Separate first-page, odd and even headers
    FirstPageOddEven = 3,
}

impl HeaderType {
    pub fn new(facing_pages: bool, title_page: bool) -> Self {
        match (facing_pages, title_page) {
            (false, false) => HeaderType::Uniform,
            (true, false) => HeaderType::OddEven,
            (false, true) => HeaderType::FirstPage,
            (true, true) => HeaderType::FirstPageOddEven,
        }
    }
}

/// Page layout handed to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub paper_width: i32,
    pub paper_height: i32,
    pub margin_left: i32,
    pub margin_right: i32,
    /// Top margin, the header margin when a header exists
    pub margin_top: i32,
    /// Bottom margin, the footer margin when a footer exists
    pub margin_bottom: i32,
    pub default_tab: i32,
    pub landscape: bool,
    pub header_type: HeaderType,
    pub footer_type: HeaderType,
    pub has_header: bool,
    pub has_footer: bool,
}

/// Header and footer contents, indexed by [`TextSlot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFooterPresence {
    /// `true` for each slot whose text is non-empty
    pub present: [bool; 7],
}

impl HeaderFooterPresence {
    #[inline]
    pub fn has(&self, slot: TextSlot) -> bool {
        self.present[slot.index()]
    }

    #[inline]
    pub fn set(&mut self, slot: TextSlot, present: bool) {
        self.present[slot.index()] = present;
    }
}

impl PageLayout {
    /// Combine the document settings with the final section state.
    pub fn new(
        settings: &DocumentSettings,
        title_page: bool,
        header_margin: i32,
        footer_margin: i32,
        texts: &HeaderFooterPresence,
    ) -> Self {
        let facing = settings.facing_pages;
        let has_header = texts.has(TextSlot::OddPagesHeader)
            || (facing && texts.has(TextSlot::EvenPagesHeader))
            || (title_page && texts.has(TextSlot::FirstPageHeader));
        let has_footer = texts.has(TextSlot::OddPagesFooter)
            || (facing && texts.has(TextSlot::EvenPagesFooter))
            || (title_page && texts.has(TextSlot::FirstPageFooter));
        let header_type = HeaderType::new(facing, title_page);

        Self {
            paper_width: settings.paper_width,
            paper_height: settings.paper_height,
            margin_left: settings.margin_left,
            margin_right: settings.margin_right,
            margin_top: if has_header { header_margin } else { settings.margin_top },
            margin_bottom: if has_footer { footer_margin } else { settings.margin_bottom },
            default_tab: settings.default_tab,
            landscape: settings.landscape,
            header_type,
            footer_type: header_type,
            has_header,
            has_footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_type() {
        assert_eq!(HeaderType::new(false, false) as i32, 0);
        assert_eq!(HeaderType::new(true, false) as i32, 1);
        assert_eq!(HeaderType::new(false, true) as i32, 2);
        assert_eq!(HeaderType::new(true, true) as i32, 3);
    }

    #[test]
    fn test_margins_without_headers() {
        let layout = PageLayout::new(
            &DocumentSettings::default(),
            false,
            720,
            720,
            &HeaderFooterPresence::default(),
        );
        assert_eq!((layout.margin_top, layout.margin_bottom), (1440, 1440));
        assert!(!layout.has_header && !layout.has_footer);
        assert_eq!(layout.paper_width, 12240);
    }

    #[test]
    fn test_header_margin_replaces_top_margin() {
        let mut texts = HeaderFooterPresence::default();
        texts.set(TextSlot::OddPagesHeader, true);
        let layout = PageLayout::new(&DocumentSettings::default(), false, 500, 600, &texts);
        assert_eq!(layout.margin_top, 500);
        assert_eq!(layout.margin_bottom, 1440);
        assert!(layout.has_header);
    }

    #[test]
    fn test_even_header_needs_facing_pages() {
        let mut texts = HeaderFooterPresence::default();
        texts.set(TextSlot::EvenPagesHeader, true);
        texts.set(TextSlot::FirstPageFooter, true);
        let settings = DocumentSettings::default();
        let layout = PageLayout::new(&settings, false, 720, 720, &texts);
        assert!(!layout.has_header && !layout.has_footer);

        let facing = DocumentSettings {
            facing_pages: true,
            ..settings
        };
        let layout = PageLayout::new(&facing, true, 720, 720, &texts);
        assert!(layout.has_header && layout.has_footer);
        assert_eq!(layout.header_type, HeaderType::FirstPageOddEven);
    }
}
