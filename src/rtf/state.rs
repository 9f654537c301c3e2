//! Group-scoped formatting state.
//!
//! Every `{` saves a copy of the live [`GroupState`] on the
//! [`GroupStateStack`]; the matching `}` replaces the live state with that copy.
//! All records here are plain values, so a saved copy is never affected by
//! later mutations of the live state.

use super::border::{Border, BorderSide, Borders, TabStop};
use super::error::{RtfError, RtfResult};
use super::types::{Alignment, ColorRef, FontRef, UnderlineStyle, VerticalAlign};
use smallvec::SmallVec;

/// Character formatting properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFormat {
    /// Font id (`\f`)
    pub font: FontRef,
    /// Font size in half-points (`\fs`)
    pub font_size: i32,
    /// Baseline shift in half-points, negative raises (`\up`, `\dn`)
    pub baseline: i32,
    /// Foreground color (`\cf`)
    pub color: ColorRef,
    /// Background/highlight color (`\cb`, `\highlight`)
    pub background: ColorRef,
    /// Underline color (`\ulc`)
    pub underline_color: ColorRef,
    pub vertical_align: VerticalAlign,
    pub underline: UnderlineStyle,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    /// Double strikethrough (`\striked`)
    pub double_strike: bool,
    /// Hidden text (`\v`), never emitted
    pub hidden: bool,
    pub caps: bool,
    pub small_caps: bool,
    /// Number of fallback bytes following `\u` (`\uc`)
    pub uc: i32,
}

impl Default for CharacterFormat {
    fn default() -> Self {
        Self {
            font: 0,
            font_size: 24,
            baseline: 0,
            color: -1,
            background: -1,
            underline_color: -1,
            vertical_align: VerticalAlign::Normal,
            underline: UnderlineStyle::None,
            bold: false,
            italic: false,
            strike: false,
            double_strike: false,
            hidden: false,
            caps: false,
            small_caps: false,
            uc: 1,
        }
    }
}

impl CharacterFormat {
    /// Reset everything but `uc` (`\plain`).
    pub fn reset(&mut self, default_font: FontRef) {
        let uc = self.uc;
        *self = Self {
            font: default_font,
            uc,
            ..Self::default()
        };
    }

    /// Font size in points.
    #[inline]
    pub fn point_size(&self) -> f32 {
        self.font_size as f32 / 2.0
    }

    /// Vertical alignment, taking `\up` / `\dn` into account.
    pub fn effective_vertical_align(&self) -> VerticalAlign {
        match (self.vertical_align, self.baseline) {
            (VerticalAlign::Normal, b) if b < 0 => VerticalAlign::Superscript,
            (VerticalAlign::Normal, b) if b > 0 => VerticalAlign::Subscript,
            (align, _) => align,
        }
    }
}

/// Reference to a border that `\brdr*` words operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderRef {
    /// One of the paragraph borders (`\brdrt` ...)
    Paragraph(BorderSide),
    /// One of the borders of the next cell definition (`\clbrdrt` ...)
    Cell(BorderSide),
}

/// Paragraph layout properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphLayout {
    /// Tab stops defined by `\tx`
    pub tabs: SmallVec<[TabStop; 8]>,
    /// Alignment and leader collected for the next `\tx`
    pub pending_tab: TabStop,
    pub borders: Borders,
    /// Border selected by the last border keyword, if any
    pub selected_border: Option<BorderRef>,
    pub first_indent: i32,
    pub left_indent: i32,
    pub right_indent: i32,
    pub space_before: i32,
    pub space_after: i32,
    /// Line spacing (`\sl`), negative for exact spacing
    pub space_between: i32,
    /// Style sheet id (`\s`)
    pub style: i32,
    pub alignment: Alignment,
    pub in_table: bool,
    pub keep: bool,
    pub keep_next: bool,
    pub page_break_before: bool,
    pub page_break_after: bool,
}

impl Default for ParagraphLayout {
    fn default() -> Self {
        Self {
            tabs: SmallVec::new(),
            pending_tab: TabStop::default(),
            borders: Borders::default(),
            selected_border: None,
            first_indent: 0,
            left_indent: 0,
            right_indent: 0,
            space_before: 0,
            space_after: 0,
            space_between: 0,
            style: 0,
            alignment: Alignment::Left,
            in_table: false,
            keep: false,
            keep_next: false,
            page_break_before: false,
            page_break_after: false,
        }
    }
}

impl ParagraphLayout {
    /// Reset to the `\pard` defaults. Border spacing survives.
    pub fn reset(&mut self) {
        let mut borders = self.borders;
        borders.reset();
        *self = Self {
            borders,
            ..Self::default()
        };
    }
}

/// Section layout properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    /// Distance of the header from the top edge (`\headery`)
    pub header_margin: i32,
    /// Distance of the footer from the bottom edge (`\footery`)
    pub footer_margin: i32,
    /// Separate first-page header/footer (`\titlepg`)
    pub title_page: bool,
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self {
            header_margin: 720,
            footer_margin: 720,
            title_page: false,
        }
    }
}

/// Cell definition collected by `\cellx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCellDef {
    /// Right boundary in twips
    pub x: i32,
    /// Background color (`\clcbpat`)
    pub background: ColorRef,
    pub borders: Borders,
}

impl Default for TableCellDef {
    fn default() -> Self {
        Self {
            x: 0,
            background: -1,
            borders: Borders::default(),
        }
    }
}

impl TableCellDef {
    fn reset(&mut self) {
        self.background = -1;
        self.borders.reset();
    }
}

/// Row properties collected between `\trowd` and `\row`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRowFormat {
    /// Row height (`\trrh`), negative for exact height
    pub height: i32,
    /// Left edge of the row (`\trleft`)
    pub left: i32,
    /// Row alignment (`\trql`, `\trqc`, `\trqr`)
    pub alignment: Alignment,
    /// Cell definitions in order of `\cellx`
    pub cells: SmallVec<[TableCellDef; 8]>,
}

/// The complete formatting state scoped by one group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupState {
    pub format: CharacterFormat,
    pub layout: ParagraphLayout,
    pub section: SectionLayout,
    pub table_row: TableRowFormat,
    /// Cell definition being collected for the next `\cellx`
    pub table_cell: TableCellDef,
    /// Closing this group also closes the destination opened in it
    pub closes_destination: bool,
    /// Content of this group is discarded
    pub ignore_group: bool,
}

impl GroupState {
    /// `\plain`
    #[inline]
    pub fn plain_formatting(&mut self, default_font: FontRef) {
        self.format.reset(default_font);
    }

    /// `\pard`
    #[inline]
    pub fn paragraph_defaults(&mut self) {
        self.layout.reset();
    }

    /// `\sectd`
    #[inline]
    pub fn section_defaults(&mut self) {
        self.section = SectionLayout::default();
    }

    /// `\trowd`
    pub fn table_row_defaults(&mut self) {
        self.table_row.height = 0;
        self.table_row.left = 0;
        self.table_row.alignment = Alignment::Left;
        self.table_row.cells.clear();
        self.table_cell.reset();
    }

    /// Reset every formatting record, as destinations that start from a
    /// clean slate require.
    pub fn reset(&mut self, default_font: FontRef) {
        self.plain_formatting(default_font);
        self.paragraph_defaults();
        self.section_defaults();
        self.table_row_defaults();
    }

    /// Apply a change to the selected border, or to all four paragraph
    /// borders when none is selected.
    pub fn update_borders(&mut self, mut update: impl FnMut(&mut Border)) {
        match self.layout.selected_border {
            Some(BorderRef::Paragraph(side)) => update(self.layout.borders.side_mut(side)),
            Some(BorderRef::Cell(side)) => update(self.table_cell.borders.side_mut(side)),
            None => {
                for side in BorderSide::ALL {
                    update(self.layout.borders.side_mut(side));
                }
            },
        }
    }

    /// `\cellxN`: commit the collected cell definition with its right boundary.
    pub fn insert_cell_def(&mut self, x: i32) {
        self.table_cell.x = x;
        self.table_row.cells.push(self.table_cell);
        self.table_cell.reset();
    }

    /// `\txN`: commit a tab stop with the collected alignment and leader.
    pub fn insert_tab_def(&mut self, position: i32) {
        let mut tab = self.layout.pending_tab;
        tab.position = position;
        self.layout.tabs.push(tab);
        self.layout.pending_tab = TabStop::default();
    }
}

/// Stack of saved group states.
#[derive(Debug)]
pub struct GroupStateStack {
    frames: Vec<GroupState>,
    max_depth: usize,
}

impl GroupStateStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::with_capacity(max_depth.min(64)),
            max_depth,
        }
    }

    /// Save a copy of `state`.
    ///
    /// Fails once the nesting limit is reached.
    pub fn push(&mut self, state: &GroupState) -> RtfResult<()> {
        if self.frames.len() >= self.max_depth {
            return Err(RtfError::MalformedDocument(format!(
                "group nesting exceeds {} levels",
                self.max_depth
            )));
        }
        self.frames.push(state.clone());
        Ok(())
    }

    /// Take the most recently saved state.
    #[inline]
    pub fn pop(&mut self) -> Option<GroupState> {
        self.frames.pop()
    }

    /// Number of saved states.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::border::{BorderStyle, TabAlignment};
    use proptest::prelude::*;

    #[test]
    fn test_plain_keeps_uc() {
        let mut state = GroupState::default();
        state.format.uc = 0;
        state.format.bold = true;
        state.format.font_size = 40;
        state.plain_formatting(3);

        assert_eq!(state.format.uc, 0);
        assert_eq!(state.format.font, 3);
        assert!(!state.format.bold);
        assert_eq!(state.format.font_size, 24);
    }

    #[test]
    fn test_effective_vertical_align() {
        let mut format = CharacterFormat::default();
        format.baseline = -6;
        assert_eq!(format.effective_vertical_align(), VerticalAlign::Superscript);
        format.baseline = 6;
        assert_eq!(format.effective_vertical_align(), VerticalAlign::Subscript);
        format.vertical_align = VerticalAlign::Superscript;
        assert_eq!(format.effective_vertical_align(), VerticalAlign::Superscript);
    }

    #[test]
    fn test_unselected_border_updates_all_sides() {
        let mut state = GroupState::default();
        state.update_borders(|b| b.style = BorderStyle::Dots);
        assert!(state.layout.borders.iter().all(|(_, b)| b.style == BorderStyle::Dots));

        state.layout.selected_border = Some(BorderRef::Paragraph(BorderSide::Top));
        state.update_borders(|b| b.width = 30);
        assert_eq!(state.layout.borders.top.width, 30);
        assert_eq!(state.layout.borders.bottom.width, 0);
    }

    #[test]
    fn test_cell_border_selection() {
        let mut state = GroupState::default();
        state.layout.selected_border = Some(BorderRef::Cell(BorderSide::Left));
        state.update_borders(|b| b.style = BorderStyle::Solid);
        state.table_cell.background = 2;
        state.insert_cell_def(1440);

        let def = state.table_row.cells[0];
        assert_eq!(def.x, 1440);
        assert_eq!(def.background, 2);
        assert_eq!(def.borders.left.style, BorderStyle::Solid);
        assert_eq!(state.table_cell.background, -1);
        assert!(!state.table_cell.borders.has_any_border());
    }

    #[test]
    fn test_tab_definitions() {
        let mut state = GroupState::default();
        state.layout.pending_tab.alignment = TabAlignment::Right;
        state.insert_tab_def(720);
        state.insert_tab_def(1440);

        assert_eq!(state.layout.tabs.len(), 2);
        assert_eq!(state.layout.tabs[0].alignment, TabAlignment::Right);
        assert_eq!(state.layout.tabs[1].alignment, TabAlignment::Left);
        assert_eq!(state.layout.tabs[1].position, 1440);
    }

    #[test]
    fn test_paragraph_defaults() {
        let mut state = GroupState::default();
        state.layout.in_table = true;
        state.layout.left_indent = 720;
        state.layout.selected_border = Some(BorderRef::Paragraph(BorderSide::Top));
        state.paragraph_defaults();
        assert_eq!(state.layout, ParagraphLayout::default());
    }

    #[test]
    fn test_depth_limit() {
        let mut stack = GroupStateStack::new(2);
        let state = GroupState::default();
        stack.push(&state).unwrap();
        stack.push(&state).unwrap();
        assert!(matches!(stack.push(&state), Err(RtfError::MalformedDocument(_))));
        assert_eq!(stack.depth(), 2);
    }

    proptest! {
        #[test]
        fn prop_push_pop_restores_state(
            mutations in prop::collection::vec((0i32..200, any::<bool>(), -720i32..720), 1..32)
        ) {
            let mut stack = GroupStateStack::new(4096);
            let mut state = GroupState::default();
            state.format.font_size = 20;
            let before = state.clone();

            for (size, bold, indent) in &mutations {
                stack.push(&state).unwrap();
                state.format.font_size = *size;
                state.format.bold = *bold;
                state.layout.left_indent = *indent;
                state.insert_tab_def(*indent);
                state.closes_destination = *bold;
            }
            for _ in &mutations {
                state = stack.pop().unwrap();
            }

            prop_assert!(stack.is_empty());
            prop_assert_eq!(state, before);
        }
    }
}
