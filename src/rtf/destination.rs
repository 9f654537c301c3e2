//! Destination frames.
//!
//! The importer routes group openings, text and group closings to exactly one
//! current destination. Entering a destination saves the previous frame on the
//! [`DestinationStack`]; closing the group that entered it restores it.

use super::info::InfoField;
use super::keywords::ROOT_DESTINATION;

/// Rich-text accumulators with a fixed slot in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    Body,
    FirstPageHeader,
    OddPagesHeader,
    EvenPagesHeader,
    FirstPageFooter,
    OddPagesFooter,
    EvenPagesFooter,
}

impl TextSlot {
    pub const ALL: [TextSlot; 7] = [
        TextSlot::Body,
        TextSlot::FirstPageHeader,
        TextSlot::OddPagesHeader,
        TextSlot::EvenPagesHeader,
        TextSlot::FirstPageFooter,
        TextSlot::OddPagesFooter,
        TextSlot::EvenPagesFooter,
    ];

    /// Index of the slot's accumulator.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Kind of content sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// Implicit destination before `\rtf`
    Root,
    RichText(TextSlot),
    FootNote,
    FontTable,
    ColorTable,
    StyleSheet,
    /// Document information text
    PlainText(InfoField),
    Picture,
    /// `\blipuid` picture identifier
    BlipUid,
    Field,
    FieldInstruction,
    FieldResult,
    /// Transparent group without content of its own
    Group,
    /// Discard everything until the group closes
    Skip,
}

impl DestinationKind {
    /// Whether text delivered to this destination ends up in rich text.
    #[inline]
    pub fn is_rich_text(self) -> bool {
        matches!(self, DestinationKind::RichText(_) | DestinationKind::FootNote)
    }
}

/// Index of a rich-text accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TextId(pub(crate) usize);

/// The current content sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationFrame {
    /// Control word that entered the destination
    pub name: &'static str,
    /// Group tag, `Text` for rich-text destinations
    pub group: Option<&'static str>,
    pub kind: DestinationKind,
    /// Accumulator that was current before a rich-text destination took over
    pub(crate) saved_text: Option<TextId>,
    /// Field result routed straight into the enclosing rich text
    pub(crate) passthrough: bool,
}

impl DestinationFrame {
    pub fn new(name: &'static str, kind: DestinationKind, group: Option<&'static str>) -> Self {
        Self {
            name,
            group,
            kind,
            saved_text: None,
            passthrough: false,
        }
    }

    /// The implicit destination before `\rtf`.
    pub fn root() -> Self {
        Self::new(ROOT_DESTINATION, DestinationKind::Root, None)
    }
}

/// Current destination plus the frames it replaced.
#[derive(Debug)]
pub struct DestinationStack {
    current: DestinationFrame,
    saved: Vec<DestinationFrame>,
}

impl Default for DestinationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationStack {
    pub fn new() -> Self {
        Self {
            current: DestinationFrame::root(),
            saved: Vec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> &DestinationFrame {
        &self.current
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut DestinationFrame {
        &mut self.current
    }

    /// Install a new current frame, saving the old one.
    pub fn enter(&mut self, frame: DestinationFrame) {
        let previous = std::mem::replace(&mut self.current, frame);
        self.saved.push(previous);
    }

    /// Restore the previous frame and return the closed one.
    pub fn leave(&mut self) -> Option<DestinationFrame> {
        let previous = self.saved.pop()?;
        Some(std::mem::replace(&mut self.current, previous))
    }

    /// Number of saved frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Saved frame by position from the bottom of the stack.
    #[inline]
    pub fn saved(&self, index: usize) -> Option<&DestinationFrame> {
        self.saved.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_leave() {
        let mut stack = DestinationStack::new();
        assert_eq!(stack.current().kind, DestinationKind::Root);

        stack.enter(DestinationFrame::new(
            "rtf",
            DestinationKind::RichText(TextSlot::Body),
            Some("Text"),
        ));
        stack.enter(DestinationFrame::new("fonttbl", DestinationKind::FontTable, None));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.saved(1).map(|f| f.name), Some("rtf"));

        let closed = stack.leave().unwrap();
        assert_eq!(closed.name, "fonttbl");
        assert_eq!(stack.current().name, "rtf");

        stack.leave().unwrap();
        assert!(stack.leave().is_none());
        assert_eq!(stack.current().kind, DestinationKind::Root);
    }

    #[test]
    fn test_slot_indices_are_distinct() {
        let mut indices: Vec<_> = TextSlot::ALL.iter().map(|s| s.index()).collect();
        indices.dedup();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
    }
}
