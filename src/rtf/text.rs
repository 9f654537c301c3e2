//! Rich text accumulation.
//!
//! Every rich-text destination (body, headers, footers, footnotes) owns a
//! [`TextState`]. Text is collected into runs; a new run is opened only when
//! the character format changes, so adjacent text with identical formatting
//! always ends up in a single run.

use super::field::Variable;
use super::state::{CharacterFormat, ParagraphLayout};
use super::table::TableRow;

/// Reference from a paragraph to a frame placed at that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Table number
    Table(usize),
    /// Picture number
    Picture(usize),
}

impl Anchor {
    /// Name of the anchored frame, e.g. `Table 1`.
    pub fn frame_name(&self) -> String {
        match self {
            Anchor::Table(n) => format!("Table {n}"),
            Anchor::Picture(n) => format!("Picture {n}"),
        }
    }
}

/// Content of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    Text(String),
    Variable(Variable),
    Anchor(Anchor),
}

/// A span of content sharing one character format.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub content: RunContent,
    pub format: CharacterFormat,
}

impl Run {
    /// Text of a text run.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            RunContent::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Length in characters; variables and anchors count as one.
    pub fn len(&self) -> usize {
        match &self.content {
            RunContent::Text(text) => text.chars().count(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finished paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Style name, `Standard` when the style id is not in the style sheet
    pub style: String,
    pub layout: ParagraphLayout,
    /// Base character format of the paragraph
    pub format: CharacterFormat,
    pub runs: Vec<Run>,
    /// The paragraph ends its frame (page break)
    pub frame_break: bool,
}

impl Paragraph {
    /// Concatenated text of all text runs.
    pub fn text(&self) -> String {
        self.runs.iter().filter_map(Run::text).collect()
    }

    /// Runs whose format differs from the paragraph's base format, plus all
    /// variables and anchors.
    pub fn format_changes(&self) -> impl Iterator<Item = &Run> {
        self.runs
            .iter()
            .filter(|run| run.text().is_none() || run.format != self.format)
    }
}

/// Accumulator of one rich-text destination.
#[derive(Debug, Default)]
pub struct TextState {
    /// Runs of the paragraph being built
    pub(crate) runs: Vec<Run>,
    /// Finished paragraphs
    pub(crate) paragraphs: Vec<Paragraph>,
    /// Finished paragraphs of the table cell being built
    pub(crate) cell: Vec<Paragraph>,
    /// Finished cells of the table row being built
    pub(crate) row_cells: Vec<Vec<Paragraph>>,
    /// Finished rows of the open table
    pub(crate) rows: Vec<TableRow>,
    /// Number of the open table
    pub(crate) table: Option<usize>,
}

impl TextState {
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the current paragraph has content.
    #[inline]
    pub fn has_pending_text(&self) -> bool {
        !self.runs.is_empty()
    }

    /// Append text in the given format, extending the last run if possible.
    pub fn push_text(&mut self, text: &str, format: &CharacterFormat) {
        if text.is_empty() {
            return;
        }
        if let Some(Run {
            content: RunContent::Text(last),
            format: last_format,
        }) = self.runs.last_mut()
            && last_format == format
        {
            last.push_str(text);
            return;
        }
        self.runs.push(Run {
            content: RunContent::Text(text.to_owned()),
            format: *format,
        });
    }

    /// Append a variable or anchor; these always form their own run.
    pub fn push_inline(&mut self, content: RunContent, format: &CharacterFormat) {
        self.runs.push(Run {
            content,
            format: *format,
        });
    }

    /// Take the runs of the current paragraph.
    #[inline]
    pub(crate) fn take_runs(&mut self) -> Vec<Run> {
        std::mem::take(&mut self.runs)
    }

    /// Finished paragraphs.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub(crate) fn take_paragraphs(&mut self) -> Vec<Paragraph> {
        std::mem::take(&mut self.paragraphs)
    }
}

/// A footnote or endnote.
#[derive(Debug, Clone, PartialEq)]
pub struct Footnote {
    /// Footnote number, starting at 1
    pub number: usize,
    /// `\ftnalt` was given
    pub endnote: bool,
    pub paragraphs: Vec<Paragraph>,
}

impl Footnote {
    /// Frame name, e.g. `Footnote 1`.
    pub fn name(&self) -> String {
        format!("Footnote {}", self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_format_extends_run() {
        let mut text = TextState::default();
        let format = CharacterFormat::default();
        text.push_text("Hello", &format);
        text.push_text(" World", &format);

        assert_eq!(text.runs.len(), 1);
        assert_eq!(text.runs[0].text(), Some("Hello World"));
    }

    #[test]
    fn test_format_change_opens_run() {
        let mut text = TextState::default();
        let plain = CharacterFormat::default();
        let bold = CharacterFormat {
            bold: true,
            ..plain
        };
        text.push_text("a", &plain);
        text.push_text("b", &bold);
        text.push_text("c", &bold);
        text.push_text("d", &plain);

        let runs: Vec<_> = text.runs.iter().map(|r| (r.text().unwrap(), r.format.bold)).collect();
        assert_eq!(runs, vec![("a", false), ("bc", true), ("d", false)]);
    }

    #[test]
    fn test_text_after_anchor_opens_run() {
        let mut text = TextState::default();
        let format = CharacterFormat::default();
        text.push_text("x", &format);
        text.push_inline(RunContent::Anchor(Anchor::Picture(1)), &format);
        text.push_text("y", &format);

        assert_eq!(text.runs.len(), 3);
        assert_eq!(text.runs[1].len(), 1);
        assert_eq!(Anchor::Table(2).frame_name(), "Table 2");
    }

    #[test]
    fn test_empty_text_is_dropped() {
        let mut text = TextState::default();
        text.push_text("", &CharacterFormat::default());
        assert!(!text.has_pending_text());
    }
}
