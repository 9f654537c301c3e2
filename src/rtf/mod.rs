//! RTF (Rich Text Format) import.
//!
//! The importer reads an RTF 1.x stream in one forward pass and never holds
//! the whole input in memory.
//!
//! # Architecture
//!
//! - **Lexer**: splits the byte stream into groups, control words, text and
//!   binary blocks
//! - **Keywords**: compile-time tables mapping control words to property
//!   setters and destinations
//! - **State**: group-scoped formatting, saved on `{` and restored on `}`
//! - **Parser**: the dispatch engine that routes every token to the current
//!   destination
//! - **Builder**: the seam through which the converted document leaves the
//!   importer
//!
//! # Example
//!
//! ```rust
//! use rtf_import::rtf::RtfDocument;
//!
//! let rtf_text = r#"{\rtf1\ansi{\fonttbl\f0\fswiss Helvetica;}\f0\pard Hello World!\par}"#;
//! let doc = RtfDocument::parse(rtf_text)?;
//! assert_eq!(doc.text(), "Hello World!");
//! assert_eq!(doc.font(0), Some("Helvetica"));
//! # Ok::<(), rtf_import::rtf::RtfError>(())
//! ```

mod border;
mod builder;
mod destination;
mod document;
mod error;
mod field;
mod fonts;
mod info;
pub mod keywords;
mod lexer;
mod parser;
mod picture;
mod section;
mod state;
mod stylesheet;
mod table;
mod text;
mod types;

// Re-exports
pub use border::{Border, BorderSide, BorderStyle, Borders, TabAlignment, TabLeader, TabStop};
pub use builder::{DirectoryStore, DocumentBuilder, MemoryStore, PictureStore};
pub use destination::TextSlot;
pub use document::{DocumentStyle, RtfDocument};
pub use error::{RtfError, RtfResult};
pub use field::{DocumentField, Field, FieldAction, FieldType, PageVariable, Variable};
#[cfg(feature = "system-fonts")]
pub use fonts::SystemFontMatcher;
pub use fonts::{AnyFontMatcher, FontMatcher, FontRequest, resolve_family};
pub use info::{DocumentInfo, InfoField};
pub use lexer::{ControlWord, Token, Tokenizer};
pub use parser::{ConversionReport, DEFAULT_MAX_DEPTH, ImportOptions, Importer};
pub use picture::{Crop, PictureFrame, PictureProperties, PictureType, detect_image_type};
pub use section::{DocumentSettings, HeaderFooterPresence, HeaderType, PageLayout};
pub use state::{
    BorderRef, CharacterFormat, GroupState, GroupStateStack, ParagraphLayout, SectionLayout,
    TableCellDef, TableRowFormat,
};
pub use stylesheet::{DEFAULT_STYLE_NAME, Style, StyleSheet};
pub use table::{Table, TableCell, TableRow};
pub use text::{Anchor, Footnote, Paragraph, Run, RunContent, TextState};
pub use types::{
    Alignment, Color, ColorRef, ColorTable, FontFamily, FontRef, FontTable, UnderlineStyle,
    VerticalAlign,
};
