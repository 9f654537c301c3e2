//! rtf-import - A streaming RTF import engine
//!
//! This library reads RTF 1.x documents and hands their content to a
//! word-processor document builder.
//!
//! # Features
//!
//! - **Streaming**: one forward pass over any `Read`, with bounded buffering
//! - **Table-driven dispatch**: control words resolve through compile-time
//!   perfect-hash tables
//! - **Codepages**: `\ansi`, `\ansicpg`, `\mac`, `\pc` and `\pca` text is
//!   decoded to UTF-8, including double-byte codepages
//! - **Document model**: paragraphs, runs, tables, fields, footnotes, pictures,
//!   headers and footers, style sheet and document info
//!
//! # Example - Reading an RTF file
//!
//! ```no_run
//! use rtf_import::RtfDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = RtfDocument::open("document.rtf")?;
//! println!("Title: {}", doc.info().title);
//!
//! for para in doc.paragraphs() {
//!     println!("[{}] {}", para.style, para.text());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Driving a custom builder
//!
//! ```no_run
//! use rtf_import::rtf::{DirectoryStore, ImportOptions, Importer, RtfDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("document.rtf")?;
//! let mut builder = RtfDocument::default();
//! let mut store = DirectoryStore::new("out");
//! let report = Importer::new(file, ImportOptions::default().with_base_dir("."))
//!     .convert(&mut builder, &mut store)?;
//! for (keyword, count) in &report.unknown_keywords {
//!     eprintln!("skipped \\{keyword} ({count}x)");
//! }
//! # Ok(())
//! # }
//! ```

/// Format-independent helpers
pub mod common;

/// RTF tokenizer, control-word dispatch and document model
pub mod rtf;

pub use rtf::{ConversionReport, ImportOptions, Importer, RtfDocument, RtfError, RtfResult};

/// MIME type of RTF input.
pub const RTF_MIME_TYPE: &str = "text/rtf";

/// MIME type of the word-processor documents the importer feeds.
pub const KWORD_MIME_TYPE: &str = "application/x-kword";

/// Check that a conversion between two MIME types is provided.
///
/// Only `text/rtf` to `application/x-kword` is.
pub fn convert_mime(from: &str, to: &str) -> RtfResult<()> {
    if from == RTF_MIME_TYPE && to == KWORD_MIME_TYPE {
        Ok(())
    } else {
        Err(RtfError::NotImplemented {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_mime() {
        assert!(convert_mime(RTF_MIME_TYPE, KWORD_MIME_TYPE).is_ok());
        assert!(matches!(
            convert_mime("text/plain", KWORD_MIME_TYPE),
            Err(RtfError::NotImplemented { .. })
        ));
        assert!(convert_mime(KWORD_MIME_TYPE, RTF_MIME_TYPE).is_err());
    }
}
