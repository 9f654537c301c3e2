//! Error types for RTF import.
//!
//! Only two failure classes abort a conversion: input that is not RTF 1.x and
//! input that cannot be read. Everything else degrades locally and is reported
//! through [`ConversionReport`](super::ConversionReport).

use std::path::PathBuf;
use thiserror::Error;

/// Result type for RTF operations.
pub type RtfResult<T> = Result<T, RtfError>;

/// RTF import errors.
#[derive(Error, Debug)]
pub enum RtfError {
    /// Input does not start with `{\rtf` or declares an unsupported version
    #[error("Wrong format: {0}")]
    WrongFormat(String),

    /// Input stream could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Structurally unusable input, e.g. group nesting beyond the configured limit
    #[error("Malformed RTF document: {0}")]
    MalformedDocument(String),

    /// Conversion between the given MIME types is not provided by this filter
    #[error("Conversion from {from} to {to} is not implemented")]
    NotImplemented { from: String, to: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RtfError::WrongFormat("not an RTF file".to_string());
        assert_eq!(err.to_string(), "Wrong format: not an RTF file");

        let err = RtfError::NotImplemented {
            from: "text/plain".to_string(),
            to: "application/x-kword".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Conversion from text/plain to application/x-kword is not implemented"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: RtfError = io.into();
        assert!(matches!(err, RtfError::Io(_)));
    }
}
