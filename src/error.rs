//! Error types for the redocx library.

use std::io;
use thiserror::Error;

/// Result type alias for redocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, rendering or writing a document.
///
/// Only stream-level corruption is fatal during decoding. Unknown elements,
/// unparsable attribute values and unknown numbering formats are recovered
/// where they occur and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Malformed markup reported by the tokenizer.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The token stream ended while an element was still open.
    #[error("Unexpected end of input inside <{element}>")]
    UnexpectedEof {
        /// Qualified name of the innermost open element.
        element: String,
    },

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A numbering reference could not be resolved and the resolver was
    /// configured to fail instead of rendering a placeholder.
    #[error("Unresolved numbering reference: numId={num_id} ilvl={ilvl}")]
    UnresolvedNumbering {
        /// Referenced numbering instance.
        num_id: String,
        /// Referenced level.
        ilvl: String,
    },

    /// Error producing serialized output.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnexpectedEof {
            element: "w:p".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected end of input inside <w:p>");

        let err = Error::UnresolvedNumbering {
            num_id: "7".to_string(),
            ilvl: "0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unresolved numbering reference: numId=7 ilvl=0"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
