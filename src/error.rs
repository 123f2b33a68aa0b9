//! Error types for the plenar library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for plenar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the retrieval boundary.
///
/// Everything after a document has been loaded degrades gracefully instead of
/// failing, so these only come out of opening and loading source files.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error while serializing or rendering output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
