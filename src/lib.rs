//! # plenar
//!
//! Structured extraction of parliamentary plenary protocols.
//!
//! This library turns the PDF of a plenary session into a structured record:
//! session metadata, the agenda from the table of contents, and the ordered
//! speeches with speaker, party and inline interjections. Speeches are linked
//! to the agenda item whose page range contains them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use plenar::{parse_file, render};
//!
//! fn main() -> plenar::Result<()> {
//!     let protocol = parse_file("17_0052.pdf")?;
//!
//!     for speech in &protocol.speeches {
//!         println!("{}: {}", speech.index, render::speaker_line(&speech.speaker));
//!     }
//!
//!     let json = render::to_json(&protocol, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Layout**: positioned words are grouped into lines; two-column pages
//!   are read column by column
//! - **Cleanup**: running headers, footers and page numbers are stripped;
//!   text is NFC-normalized and dehyphenated
//! - **Structure**: metadata, contents block, speaker headers, interjections
//! - **Linking**: speeches are assigned to agenda items by page
//!
//! Only opening a document can fail. Once a [`PageSource`] exists, parsing
//! always yields a [`Protocol`], with missing fields left empty.

pub mod cleanup;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod structure;

pub use error::{Error, Result};
pub use model::{
    AgendaItem, DeclaredSpeaker, Diagnostics, Interjection, InterjectionOffset, Line, Protocol,
    SessionMetadata, Speaker, Speech, SubEntry, TocEntry, TocPartition, Word,
};
pub use parser::{
    is_pdf_bytes, BoilerplateMode, MemorySource, PageContent, PageSource, ParseOptions,
    PdfSource, ProtocolParser, SegmentMode,
};
pub use render::{JsonFormat, TextOptions};

use std::path::Path;

/// Parse a plenary protocol PDF.
///
/// # Arguments
///
/// * `path` - Path to a PDF that has already been fetched to disk
///
/// # Example
///
/// ```no_run
/// use plenar::parse_file;
///
/// let protocol = parse_file("17_0052.pdf").unwrap();
/// println!("Speeches: {}", protocol.speeches.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Protocol> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a plenary protocol PDF with custom options.
///
/// # Example
///
/// ```no_run
/// use plenar::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_offsets(true)
///     .require_party();
/// let protocol = parse_file_with_options("17_0052.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Protocol> {
    let source = PdfSource::open(path)?;
    Ok(ProtocolParser::new(options).parse(&source))
}

/// Parse a plenary protocol from PDF bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Protocol> {
    parse_bytes_with_options(data, ParseOptions::default())
}

/// Parse a plenary protocol from PDF bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Protocol> {
    let source = PdfSource::from_bytes(data)?;
    Ok(ProtocolParser::new(options).parse(&source))
}

/// Parse any page source, such as a [`MemorySource`].
///
/// # Example
///
/// ```
/// use plenar::{parse_source, MemorySource, PageContent, ParseOptions};
///
/// let source = MemorySource::new(vec![PageContent::from_lines([
///     "Präsidentin Muhterem Aras: Ich eröffne die Sitzung.",
/// ])]);
/// let protocol = parse_source(&source, ParseOptions::default());
/// assert_eq!(protocol.speeches.len(), 1);
/// ```
pub fn parse_source<S: PageSource + ?Sized>(source: &S, options: ParseOptions) -> Protocol {
    ProtocolParser::new(options).parse(source)
}

/// Builder for parsing and rendering protocols.
///
/// # Example
///
/// ```no_run
/// use plenar::Plenar;
///
/// let json = Plenar::new()
///     .with_offsets()
///     .with_debug()
///     .parse("17_0052.pdf")?
///     .to_json(plenar::JsonFormat::Compact)?;
/// # Ok::<(), plenar::Error>(())
/// ```
pub struct Plenar {
    parse_options: ParseOptions,
    text_options: TextOptions,
}

impl Plenar {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            text_options: TextOptions::default(),
        }
    }

    /// Replace the parse options wholesale.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Track line offsets and interjection positions.
    pub fn with_offsets(mut self) -> Self {
        self.parse_options = self.parse_options.with_offsets(true);
        self
    }

    /// Attach diagnostics.
    pub fn with_debug(mut self) -> Self {
        self.parse_options = self.parse_options.with_debug(true);
        self
    }

    /// Require bold speaker headers.
    pub fn require_bold(mut self) -> Self {
        self.parse_options = self.parse_options.require_bold();
        self
    }

    /// Reject member headers without a party.
    pub fn require_party(mut self) -> Self {
        self.parse_options = self.parse_options.require_party();
        self
    }

    /// Disable parallel page reconstruction.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Set the transcript options.
    pub fn with_text_options(mut self, options: TextOptions) -> Self {
        self.text_options = options;
        self
    }

    /// Parse a PDF file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<ParsedProtocol> {
        let source = PdfSource::open(path)?;
        Ok(self.parse_source(&source))
    }

    /// Parse a PDF from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<ParsedProtocol> {
        let source = PdfSource::from_bytes(data)?;
        Ok(self.parse_source(&source))
    }

    /// Parse any page source.
    pub fn parse_source<S: PageSource + ?Sized>(self, source: &S) -> ParsedProtocol {
        let protocol = ProtocolParser::new(self.parse_options).parse(source);
        ParsedProtocol {
            protocol,
            text_options: self.text_options,
        }
    }
}

impl Default for Plenar {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed protocol together with its rendering options.
pub struct ParsedProtocol {
    /// The parsed protocol
    pub protocol: Protocol,
    text_options: TextOptions,
}

impl ParsedProtocol {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.protocol, format)
    }

    /// Convert to a plain-text transcript.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.protocol, &self.text_options)
    }

    /// Get the protocol.
    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Take ownership of the protocol.
    pub fn into_protocol(self) -> Protocol {
        self.protocol
    }
}
