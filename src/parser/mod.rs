//! Page sources, layout reconstruction and the protocol pipeline.

mod layout;
mod options;
mod pdf_source;
mod protocol_parser;
mod source;

pub use layout::{
    detect_columns, group_words_into_lines, reconstruct_page, LayoutAnalyzer, LayoutConfig,
    GAP_STDDEV_FACTOR, LINE_TOLERANCE, MIN_COLUMN_GAP, MIN_WORDS_FOR_COLUMNS,
};
pub use options::{BoilerplateMode, ParseOptions, SegmentMode};
pub use pdf_source::{is_pdf_bytes, PdfSource};
pub use protocol_parser::ProtocolParser;
pub use source::{MemorySource, PageContent, PageSource};
