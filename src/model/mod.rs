//! Data model for reconstructed pages and parsed protocols.
//!
//! Layout types (`Word`, `Line`) carry the document from the extraction
//! collaborator through cleanup; the remaining types form the serializable
//! output record handed to callers.

mod agenda;
mod line;
mod protocol;
mod session;
mod speech;

pub use agenda::{AgendaItem, DeclaredSpeaker, SubEntry, TocEntry, TocEntryKind, TocPartition};
pub use line::{LayoutKind, Line, PageLines, Word};
pub use protocol::{BoilerplateReport, Diagnostics, PageDiagnostic, Protocol};
pub use session::{SessionMetadata, TimeRange};
pub use speech::{
    Interjection, InterjectionOffset, LineOffset, Segment, SegmentKind, Speaker, Speech,
};
