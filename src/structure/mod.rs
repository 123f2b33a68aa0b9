//! Structural parsing of the cleaned line stream.
//!
//! - [`metadata`]: session number, date, times and location
//! - [`toc`]: contents block, agenda items and declared speaker order
//! - [`speech`]: speaker headers, speeches and interjections
//! - [`reflow`]: paragraph and segment post-passes
//! - [`linker`]: speech to agenda item assignment

pub mod linker;
pub mod metadata;
pub mod patterns;
pub mod reflow;
pub mod speaker;
pub mod speech;
pub mod toc;

pub use linker::link_agenda;
pub use metadata::extract_metadata;
pub use speaker::{parse_label, SpeakerLabel};
pub use speech::{segment_speeches, Segmentation, SpeechSegmenter};
pub use toc::{
    classify_entry, find_toc_block, logical_entries, parse_agenda_items, parse_entries,
    parse_partition, split_header, LogicalEntry, TocBlock,
};
