//! Speeches and embedded interjections.

use serde::{Deserialize, Serialize};

/// A single speech, from one speaker header to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speech {
    /// 1-based position in document order
    pub index: usize,

    /// Who is speaking
    pub speaker: Speaker,

    /// Speech text with interjections removed
    pub text: String,

    /// Interjections in detection order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Interjection>,

    /// Page of the speaker header
    pub start_page: u32,

    /// Page of the last line of the speech
    pub end_page: u32,

    /// Reconstructed text including interjections; offsets index into it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// Per-line positions within `raw_text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_offsets: Option<Vec<LineOffset>>,

    /// Reflowed paragraphs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,

    /// Alternating text and interjection spans
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
}

/// Speaker information from a header line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Header label as printed, up to the colon
    pub raw_text: String,
    /// Name without academic titles
    pub normalized_name: String,
    /// Role label
    pub role: String,
    /// Normalized party token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
}

/// A parenthesized audience reaction or procedural remark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interjection {
    /// Stable index within the speech (1-based, detection order)
    pub annotation_ref: u32,
    /// Text inside the parentheses
    pub text: String,
    /// Category tag such as "Beifall" or "Zuruf"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Embedded position, when offsets are neither compact nor externalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<InterjectionOffset>,
}

/// Absolute position of an interjection inside its speech's raw text.
///
/// `raw_start..raw_end` are character (not byte) offsets of the text inside
/// the parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterjectionOffset {
    /// Matches `Interjection::annotation_ref`
    pub annotation_ref: u32,
    /// Matches `Speech::index`
    pub speech_index: usize,
    /// First character of the interjection text
    pub raw_start: usize,
    /// One past the last character of the interjection text
    pub raw_end: usize,
    /// Page the interjection was printed on
    pub page: u32,
    /// Index of the line in the body line stream
    pub line_index: usize,
}

/// Position of one body line inside a speech's raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOffset {
    /// Index of the line in the body line stream
    pub line_index: usize,
    /// First character of the line within the raw text
    pub char_start: usize,
    /// One past the last character
    pub char_end: usize,
    /// The line's contribution to the raw text
    pub text: String,
}

/// Kind of a speech segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Spoken text
    Text,
    /// An interjection
    Interjection,
}

/// A contiguous span of a speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment kind
    pub kind: SegmentKind,
    /// Segment text
    pub text: String,
    /// Reference of the interjection, for interjection segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_ref: Option<u32>,
    /// Hierarchical number such as "3.2"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}
