//! The structured record of a plenary session.

use serde::{Deserialize, Serialize};

use super::{AgendaItem, InterjectionOffset, LayoutKind, SessionMetadata, Speech, TocPartition};

/// A parsed plenary protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    /// Session metadata
    pub session: SessionMetadata,

    /// Table of contents partitioned into agenda, speaker and other entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<TocPartition>,

    /// Agenda items with linked speech indices
    #[serde(default)]
    pub agenda_items: Vec<AgendaItem>,

    /// Speeches in document order
    #[serde(default)]
    pub speeches: Vec<Speech>,

    /// Externalized interjection positions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interjection_offsets: Vec<InterjectionOffset>,

    /// Pipeline diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

impl Protocol {
    /// Create an empty protocol.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a speech by its 1-based index.
    pub fn speech(&self, index: usize) -> Option<&Speech> {
        if index == 0 {
            return None;
        }
        self.speeches.get(index - 1)
    }

    /// Speeches linked to an agenda item.
    pub fn speeches_for<'a>(&'a self, item: &'a AgendaItem) -> impl Iterator<Item = &'a Speech> {
        item.linked_speech_indices
            .iter()
            .filter_map(move |&i| self.speech(i))
    }

    /// Total number of interjections across all speeches.
    pub fn interjection_count(&self) -> usize {
        self.speeches.iter().map(|s| s.annotations.len()).sum()
    }
}

/// Diagnostics collected while parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Per-page layout results
    pub pages: Vec<PageDiagnostic>,
    /// Lines removed as headers and footers
    pub boilerplate: BoilerplateReport,
    /// Offset between printed and physical page numbers, if inferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_offset: Option<i64>,
    /// Number of lines in the detected contents block
    pub toc_lines: usize,
    /// Body lines dropped before the first speaker header
    pub preamble_lines: usize,
}

/// Layout result of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDiagnostic {
    /// Physical page number
    pub page: u32,
    /// How the lines were obtained
    pub layout: LayoutKind,
    /// Gutter position on two-column pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_x: Option<f32>,
    /// Number of reconstructed lines
    pub line_count: usize,
}

/// Counts reported by the boilerplate stripper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoilerplateReport {
    /// Pages that lost at least one line
    pub pages_affected: usize,
    /// Total lines removed
    pub lines_removed: usize,
    /// Repeated header/footer texts that were detected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repeated_lines: Vec<String>,
}
