//! Agenda items and table-of-contents entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An item on the session agenda, built from the table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaItem {
    /// Ordinal as printed (e.g. "1", "3a"); `None` for unnumbered items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// Kind of business, e.g. "Aktuelle Debatte"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Title of the item
    pub title: String,

    /// Remaining header text and unclassified lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,

    /// Referenced printed papers ("17/8819")
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub drucksache_refs: BTreeSet<String>,

    /// Attached resolutions, reports and recommendations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subentries: Vec<SubEntry>,

    /// Speaker order as declared in the table of contents
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declared_speakers: Vec<DeclaredSpeaker>,

    /// First page the item is dealt with on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_page: Option<u32>,

    /// Indices of the speeches given under this item
    #[serde(default)]
    pub linked_speech_indices: Vec<usize>,
}

impl AgendaItem {
    /// Append free text to `extra`, space-joined.
    pub fn push_extra(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match self.extra.as_mut() {
            Some(extra) => {
                extra.push(' ');
                extra.push_str(text);
            }
            None => self.extra = Some(text.to_string()),
        }
    }
}

/// A subordinate entry of an agenda item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEntry {
    /// Entry text
    pub text: String,
    /// Printed papers referenced by the entry
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub drucksache_refs: BTreeSet<String>,
}

/// A speaker listed in the table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredSpeaker {
    /// Role label, e.g. "Abg." or "Minister für Finanzen"
    pub role: String,
    /// Speaker name without academic titles
    pub name: String,
    /// Normalized party token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    /// First referenced page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Classification of a single logical TOC entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TocEntryKind {
    /// "N. <body> <page>"
    NumberedItem,
    /// Opener keyword followed by a page reference
    UnnumberedItem,
    /// Role, name, optional party, page references
    Speaker,
    /// Anything else
    Other,
}

/// A logical table-of-contents entry from the single-pass classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Entry classification
    pub kind: TocEntryKind,
    /// Text with dot leaders and page numbers removed
    pub text: String,
    /// Ordinal of numbered items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Kind/title/extra split for agenda entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_kind: Option<String>,
    /// Title for agenda entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Leftover header text for agenda entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    /// Parsed speaker for speaker entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<DeclaredSpeaker>,
    /// All trailing page references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<u32>,
}

impl TocEntry {
    /// The reference page (first trailing page number).
    pub fn page(&self) -> Option<u32> {
        self.pages.first().copied()
    }
}

/// TOC entries partitioned by classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocPartition {
    /// Numbered and unnumbered agenda entries
    pub agenda: Vec<TocEntry>,
    /// Speaker-order entries
    pub speakers: Vec<TocEntry>,
    /// Unclassified entries
    pub other: Vec<TocEntry>,
}

impl TocPartition {
    /// Partition entries, preserving order within each bucket.
    pub fn from_entries(entries: Vec<TocEntry>) -> Self {
        let mut partition = Self::default();
        for entry in entries {
            match entry.kind {
                TocEntryKind::NumberedItem | TocEntryKind::UnnumberedItem => {
                    partition.agenda.push(entry)
                }
                TocEntryKind::Speaker => partition.speakers.push(entry),
                TocEntryKind::Other => partition.other.push(entry),
            }
        }
        partition
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.agenda.len() + self.speakers.len() + self.other.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
