//! Positioned words and reconstructed reading-order lines.

use serde::{Deserialize, Serialize};

/// A word with its horizontal extent and vertical position on the page.
///
/// Coordinates are top-down: a larger `top` is further down the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// The text content
    pub text: String,
    /// Left edge
    pub x0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge, measured from the top of the page
    pub top: f32,
    /// Font name reported by the extractor, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// Whether the font appears to be bold
    #[serde(default)]
    pub bold: bool,
}

impl Word {
    /// Create a word without font attributes.
    pub fn new(text: impl Into<String>, x0: f32, x1: f32, top: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            top,
            font_name: None,
            bold: false,
        }
    }

    /// Attach a font name; the bold flag is derived from it.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        let font_name = font_name.into();
        let lower = font_name.to_lowercase();
        self.bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        self.font_name = Some(font_name);
        self
    }

    /// Mark the word as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Horizontal midpoint.
    pub fn mid_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// A reconstructed line of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Page number (1-indexed, or the printed page number once inferred)
    pub page: u32,
    /// Line text
    pub text: String,
    /// Whether most of the line is set in a bold font
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
}

impl Line {
    /// Create a plain (non-bold) line.
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
            bold: false,
        }
    }

    /// Check if the line has no visible content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// How the lines of a page were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Words grouped into lines in natural top-to-bottom order
    Single,
    /// Words split at a gutter, column 0 emitted before column 1
    TwoColumn,
    /// Word extraction failed; plain extracted text was used
    Fallback,
    /// Word extraction returned nothing; plain extracted text was used
    EmptyFallback,
}

impl LayoutKind {
    /// Diagnostic tag as used in debug output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Single => "single",
            LayoutKind::TwoColumn => "two-column",
            LayoutKind::Fallback => "fallback",
            LayoutKind::EmptyFallback => "empty-fallback",
        }
    }
}

/// The reconstructed lines of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLines {
    /// Page number (1-indexed)
    pub page: u32,
    /// Lines in reading order
    pub lines: Vec<Line>,
    /// How the lines were obtained
    pub kind: LayoutKind,
    /// Horizontal split point on two-column pages
    pub split_x: Option<f32>,
}

impl PageLines {
    /// Text of every line, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }
}
