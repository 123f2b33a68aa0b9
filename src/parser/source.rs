//! The page-source seam between word extraction and the pipeline.

use crate::error::{Error, Result};
use crate::model::Word;

/// Supplies per-page words and a plain-text fallback.
///
/// Pages are numbered from 1. Implementations must be shareable across
/// threads so pages can be reconstructed in parallel.
pub trait PageSource: Sync {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Positioned words of a page.
    fn words(&self, page: u32) -> Result<Vec<Word>>;

    /// Plain extracted text of a page, one line per physical line.
    fn plain_text(&self, page: u32) -> Result<String>;
}

/// Caller-supplied content of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    /// Positioned words, if word extraction succeeded
    pub words: Option<Vec<Word>>,
    /// Plain text fallback
    pub text: Option<String>,
    /// Whether word extraction failed
    pub failed: bool,
}

impl PageContent {
    /// A page with positioned words.
    pub fn words(words: Vec<Word>) -> Self {
        Self {
            words: Some(words),
            text: None,
            failed: false,
        }
    }

    /// A page that only has plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            words: None,
            text: Some(text.into()),
            failed: false,
        }
    }

    /// A page whose word extraction failed, with its plain text.
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            words: None,
            text: Some(text.into()),
            failed: true,
        }
    }

    /// Build a page from lines of text, one word per whitespace token.
    ///
    /// Each line gets its own vertical position. Words are packed one point
    /// apart, so the page always reads as a single column.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut words = Vec::new();
        for (row, line) in lines.into_iter().enumerate() {
            let top = 50.0 + row as f32 * 12.0;
            for (col, token) in line.split_whitespace().enumerate() {
                let x = 50.0 + col as f32;
                words.push(Word::new(token, x, x + 0.5, top));
            }
        }
        Self::words(words)
    }
}

/// An in-memory page source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<PageContent>,
}

impl MemorySource {
    /// Create a source from page contents.
    pub fn new(pages: Vec<PageContent>) -> Self {
        Self { pages }
    }

    /// Add a page.
    pub fn push(&mut self, page: PageContent) {
        self.pages.push(page);
    }

    fn page(&self, page: u32) -> Result<&PageContent> {
        if page == 0 {
            return Err(Error::PageOutOfRange(page, self.page_count()));
        }
        self.pages
            .get((page - 1) as usize)
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn words(&self, page: u32) -> Result<Vec<Word>> {
        let content = self.page(page)?;
        if content.failed {
            return Err(Error::TextExtract(format!("Page {}: no word data", page)));
        }
        Ok(content.words.clone().unwrap_or_default())
    }

    fn plain_text(&self, page: u32) -> Result<String> {
        let content = self.page(page)?;
        Ok(content.text.clone().unwrap_or_default())
    }
}
