//! Layout reconstruction: positioned words to reading-order lines.
//!
//! A page is either read as a single stream, or split at a vertical gutter
//! into two columns which are emitted one after the other. Column detection
//! looks at the gaps between sorted word midpoints: a page is two-column
//! only when one gap is both absolutely wide and a statistical outlier among
//! the others.

use std::cmp::Ordering;

use crate::model::{LayoutKind, Line, PageLines, Word};

use super::source::PageSource;

/// Maximum vertical distance between a word and its line's reference top.
pub const LINE_TOLERANCE: f32 = 3.2;

/// Pages with fewer words are never split into columns.
pub const MIN_WORDS_FOR_COLUMNS: usize = 25;

/// Absolute lower bound for a gutter between midpoints.
pub const MIN_COLUMN_GAP: f32 = 25.0;

/// Standard deviations above the mean gap a gutter has to reach.
pub const GAP_STDDEV_FACTOR: f32 = 1.2;

/// Tunable thresholds for layout reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Vertical tolerance when grouping words into lines
    pub line_tolerance: f32,
    /// Minimum word count for column detection
    pub min_words_for_columns: usize,
    /// Absolute minimum gutter width
    pub min_column_gap: f32,
    /// Outlier factor applied to the standard deviation of the other gaps
    pub gap_stddev_factor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: LINE_TOLERANCE,
            min_words_for_columns: MIN_WORDS_FOR_COLUMNS,
            min_column_gap: MIN_COLUMN_GAP,
            gap_stddev_factor: GAP_STDDEV_FACTOR,
        }
    }
}

/// Reconstructs reading-order lines from positioned words.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    config: LayoutConfig,
}

impl LayoutAnalyzer {
    /// Create an analyzer with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom thresholds.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Get the active thresholds.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Detect whether the words form one or two columns.
    ///
    /// Returns the column count and, for two columns, the x coordinate
    /// halfway across the gutter.
    pub fn detect_columns(&self, words: &[Word]) -> (usize, Option<f32>) {
        if words.len() < self.config.min_words_for_columns {
            return (1, None);
        }

        let mut mids: Vec<f32> = words.iter().map(Word::mid_x).collect();
        mids.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let gaps: Vec<f32> = mids.windows(2).map(|w| w[1] - w[0]).collect();
        let Some((widest, &largest)) = gaps
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        else {
            return (1, None);
        };

        let others: Vec<f32> = gaps
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != widest)
            .map(|(_, g)| *g)
            .collect();
        let (mean, stddev) = mean_and_stddev(&others);
        let threshold = self
            .config
            .min_column_gap
            .max(mean + self.config.gap_stddev_factor * stddev);

        log::debug!(
            "Widest midpoint gap {:.1} (mean {:.1}, stddev {:.1}, threshold {:.1})",
            largest,
            mean,
            stddev,
            threshold
        );

        if largest >= threshold {
            let split = (mids[widest] + mids[widest + 1]) / 2.0;
            (2, Some(split))
        } else {
            (1, None)
        }
    }

    /// Group words into lines by vertical position.
    ///
    /// Words are visited in (top, x0) order; a word joins the current line
    /// while its `top` stays within the tolerance of the line's first word.
    pub fn group_words_into_lines(&self, page: u32, mut words: Vec<Word>) -> Vec<Line> {
        words.retain(|w| !w.text.trim().is_empty());
        if words.is_empty() {
            return vec![];
        }

        words.sort_by(|a, b| {
            a.top
                .partial_cmp(&b.top)
                .unwrap_or(Ordering::Equal)
                .then(a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
        });

        let mut lines = Vec::new();
        let mut current: Vec<Word> = Vec::new();
        let mut reference_top: Option<f32> = None;

        for word in words {
            match reference_top {
                Some(top) if (word.top - top).abs() <= self.config.line_tolerance => {
                    current.push(word);
                }
                _ => {
                    if !current.is_empty() {
                        lines.push(build_line(page, std::mem::take(&mut current)));
                    }
                    reference_top = Some(word.top);
                    current.push(word);
                }
            }
        }

        if !current.is_empty() {
            lines.push(build_line(page, current));
        }

        lines
    }

    /// Reconstruct the lines of a page from its words.
    pub fn reconstruct(&self, page: u32, words: Vec<Word>) -> PageLines {
        let (columns, split) = self.detect_columns(&words);

        match (columns, split) {
            (2, Some(split_x)) => {
                let (left, right): (Vec<Word>, Vec<Word>) =
                    words.into_iter().partition(|w| w.mid_x() < split_x);
                let mut lines = self.group_words_into_lines(page, left);
                lines.extend(self.group_words_into_lines(page, right));

                log::debug!(
                    "Page {}: two columns split at x={:.1}, {} lines",
                    page,
                    split_x,
                    lines.len()
                );
                PageLines {
                    page,
                    lines,
                    kind: LayoutKind::TwoColumn,
                    split_x: Some(split_x),
                }
            }
            _ => {
                let lines = self.group_words_into_lines(page, words);
                log::debug!("Page {}: single column, {} lines", page, lines.len());
                PageLines {
                    page,
                    lines,
                    kind: LayoutKind::Single,
                    split_x: None,
                }
            }
        }
    }

    /// Reconstruct a page from a source, falling back to plain text.
    ///
    /// Never fails: extraction errors and empty word lists degrade to the
    /// source's plain text, and a failing plain-text path yields no lines.
    pub fn reconstruct_page<S: PageSource + ?Sized>(&self, source: &S, page: u32) -> PageLines {
        match source.words(page) {
            Ok(words) if words.iter().any(|w| !w.text.trim().is_empty()) => {
                self.reconstruct(page, words)
            }
            Ok(_) => fallback_lines(source, page, LayoutKind::EmptyFallback),
            Err(e) => {
                log::warn!("Word extraction failed on page {}: {}", page, e);
                fallback_lines(source, page, LayoutKind::Fallback)
            }
        }
    }
}

/// Detect columns with the default thresholds.
pub fn detect_columns(words: &[Word]) -> (usize, Option<f32>) {
    LayoutAnalyzer::new().detect_columns(words)
}

/// Group words into lines with the default thresholds.
pub fn group_words_into_lines(page: u32, words: Vec<Word>) -> Vec<Line> {
    LayoutAnalyzer::new().group_words_into_lines(page, words)
}

/// Reconstruct a page from a source with the default thresholds.
pub fn reconstruct_page<S: PageSource + ?Sized>(source: &S, page: u32) -> PageLines {
    LayoutAnalyzer::new().reconstruct_page(source, page)
}

fn build_line(page: u32, mut words: Vec<Word>) -> Line {
    words.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));

    let total_chars: usize = words.iter().map(|w| w.text.chars().count()).sum();
    let bold_chars: usize = words
        .iter()
        .filter(|w| w.bold)
        .map(|w| w.text.chars().count())
        .sum();

    let text = words
        .iter()
        .map(|w| w.text.trim())
        .collect::<Vec<_>>()
        .join(" ");

    Line {
        page,
        text,
        bold: total_chars > 0 && bold_chars * 2 > total_chars,
    }
}

fn fallback_lines<S: PageSource + ?Sized>(source: &S, page: u32, kind: LayoutKind) -> PageLines {
    let lines = match source.plain_text(page) {
        Ok(text) => text
            .lines()
            .map(|l| Line::new(page, l.trim_end()))
            .collect(),
        Err(e) => {
            log::warn!("Plain text extraction failed on page {}: {}", page, e);
            vec![]
        }
    };

    log::debug!("Page {}: {} with {} lines", page, kind.as_str(), lines.len());
    PageLines {
        page,
        lines,
        kind,
        split_x: None,
    }
}

fn mean_and_stddev(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::source::{MemorySource, PageContent};

    fn clustered_words() -> Vec<Word> {
        let mut words = Vec::new();
        for i in 0..15 {
            let x = 95.0 + (i % 5) as f32 * 2.0;
            words.push(Word::new(format!("l{}", i), x - 10.0, x + 10.0, i as f32 * 12.0));
        }
        for i in 0..15 {
            let x = 495.0 + (i % 5) as f32 * 2.0;
            words.push(Word::new(format!("r{}", i), x - 10.0, x + 10.0, i as f32 * 12.0));
        }
        words
    }

    #[test]
    fn test_detect_two_columns() {
        let (columns, split) = detect_columns(&clustered_words());
        assert_eq!(columns, 2);
        let split = split.unwrap();
        assert!((split - 300.0).abs() < 5.0, "split was {}", split);
    }

    #[test]
    fn test_uniform_spacing_is_single_column() {
        let words: Vec<Word> = (0..30)
            .map(|i| {
                let x = 50.0 + i as f32 * 10.0;
                Word::new("w", x - 2.0, x + 2.0, 100.0)
            })
            .collect();
        assert_eq!(detect_columns(&words), (1, None));
    }

    #[test]
    fn test_few_words_never_split() {
        let words: Vec<Word> = clustered_words().into_iter().take(20).collect();
        assert_eq!(detect_columns(&words), (1, None));
    }

    #[test]
    fn test_group_words_tolerates_baseline_jitter() {
        let words = vec![
            Word::new("Landtag", 200.0, 240.0, 100.4),
            Word::new("Der", 100.0, 120.0, 100.0),
            Word::new("tagt.", 250.0, 270.0, 102.9),
            Word::new("Weiter", 100.0, 130.0, 114.0),
        ];
        let lines = group_words_into_lines(1, words);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Der Landtag tagt.");
        assert_eq!(lines[1].text, "Weiter");
    }

    #[test]
    fn test_two_column_order_is_column_major() {
        let analyzer = LayoutAnalyzer::new();
        let page = analyzer.reconstruct(3, clustered_words());
        assert_eq!(page.kind, LayoutKind::TwoColumn);
        assert_eq!(page.lines.len(), 30);
        assert!(page.lines[..15].iter().all(|l| l.text.starts_with('l')));
        assert!(page.lines[15..].iter().all(|l| l.text.starts_with('r')));
        assert!(page.lines.iter().all(|l| l.page == 3));
    }

    #[test]
    fn test_bold_majority() {
        let words = vec![
            Word::new("Präsidentin", 0.0, 50.0, 10.0).bold(),
            Word::new("Aras:", 55.0, 80.0, 10.0).bold(),
            Word::new("Ja", 85.0, 90.0, 10.0),
        ];
        let lines = group_words_into_lines(1, words);
        assert!(lines[0].bold);
    }

    #[test]
    fn test_fallback_tags() {
        let source = MemorySource::new(vec![
            PageContent::text("Zeile eins\nZeile zwei"),
            PageContent::failed("Zeile drei"),
            PageContent::words(vec![]),
        ]);

        let first = reconstruct_page(&source, 1);
        assert_eq!(first.kind, LayoutKind::EmptyFallback);
        assert_eq!(first.lines.len(), 2);

        let second = reconstruct_page(&source, 2);
        assert_eq!(second.kind, LayoutKind::Fallback);
        assert_eq!(second.lines[0].text, "Zeile drei");

        let third = reconstruct_page(&source, 3);
        assert_eq!(third.kind, LayoutKind::EmptyFallback);
        assert!(third.lines.is_empty());

        let missing = reconstruct_page(&source, 9);
        assert_eq!(missing.kind, LayoutKind::Fallback);
        assert!(missing.lines.is_empty());
    }
}
