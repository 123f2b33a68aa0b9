//! Removal of running headers, footers and page numbers.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{BoilerplateReport, Line};
use crate::parser::BoilerplateMode;

/// Lines inspected at each page edge by the frequency pass.
pub const EDGE_LINES: usize = 3;

/// Share of pages a line must repeat on to count as furniture.
pub const REPEAT_RATIO: f64 = 0.7;

/// Leading lines the pattern pass may strip.
pub const MAX_HEADER_LINES: usize = 3;

/// Trailing lines the pattern pass may strip.
pub const MAX_TRAILER_LINES: usize = 5;

/// Running header: the institution, optionally "von <Land>", then either
/// nothing else, a page number, or a dash-separated "N. Wahlperiode" /
/// "N. Sitzung" tail.
static HEADER_INSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\d{1,5}\s+)?(?:Deutscher Bundestag|Bundesrat|Abgeordnetenhaus(?:\s+von\s+Berlin)?|(?:Bremische|Hamburgische)\s+Bürgerschaft|Bürgerschaft|(?:Bayerischer|Sächsischer|Hessischer|Niedersächsischer|Thüringer)\s+Landtag|Landtag(?:\s+(?:von|des\s+Landes)\s+[\p{Lu}][\p{L}\-]+)?)(?:\s*[–—-]\s*\d{1,2}\.\s*(?:Wahlperiode|Sitzung)\b[^:]{0,160}|\s+\d{1,5})?$",
    )
    .unwrap()
});

static HEADER_SITTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d+\.\s*Sitzung.*\)$").unwrap());

static HEADER_PLENARPROTOKOLL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Plenarprotokoll\s+\d+\s*/\s*\d+\s*$").unwrap());

static HEADER_PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3,5})$").unwrap());

static TRAILER_CLOSING_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?Schlu(?:ss|ß):?\s*\d{1,2}[.:]\d{2}\s*Uhr\.?\)?$").unwrap());

static TRAILER_END_OF_SITTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?(?:Ende|Schluss|Schluß) der Sitzung\b.*$").unwrap());

static TRAILER_PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,5})[.,;:]?$").unwrap());

/// Result of stripping a document.
#[derive(Debug, Clone, Default)]
pub struct StripOutcome {
    /// Remaining lines per page
    pub pages: Vec<Vec<Line>>,
    /// Removal counts
    pub report: BoilerplateReport,
    /// `(physical page, printed page)` pairs from removed page-number lines
    pub page_numbers: Vec<(u32, u32)>,
}

/// Strips page furniture from reconstructed pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoilerplateStripper {
    mode: BoilerplateMode,
}

impl BoilerplateStripper {
    /// Create a stripper for the given mode.
    pub fn new(mode: BoilerplateMode) -> Self {
        Self { mode }
    }

    /// Strip every page.
    ///
    /// The frequency pass needs all pages before it can decide anything, so
    /// this is the barrier between layout reconstruction and cleanup.
    pub fn strip(&self, pages: Vec<Vec<Line>>) -> StripOutcome {
        let before: Vec<usize> = pages.iter().map(Vec::len).collect();
        let mut page_numbers = Vec::new();
        let mut repeated_lines = Vec::new();

        let mut pages = pages;
        if self.mode.frequency() {
            let repeated = detect_repeated_edge_lines(&pages);
            repeated_lines = repeated.iter().cloned().collect();
            repeated_lines.sort();
            pages = pages
                .into_iter()
                .map(|lines| strip_repeated(lines, &repeated, &mut page_numbers))
                .collect();
        }

        if self.mode.patterns() {
            pages = pages
                .into_iter()
                .map(|lines| strip_patterns(lines, &mut page_numbers))
                .collect();
        }

        let mut report = BoilerplateReport {
            repeated_lines,
            ..Default::default()
        };
        for (page, &count) in pages.iter().zip(&before) {
            let removed = count - page.len();
            if removed > 0 {
                report.pages_affected += 1;
                report.lines_removed += removed;
            }
        }

        log::debug!(
            "Boilerplate: removed {} lines on {} pages",
            report.lines_removed,
            report.pages_affected
        );

        StripOutcome {
            pages,
            report,
            page_numbers,
        }
    }
}

fn edge_key(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn edge_indices(len: usize) -> impl Iterator<Item = usize> {
    let head = 0..EDGE_LINES.min(len);
    let tail = len.saturating_sub(EDGE_LINES).max(EDGE_LINES.min(len))..len;
    head.chain(tail)
}

/// Minimum number of pages a line must appear on to be treated as repeated.
pub fn repeat_threshold(page_count: usize) -> usize {
    ((REPEAT_RATIO * page_count as f64).ceil() as usize).max(2)
}

/// Collect edge-line texts that repeat across most pages.
pub fn detect_repeated_edge_lines(pages: &[Vec<Line>]) -> HashSet<String> {
    let threshold = repeat_threshold(pages.len());
    let mut counts = HashMap::<String, usize>::new();

    for lines in pages {
        let seen: HashSet<String> = edge_indices(lines.len())
            .map(|i| edge_key(&lines[i].text))
            .filter(|key| !key.is_empty())
            .collect();
        for key in seen {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter_map(|(key, count)| (count >= threshold).then_some(key))
        .collect()
}

fn is_short_page_number(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text.len() <= 3 && text.chars().all(|c| c.is_ascii_digit())
}

fn strip_repeated(
    lines: Vec<Line>,
    repeated: &HashSet<String>,
    page_numbers: &mut Vec<(u32, u32)>,
) -> Vec<Line> {
    let len = lines.len();
    let edges: HashSet<usize> = edge_indices(len).collect();

    lines
        .into_iter()
        .enumerate()
        .filter(|(i, line)| {
            if is_short_page_number(&line.text) {
                if edges.contains(i) {
                    if let Ok(printed) = line.text.trim().parse::<u32>() {
                        page_numbers.push((line.page, printed));
                    }
                }
                return false;
            }
            !(edges.contains(i) && repeated.contains(&edge_key(&line.text)))
        })
        .map(|(_, line)| line)
        .collect()
}

fn is_header_line(text: &str) -> bool {
    HEADER_INSTITUTION.is_match(text)
        || HEADER_SITTING.is_match(text)
        || HEADER_PLENARPROTOKOLL.is_match(text)
        || HEADER_PAGE_NUMBER.is_match(text)
}

fn is_trailer_line(text: &str) -> bool {
    text.is_empty()
        || TRAILER_CLOSING_TIME.is_match(text)
        || TRAILER_END_OF_SITTING.is_match(text)
        || TRAILER_PAGE_NUMBER.is_match(text)
}

fn record_page_number(line: &Line, re: &Regex, page_numbers: &mut Vec<(u32, u32)>) {
    if let Some(printed) = re
        .captures(line.text.trim())
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    {
        page_numbers.push((line.page, printed));
    }
}

fn strip_patterns(mut lines: Vec<Line>, page_numbers: &mut Vec<(u32, u32)>) -> Vec<Line> {
    // Leading blank lines do not count against the header budget.
    let mut start = 0;
    let mut stripped = 0;
    while start < lines.len() {
        let text = lines[start].text.trim();
        if text.is_empty() {
            start += 1;
        } else if stripped < MAX_HEADER_LINES && is_header_line(text) {
            record_page_number(&lines[start], &HEADER_PAGE_NUMBER, page_numbers);
            start += 1;
            stripped += 1;
        } else {
            break;
        }
    }

    let mut end = lines.len();
    let mut stripped = 0;
    while end > start && stripped < MAX_TRAILER_LINES {
        let line = &lines[end - 1];
        if !is_trailer_line(line.text.trim()) {
            break;
        }
        record_page_number(line, &TRAILER_PAGE_NUMBER, page_numbers);
        end -= 1;
        stripped += 1;
    }

    lines.truncate(end);
    lines.drain(..start);
    lines
}

/// Infer the offset between printed and physical page numbers.
///
/// Returns the most frequent `printed - physical` difference; ties go to the
/// difference seen first.
pub fn infer_page_offset(page_numbers: &[(u32, u32)]) -> Option<i64> {
    let mut counts: Vec<(i64, usize)> = Vec::new();
    for &(physical, printed) in page_numbers {
        let offset = printed as i64 - physical as i64;
        match counts.iter_mut().find(|(o, _)| *o == offset) {
            Some((_, count)) => *count += 1,
            None => counts.push((offset, 1)),
        }
    }

    let mut best: Option<(i64, usize)> = None;
    for (offset, count) in counts {
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((offset, count));
        }
    }
    best.map(|(offset, _)| offset)
}

/// Renumber lines with printed page numbers.
pub fn apply_page_offset(lines: &mut [Line], offset: i64) {
    for line in lines {
        let printed = line.page as i64 + offset;
        if printed > 0 {
            line.page = printed as u32;
        }
    }
}
