//! Post-passes over finished speeches: paragraph reflow and segment
//! derivation.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{InterjectionOffset, Segment, SegmentKind};
use crate::parser::SegmentMode;

/// Minimum paragraph length before terminal punctuation ends it.
pub const MIN_PARAGRAPH_CHARS: usize = 35;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\(\d{1,3}\)|\d{1,3}\.|[a-z]\)|[–—\-•·*])\s").unwrap());

static FOOTNOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[\d+\]").unwrap());

fn ends_sentence(text: &str) -> bool {
    text.trim_end()
        .trim_end_matches(['"', '“', '”', '«', '»', '\''])
        .ends_with(['.', '!', '?', ':'])
}

/// Whether a line opens an enumeration or bullet.
pub fn is_list_marker(line: &str) -> bool {
    LIST_MARKER.is_match(line.trim_start())
}

/// Join lines into paragraphs.
///
/// A paragraph ends when it already ends a sentence and has reached
/// [`MIN_PARAGRAPH_CHARS`], or when the next line opens a list item.
pub fn reflow_paragraphs<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut buffer = String::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        if buffer.is_empty() {
            buffer.push_str(line);
            continue;
        }

        let closes = ends_sentence(&buffer) && buffer.chars().count() >= MIN_PARAGRAPH_CHARS;
        if closes || is_list_marker(line) {
            paragraphs.push(std::mem::take(&mut buffer));
            buffer.push_str(line);
        } else {
            buffer.push(' ');
            buffer.push_str(line);
        }
    }

    if !buffer.is_empty() {
        paragraphs.push(buffer);
    }
    paragraphs
}

fn char_slice(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    let start = start.min(end);
    chars[start..end].iter().collect()
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    let text = FOOTNOTE_MARKER.replace(text, "");
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if let Some(last) = segments.last_mut() {
        if last.kind == SegmentKind::Text {
            last.text.push(' ');
            last.text.push_str(text);
            return;
        }
    }
    segments.push(Segment {
        kind: SegmentKind::Text,
        text: text.to_string(),
        annotation_ref: None,
        number: None,
    });
}

/// Outer span of an interjection: the enclosing parentheses when they sit
/// next to `start..end` with only whitespace in between, else the bare range.
fn delimiters(chars: &[char], start: usize, end: usize) -> (usize, usize) {
    let start = start.min(chars.len());
    let end = end.clamp(start, chars.len());

    let mut open = start;
    while open > 0 && chars[open - 1].is_whitespace() {
        open -= 1;
    }
    let open = if open > 0 && chars[open - 1] == '(' { open - 1 } else { start };

    let mut close = end;
    while close < chars.len() && chars[close].is_whitespace() {
        close += 1;
    }
    let close = if close < chars.len() && chars[close] == ')' { close + 1 } else { end };

    (open, close)
}

/// Rebuild a speech as alternating text and interjection segments.
///
/// Each interjection's `raw_start..raw_end` range is replayed against the
/// raw text; the enclosing parentheses are dropped.
pub fn derive_segments(
    raw_text: &str,
    offsets: &[InterjectionOffset],
    speech_index: usize,
    mode: SegmentMode,
) -> Vec<Segment> {
    if mode == SegmentMode::Off {
        return Vec::new();
    }

    let chars: Vec<char> = raw_text.chars().collect();
    let mut ordered: Vec<&InterjectionOffset> = offsets.iter().collect();
    ordered.sort_by_key(|o| o.raw_start);

    let mut segments = Vec::new();
    let mut cursor = 0;
    for offset in ordered {
        let (open, close) = delimiters(&chars, offset.raw_start, offset.raw_end);
        push_text(&mut segments, &char_slice(&chars, cursor, open));
        segments.push(Segment {
            kind: SegmentKind::Interjection,
            text: char_slice(&chars, offset.raw_start, offset.raw_end),
            annotation_ref: Some(offset.annotation_ref),
            number: None,
        });
        cursor = close.max(cursor);
    }
    push_text(&mut segments, &char_slice(&chars, cursor, chars.len()));

    number_segments(&mut segments, speech_index, mode);
    segments
}

/// Assign numbers according to `mode`: the first numbered segment carries
/// the bare speech index ("3"), the following ones "3.1", "3.2", ...
pub fn number_segments(segments: &mut [Segment], speech_index: usize, mode: SegmentMode) {
    let mut counter = 0;
    for segment in segments.iter_mut() {
        let numbered = match mode {
            SegmentMode::All => true,
            SegmentMode::InterjectionsOnly => segment.kind == SegmentKind::Interjection,
            SegmentMode::Off | SegmentMode::Plain => false,
        };
        if numbered {
            segment.number = Some(if counter == 0 {
                speech_index.to_string()
            } else {
                format!("{}.{}", speech_index, counter)
            });
            counter += 1;
        }
    }
}
