//! Speech segmentation.
//!
//! The body line stream is folded into speeches: a speaker header closes
//! the active speech and opens the next, every other line is appended to
//! the active speech after any trailing interjection has been lifted out.
//! Lines before the first header are preamble and are dropped.

use std::sync::LazyLock;

use regex::Regex;

use super::patterns::{self, ROLE_PATTERN};
use super::reflow;
use super::speaker::{parse_label, SpeakerLabel};
use crate::model::{Interjection, InterjectionOffset, Line, LineOffset, Speaker, Speech};
use crate::parser::{ParseOptions, SegmentMode};

/// Longest name block accepted between role and colon.
pub const MAX_NAME_CHARS: usize = 160;

/// Longest interjection text.
pub const MAX_INTERJECTION_CHARS: usize = 400;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?P<label>{}\s+[^:\n]{{1,{}}}?)\s*:\s*(?P<rest>.*)$",
        ROLE_PATTERN, MAX_NAME_CHARS
    ))
    .unwrap()
});

static INTERJECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\((?P<text>[^()]{{1,{}}})\)\s*(?:\[\d+\])?\s*$",
        MAX_INTERJECTION_CHARS
    ))
    .unwrap()
});

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?)]\s+").unwrap());

/// A matched speaker header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch<'t> {
    /// Parsed role, name and party
    pub label: SpeakerLabel,
    /// Label as printed, up to the colon
    pub raw: &'t str,
    /// Text after the colon
    pub rest: &'t str,
}

/// Match a speaker header at the start of `text`.
pub fn match_header(text: &str) -> Option<HeaderMatch<'_>> {
    let caps = HEADER.captures(text)?;
    let raw = caps.name("label")?.as_str().trim();
    let rest = caps.name("rest").map_or("", |m| m.as_str().trim());
    let label = parse_label(raw)?;
    Some(HeaderMatch { label, raw, rest })
}

/// Whether `text` starts with a speaker header.
pub fn is_speaker_header(text: &str) -> bool {
    match_header(text).is_some()
}

/// A trailing interjection found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingInterjection<'t> {
    /// Text inside the parentheses
    pub text: &'t str,
    /// Line text before the interjection
    pub before: &'t str,
    /// Character offset of `text` within the line
    pub char_start: usize,
}

/// Find an interjection at the end of a line.
pub fn find_interjection(line: &str) -> Option<TrailingInterjection<'_>> {
    let caps = INTERJECTION.captures(line)?;
    let whole = caps.get(0)?;
    let inner = caps.name("text")?;
    let text = inner.as_str().trim();
    if text.is_empty() {
        return None;
    }
    let leading = inner.as_str().len() - inner.as_str().trim_start().len();
    Some(TrailingInterjection {
        text,
        before: line[..whole.start()].trim_end(),
        char_start: line[..inner.start() + leading].chars().count(),
    })
}

/// Result of segmenting a body line stream.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    /// Speeches in document order
    pub speeches: Vec<Speech>,
    /// Externalized interjection positions
    pub interjection_offsets: Vec<InterjectionOffset>,
    /// Lines dropped before the first header
    pub preamble_lines: usize,
}

/// The active speech.
struct SpeechBuilder {
    index: usize,
    speaker: Speaker,
    start_page: u32,
    end_page: u32,
    raw: String,
    raw_chars: usize,
    parts: Vec<String>,
    annotations: Vec<Interjection>,
    offsets: Vec<InterjectionOffset>,
    line_offsets: Vec<LineOffset>,
}

impl SpeechBuilder {
    fn new(index: usize, raw_label: &str, label: SpeakerLabel, page: u32) -> Self {
        Self {
            index,
            speaker: Speaker {
                raw_text: raw_label.to_string(),
                normalized_name: label.name,
                role: label.role,
                party: label.party,
            },
            start_page: page,
            end_page: page,
            raw: String::new(),
            raw_chars: 0,
            parts: Vec::new(),
            annotations: Vec::new(),
            offsets: Vec::new(),
            line_offsets: Vec::new(),
        }
    }

    fn push(&mut self, line_index: usize, page: u32, text: &str, categories: bool) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.end_page = page;

        if !self.raw.is_empty() {
            self.raw.push(' ');
            self.raw_chars += 1;
        }
        let char_start = self.raw_chars;
        self.raw.push_str(text);
        self.raw_chars += text.chars().count();
        self.line_offsets.push(LineOffset {
            line_index,
            char_start,
            char_end: self.raw_chars,
            text: text.to_string(),
        });

        let body = match find_interjection(text) {
            Some(found) => {
                let annotation_ref = self.annotations.len() as u32 + 1;
                let raw_start = char_start + found.char_start;
                self.offsets.push(InterjectionOffset {
                    annotation_ref,
                    speech_index: self.index,
                    raw_start,
                    raw_end: raw_start + found.text.chars().count(),
                    page,
                    line_index,
                });
                self.annotations.push(Interjection {
                    annotation_ref,
                    text: found.text.to_string(),
                    category: categories.then(|| patterns::categorize(found.text).to_string()),
                    position: None,
                });
                found.before
            }
            None => text,
        };

        if !body.is_empty() {
            self.parts.push(body.to_string());
        }
    }

    fn finish(self, options: &ParseOptions, offsets_out: &mut Vec<InterjectionOffset>) -> Speech {
        let mut annotations = self.annotations;
        if options.track_offsets {
            if options.externalize_offsets {
                offsets_out.extend(self.offsets.iter().copied());
            } else if !options.compact_interjections {
                for (annotation, offset) in annotations.iter_mut().zip(&self.offsets) {
                    annotation.position = Some(*offset);
                }
            }
        }

        let paragraphs = if options.reflow_paragraphs {
            reflow::reflow_paragraphs(&self.parts)
        } else {
            Vec::new()
        };

        let segments = match options.segments {
            SegmentMode::Off => Vec::new(),
            mode => reflow::derive_segments(&self.raw, &self.offsets, self.index, mode),
        };

        Speech {
            index: self.index,
            speaker: self.speaker,
            text: self.parts.join(" "),
            annotations,
            start_page: self.start_page,
            end_page: self.end_page,
            raw_text: options.track_offsets.then_some(self.raw),
            line_offsets: options.track_offsets.then_some(self.line_offsets),
            paragraphs,
            segments,
        }
    }
}

/// Folds body lines into speeches.
pub struct SpeechSegmenter<'a> {
    options: &'a ParseOptions,
    output: Segmentation,
    active: Option<SpeechBuilder>,
}

impl<'a> SpeechSegmenter<'a> {
    /// Create a segmenter honoring `options`.
    pub fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            output: Segmentation::default(),
            active: None,
        }
    }

    /// Segment `lines[start..]`; line indices stay relative to `lines`.
    pub fn segment(mut self, lines: &[Line], start: usize) -> Segmentation {
        for (line_index, line) in lines.iter().enumerate().skip(start) {
            self.feed(line_index, line);
        }
        self.close();

        log::debug!(
            "Segmented {} speeches, {} preamble lines dropped",
            self.output.speeches.len(),
            self.output.preamble_lines
        );
        self.output
    }

    fn accepts(&self, header: &HeaderMatch<'_>, bold: bool) -> bool {
        if self.options.require_bold_headers && !bold {
            return false;
        }
        let member = patterns::is_member_role(&header.label.role);
        !(member && header.label.party.is_none() && !self.options.accept_missing_party)
    }

    /// A header after a sentence end inside the line.
    ///
    /// Returns the byte offset where the header starts. Only headers with a
    /// party or a presiding role qualify.
    fn inline_header<'t>(&self, text: &'t str, bold: bool) -> Option<(usize, HeaderMatch<'t>)> {
        SENTENCE_END.find_iter(text).find_map(|m| {
            let candidate = &text[m.end()..];
            patterns::role_prefix_len(candidate)?;
            let header = match_header(candidate)?;
            let strong = header.label.party.is_some()
                || patterns::is_presiding_role(&header.label.role);
            (strong && self.accepts(&header, bold)).then_some((m.end(), header))
        })
    }

    fn feed(&mut self, line_index: usize, line: &Line) {
        let mut remaining = line.text.trim();
        if remaining.is_empty() {
            return;
        }

        if let Some(header) = match_header(remaining).filter(|h| self.accepts(h, line.bold)) {
            self.open(&header, line.page);
            remaining = header.rest;
        }

        while !remaining.is_empty() {
            let inline = if self.options.inline_header_fallback {
                self.inline_header(remaining, line.bold)
            } else {
                None
            };

            match inline {
                Some((cut, header)) => {
                    self.append(line_index, line.page, &remaining[..cut]);
                    self.open(&header, line.page);
                    remaining = header.rest;
                }
                None => {
                    self.append(line_index, line.page, remaining);
                    break;
                }
            }
        }
    }

    fn append(&mut self, line_index: usize, page: u32, text: &str) {
        let categories = self.options.interjection_categories;
        match self.active.as_mut() {
            Some(speech) => speech.push(line_index, page, text, categories),
            None => {
                if !text.trim().is_empty() {
                    self.output.preamble_lines += 1;
                }
            }
        }
    }

    fn open(&mut self, header: &HeaderMatch<'_>, page: u32) {
        self.close();
        let index = self.output.speeches.len() + 1;
        self.active = Some(SpeechBuilder::new(index, header.raw, header.label.clone(), page));
    }

    fn close(&mut self) {
        if let Some(builder) = self.active.take() {
            let speech = builder.finish(self.options, &mut self.output.interjection_offsets);
            self.output.speeches.push(speech);
        }
    }
}

/// Segment a line stream with the given options.
pub fn segment_speeches(lines: &[Line], start: usize, options: &ParseOptions) -> Segmentation {
    SpeechSegmenter::new(options).segment(lines, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts.iter().map(|t| Line::new(7, *t)).collect()
    }

    #[test]
    fn test_match_header() {
        let header = match_header("Abg. Andreas Stoch SPD: Vielen Dank.").unwrap();
        assert_eq!(header.raw, "Abg. Andreas Stoch SPD");
        assert_eq!(header.label.name, "Andreas Stoch");
        assert_eq!(header.label.party.as_deref(), Some("SPD"));
        assert_eq!(header.rest, "Vielen Dank.");

        let header = match_header("Präsidentin Muhterem Aras:").unwrap();
        assert_eq!(header.rest, "");
        assert!(match_header("Die Ministerin sagte: nein").is_none());
        assert!(match_header("(Abg. Stoch SPD: Unglaublich!)").is_none());
        assert!(match_header("Minister Hermann hat gesagt: nein").is_none());
    }

    #[test]
    fn test_find_interjection() {
        let found = find_interjection("Das ist falsch. (Zuruf von der AfD) [3]").unwrap();
        assert_eq!(found.text, "Zuruf von der AfD");
        assert_eq!(found.before, "Das ist falsch.");
        assert_eq!(found.char_start, 17);
        assert!(find_interjection("Das (war) richtig").is_none());
        assert!(find_interjection("()").is_none());
    }

    #[test]
    fn test_speech_indices_are_contiguous() {
        let options = ParseOptions::default();
        let body = lines(&[
            "Vorspann ohne Redner",
            "Präsidentin Muhterem Aras: Ich eröffne die Sitzung.",
            "Abg. Andreas Stoch SPD: Vielen Dank.",
            "Weiterer Text.",
            "Minister für Finanzen Dr. Danyal Bayaz: Sehr geehrte Damen und Herren!",
        ]);
        let result = segment_speeches(&body, 0, &options);

        let indices: Vec<_> = result.speeches.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(result.preamble_lines, 1);
        assert_eq!(result.speeches[1].text, "Vielen Dank. Weiterer Text.");
        assert_eq!(result.speeches[2].speaker.role, "Minister für Finanzen");
        assert_eq!(result.speeches[2].speaker.normalized_name, "Danyal Bayaz");
        assert_eq!(result.speeches[2].speaker.raw_text, "Minister für Finanzen Dr. Danyal Bayaz");
    }

    #[test]
    fn test_interjection_offsets_index_raw_text() {
        let options = ParseOptions::default().with_offsets(true);
        let body = lines(&["Abg. Andreas Stoch SPD: Das war richtig", "(Beifall)", "und gut."]);
        let result = segment_speeches(&body, 0, &options);

        let speech = &result.speeches[0];
        let raw = speech.raw_text.as_deref().unwrap();
        assert_eq!(raw, "Das war richtig (Beifall) und gut.");
        assert_eq!(speech.text, "Das war richtig und gut.");
        assert_eq!(speech.annotations.len(), 1);
        assert_eq!(speech.annotations[0].text, "Beifall");
        assert_eq!(speech.annotations[0].category.as_deref(), Some("Beifall"));
        assert!(speech.annotations[0].position.is_none());

        let offset = &result.interjection_offsets[0];
        assert_eq!(offset.speech_index, 1);
        assert_eq!(offset.line_index, 1);
        let inner: String = raw
            .chars()
            .skip(offset.raw_start)
            .take(offset.raw_end - offset.raw_start)
            .collect();
        assert_eq!(inner, "Beifall");

        let line_offsets = speech.line_offsets.as_ref().unwrap();
        assert_eq!(line_offsets.len(), 3);
        assert_eq!(line_offsets[2].char_start, 26);
    }

    #[test]
    fn test_embedded_positions_when_not_compact() {
        let options = ParseOptions::default()
            .with_offsets(true)
            .with_externalized_offsets(false)
            .with_compact_interjections(false);
        let body = lines(&["Abg. Andreas Stoch SPD: Ja. (Heiterkeit)"]);
        let result = segment_speeches(&body, 0, &options);

        assert!(result.interjection_offsets.is_empty());
        let position = result.speeches[0].annotations[0].position.unwrap();
        assert_eq!(position.raw_start, 5);
        assert_eq!(position.raw_end, 15);
    }

    #[test]
    fn test_annotation_refs_increment() {
        let options = ParseOptions::default().with_categories(false);
        let body = lines(&["Abg. Andreas Stoch SPD: Erstens", "(Zuruf)", "zweitens", "(Unruhe)"]);
        let result = segment_speeches(&body, 0, &options);
        let refs: Vec<_> = result.speeches[0].annotations.iter().map(|a| a.annotation_ref).collect();
        assert_eq!(refs, vec![1, 2]);
        assert!(result.speeches[0].annotations[0].category.is_none());
        assert!(result.speeches[0].raw_text.is_none());
    }

    #[test]
    fn test_missing_party_option() {
        let body = lines(&["Abg. Andreas Stoch: Text."]);
        let lenient = segment_speeches(&body, 0, &ParseOptions::default());
        assert_eq!(lenient.speeches.len(), 1);
        assert_eq!(lenient.speeches[0].speaker.party, None);

        let strict = segment_speeches(&body, 0, &ParseOptions::default().require_party());
        assert!(strict.speeches.is_empty());
        assert_eq!(strict.preamble_lines, 1);
    }

    #[test]
    fn test_require_bold() {
        let mut body = lines(&["Abg. Andreas Stoch SPD: Text.", "Abg. Nico Weinmann FDP/DVP: Mehr."]);
        body[1].bold = true;
        let result = segment_speeches(&body, 0, &ParseOptions::default().require_bold());
        assert_eq!(result.speeches.len(), 1);
        assert_eq!(result.speeches[0].speaker.normalized_name, "Nico Weinmann");
    }

    #[test]
    fn test_inline_header_fallback() {
        let body = lines(&[
            "Abg. Andreas Stoch SPD: Das war es. (Beifall bei der SPD) Präsidentin Muhterem Aras: Danke.",
        ]);
        let result = segment_speeches(&body, 0, &ParseOptions::default());
        assert_eq!(result.speeches.len(), 2);
        assert_eq!(result.speeches[0].text, "Das war es.");
        assert_eq!(result.speeches[0].annotations[0].text, "Beifall bei der SPD");
        assert_eq!(result.speeches[1].speaker.role, "Präsidentin");
        assert_eq!(result.speeches[1].text, "Danke.");

        let disabled = segment_speeches(&body, 0, &ParseOptions::default().with_inline_headers(false));
        assert_eq!(disabled.speeches.len(), 1);
    }

    #[test]
    fn test_pages_and_start_offset() {
        let mut body = lines(&["Präsidentin Muhterem Aras: Text", "mehr", "Abg. Andreas Stoch SPD: x"]);
        body[1].page = 8;
        let result = segment_speeches(&body, 1, &ParseOptions::default());
        assert_eq!(result.preamble_lines, 1);
        assert_eq!(result.speeches.len(), 1);
        assert_eq!(result.speeches[0].start_page, 7);

        let result = segment_speeches(&body, 0, &ParseOptions::default());
        assert_eq!(result.speeches[0].start_page, 7);
        assert_eq!(result.speeches[0].end_page, 8);
    }
}
