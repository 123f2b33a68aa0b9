//! Table-of-contents parsing.
//!
//! The contents block starts at an "INHALT" heading near the top of the
//! document. Its physical lines are first turned into logical entries (dot
//! leaders and page references split off, wrapped lines merged, lines with
//! several page blocks split), which are then either classified one by one
//! or folded into a tree of agenda items.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::metadata::is_session_opening;
use super::patterns::{self, AGENDA_KEYWORDS, AGENDA_OPENERS, SUBENTRY_OPENERS};
use super::speaker::parse_label;
use super::speech::is_speaker_header;
use crate::model::{
    AgendaItem, DeclaredSpeaker, Line, SubEntry, TocEntry, TocEntryKind, TocPartition,
};

/// Safety bound on the number of lines collected after the heading.
pub const MAX_TOC_LINES: usize = 140;

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}[a-z]?)\.\s+(\S.*)$").unwrap());

static NUMBERED_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}[a-z]?)\.\s*(\S.*)$").unwrap());

static ORDINAL_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,3}[a-z]?\.$").unwrap());

static INLINE_PAGE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\.\s*){2,}\s*\d{1,5}(?:\s*,\s*\d{1,5})*").unwrap());

static LEADER_PAGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:\.\s*){2,}(\d{1,5}(?:\s*,\s*\d{1,5})*)\s*$").unwrap());

static BARE_PAGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*\S)\s+(\d{2,5}(?:\s*,\s*\d{2,5})*)\s*$").unwrap());

static TRAILING_LEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:\.\s*){4,}$").unwrap());

static PAGES_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,5}(?:\s*,\s*\d{1,5})*$").unwrap());

static DASH_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s[–—-]\s").unwrap());

/// Words after which a bare trailing number is not a page reference.
const NUMBER_PREFIXES: &[&str] = &["Nr.", "Artikel", "Art.", "§", "Drucksache", "Drs.", "Ziffer"];

/// A logical contents entry before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalEntry {
    /// Text without dot leaders and page references
    pub text: String,
    /// Page references in printed order
    pub pages: Vec<u32>,
}

/// Location of the contents block in the line stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocBlock {
    /// Index of the heading line
    pub heading: usize,
    /// Lines of the block, excluding the heading
    pub lines: Range<usize>,
}

impl TocBlock {
    /// Number of lines in the block.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the block has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Whether a line is the contents heading ("INHALT", possibly letter-spaced).
pub fn is_toc_heading(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.trim_end_matches(':').to_uppercase();
    compact == "INHALT" || compact == "INHALTSVERZEICHNIS"
}

/// Whether a contents line carries page references.
fn has_page_refs(text: &str) -> bool {
    split_page_blocks(text)
        .into_iter()
        .any(|piece| PAGES_ONLY.is_match(piece) || !split_pages(piece).1.is_empty())
}

/// Whether the page starting at `from` still holds contents lines.
fn page_continues_contents(lines: &[Line], from: usize) -> bool {
    let page = lines[from].page;
    lines[from..]
        .iter()
        .take_while(|l| l.page == page && !is_speaker_header(l.text.trim()))
        .any(|l| has_page_refs(l.text.trim()))
}

/// Locate the contents block within the first `search_pages` pages.
///
/// The block ends after two consecutive blank lines, at the first speaker
/// header or session-opening line of the body, at a page break once page
/// references have been seen and the next page carries none, or after
/// [`MAX_TOC_LINES`] lines.
pub fn find_toc_block(lines: &[Line], search_pages: u32) -> Option<TocBlock> {
    let mut pages_seen: Vec<u32> = Vec::new();
    let mut heading = None;

    for (i, line) in lines.iter().enumerate() {
        if !pages_seen.contains(&line.page) {
            if pages_seen.len() as u32 >= search_pages {
                break;
            }
            pages_seen.push(line.page);
        }
        if is_toc_heading(&line.text) {
            heading = Some(i);
            break;
        }
    }

    let heading = heading?;
    let start = heading + 1;
    let mut end = start;
    let mut blanks = 0;
    let mut referenced = false;

    while end < lines.len() && end - start < MAX_TOC_LINES {
        if referenced
            && lines[end].page != lines[end - 1].page
            && !page_continues_contents(lines, end)
        {
            break;
        }
        let text = lines[end].text.trim();
        if text.is_empty() {
            blanks += 1;
            if blanks >= 2 {
                break;
            }
        } else {
            blanks = 0;
            if is_speaker_header(text) || is_session_opening(text) {
                break;
            }
            referenced |= has_page_refs(text);
        }
        end += 1;
    }

    log::debug!("Contents block: heading at line {}, {} lines", heading, end - start);

    Some(TocBlock {
        heading,
        lines: start..end,
    })
}

fn parse_pages(text: &str) -> Vec<u32> {
    text.split(',')
        .filter_map(|p| p.trim().parse().ok())
        .collect()
}

fn bare_number_allowed(body: &str) -> bool {
    if body.ends_with('/') {
        return false;
    }
    let last = body.split_whitespace().last().unwrap_or("");
    patterns::month_number(last).is_none() && !NUMBER_PREFIXES.contains(&last)
}

/// Split trailing page references (and any dot leader) from a piece of text.
pub fn split_pages(text: &str) -> (String, Vec<u32>) {
    let text = text.trim();

    if let Some(caps) = LEADER_PAGES.captures(text) {
        if let Some(m) = caps.get(0) {
            return (text[..m.start()].trim().to_string(), parse_pages(&caps[1]));
        }
    }

    if let Some(caps) = BARE_PAGES.captures(text) {
        if bare_number_allowed(&caps[1]) {
            return (caps[1].trim().to_string(), parse_pages(&caps[2]));
        }
    }

    let body = TRAILING_LEADER.replace(text, "");
    (body.trim().to_string(), Vec::new())
}

/// Split a physical line at every "dot leader + page numbers" block.
fn split_page_blocks(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in INLINE_PAGE_BLOCK.find_iter(line) {
        pieces.push(&line[last..m.end()]);
        last = m.end();
    }
    if last < line.len() {
        pieces.push(&line[last..]);
    }
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Whether a piece of text opens a new contents entry.
fn is_entry_start(text: &str) -> bool {
    NUMBERED.is_match(text)
        || ORDINAL_ONLY.is_match(text)
        || patterns::role_prefix_len(text).is_some()
        || patterns::starts_with_keyword(text, AGENDA_OPENERS)
        || patterns::starts_with_keyword(text, SUBENTRY_OPENERS)
}

/// Whether a piece of text continues the previous one.
fn is_continuation(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_lowercase() || matches!(c, '–' | '—' | '-' | '('))
}

/// Turn the physical lines of a contents block into logical entries.
pub fn logical_entries<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<LogicalEntry> {
    let mut entries = Vec::new();
    let mut current: Option<LogicalEntry> = None;

    for line in lines {
        for piece in split_page_blocks(line.trim()) {
            if PAGES_ONLY.is_match(piece) {
                // Page list wrapped onto its own line.
                if let Some(entry) = current.as_mut() {
                    entry.pages.extend(parse_pages(piece));
                }
                continue;
            }

            let (body, pages) = split_pages(piece);
            if !body.chars().any(char::is_alphanumeric) {
                if let Some(entry) = current.as_mut() {
                    entry.pages.extend(pages);
                }
                continue;
            }

            if let Some(entry) = current.as_mut() {
                let open = entry.pages.is_empty();
                let merge = is_continuation(&body)
                    || ORDINAL_ONLY.is_match(&entry.text)
                    || (open && !is_entry_start(&body));
                if open && merge {
                    entry.text.push(' ');
                    entry.text.push_str(&body);
                    entry.pages = pages;
                    continue;
                }
            }

            entries.extend(current.take());
            current = Some(LogicalEntry { text: body, pages });
        }
    }

    entries.extend(current);
    entries
}

/// Split an agenda header into kind, title and leftover text at dash separators.
///
/// One part is a bare title; two parts are kind and title; anything after
/// the title is kept as extra text.
pub fn split_header(text: &str) -> (Option<String>, String, Option<String>) {
    let parts: Vec<&str> = DASH_SEPARATOR
        .split(text.trim())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [] => (None, String::new(), None),
        [title] => (None, title.to_string(), None),
        [kind, title] => (Some(kind.to_string()), title.to_string(), None),
        [kind, title, rest @ ..] => (
            Some(kind.to_string()),
            title.to_string(),
            Some(rest.join(" – ")),
        ),
    }
}

fn agenda_entry(kind: TocEntryKind, number: Option<String>, body: &str, entry: &LogicalEntry) -> TocEntry {
    let (item_kind, title, extra) = split_header(&patterns::strip_drucksache(body));
    TocEntry {
        kind,
        text: entry.text.clone(),
        number,
        item_kind,
        title: Some(title),
        extra,
        speaker: None,
        pages: entry.pages.clone(),
    }
}

/// Classify a single logical entry.
pub fn classify_entry(entry: &LogicalEntry) -> TocEntry {
    let has_pages = !entry.pages.is_empty();
    let text = entry.text.as_str();

    if has_pages {
        if let Some(caps) = NUMBERED.captures(text) {
            return agenda_entry(
                TocEntryKind::NumberedItem,
                Some(caps[1].to_string()),
                &caps[2],
                entry,
            );
        }

        if patterns::starts_with_keyword(text, AGENDA_OPENERS) {
            return agenda_entry(TocEntryKind::UnnumberedItem, None, text, entry);
        }

        if let Some(label) = parse_label(text) {
            return TocEntry {
                kind: TocEntryKind::Speaker,
                text: entry.text.clone(),
                number: None,
                item_kind: None,
                title: None,
                extra: None,
                speaker: Some(DeclaredSpeaker {
                    role: label.role,
                    name: label.name,
                    party: label.party,
                    page: entry.pages.first().copied(),
                }),
                pages: entry.pages.clone(),
            };
        }

        if AGENDA_KEYWORDS.iter().any(|k| text.contains(k)) {
            return match NUMBERED_LOOSE.captures(text) {
                Some(caps) => agenda_entry(
                    TocEntryKind::NumberedItem,
                    Some(caps[1].to_string()),
                    &caps[2],
                    entry,
                ),
                None => agenda_entry(TocEntryKind::UnnumberedItem, None, text, entry),
            };
        }
    }

    TocEntry {
        kind: TocEntryKind::Other,
        text: entry.text.clone(),
        number: None,
        item_kind: None,
        title: None,
        extra: None,
        speaker: None,
        pages: entry.pages.clone(),
    }
}

/// Classify every logical entry of a contents block.
pub fn parse_entries<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<TocEntry> {
    logical_entries(lines).iter().map(classify_entry).collect()
}

/// Classify a contents block and partition the entries.
pub fn parse_partition<'a>(lines: impl IntoIterator<Item = &'a str>) -> TocPartition {
    TocPartition::from_entries(parse_entries(lines))
}

/// An agenda item under construction.
struct ItemBuilder {
    item: AgendaItem,
    /// Header text while it may still grow
    header: Option<String>,
}

impl ItemBuilder {
    fn new(number: Option<String>, header: &str, pages: &[u32]) -> Self {
        let mut builder = Self {
            item: AgendaItem {
                number,
                ..Default::default()
            },
            header: Some(header.to_string()),
        };
        builder.note_pages(pages);
        // A page reference closes the entry, so the header is complete.
        if !pages.is_empty() {
            builder.finish_header();
        }
        builder
    }

    fn note_pages(&mut self, pages: &[u32]) {
        if self.item.start_page.is_none() {
            self.item.start_page = pages.first().copied();
        }
    }

    fn extend_header(&mut self, text: &str) {
        if let Some(header) = self.header.as_mut() {
            header.push(' ');
            header.push_str(text);
        }
    }

    fn finish_header(&mut self) {
        let Some(header) = self.header.take() else {
            return;
        };
        self.item.drucksache_refs = patterns::drucksache_refs(&header);
        let (kind, title, extra) = split_header(&patterns::strip_drucksache(&header));
        self.item.kind = kind;
        self.item.title = title;

        let pushed = self.item.extra.take();
        self.item.extra = extra;
        if let Some(pushed) = pushed {
            self.item.push_extra(&pushed);
        }
    }

    fn finish(mut self) -> AgendaItem {
        self.finish_header();
        self.item
    }
}

/// Fold state: finished items plus the one open item.
#[derive(Default)]
struct AgendaFold {
    items: Vec<AgendaItem>,
    open: Option<ItemBuilder>,
}

impl AgendaFold {
    fn open(&mut self, builder: ItemBuilder) {
        self.close();
        self.open = Some(builder);
    }

    fn close(&mut self) {
        if let Some(builder) = self.open.take() {
            self.items.push(builder.finish());
        }
    }

    fn step(&mut self, entry: &LogicalEntry) {
        let text = entry.text.as_str();

        if let Some(caps) = NUMBERED.captures(text) {
            self.open(ItemBuilder::new(Some(caps[1].to_string()), &caps[2], &entry.pages));
            return;
        }

        if let Some(label) = parse_label(text) {
            match self.open.as_mut() {
                Some(builder) => {
                    builder.finish_header();
                    builder.note_pages(&entry.pages);
                    builder.item.declared_speakers.push(DeclaredSpeaker {
                        role: label.role,
                        name: label.name,
                        party: label.party,
                        page: entry.pages.first().copied(),
                    });
                }
                None => log::debug!("Speaker entry before any agenda item: {}", text),
            }
            return;
        }

        let refs = patterns::drucksache_refs(text);
        let subentry_keyword = patterns::starts_with_keyword(text, SUBENTRY_OPENERS);

        if let Some(builder) = self.open.as_mut() {
            let in_header = builder.header.is_some();
            if subentry_keyword || (!refs.is_empty() && !in_header) {
                builder.finish_header();
                builder.note_pages(&entry.pages);
                builder.item.subentries.push(SubEntry {
                    text: patterns::strip_drucksache(text),
                    drucksache_refs: refs,
                });
                return;
            }
        }

        if patterns::starts_with_keyword(text, AGENDA_OPENERS) {
            self.open(ItemBuilder::new(None, text, &entry.pages));
            return;
        }

        match self.open.as_mut() {
            Some(builder) if builder.header.is_some() => {
                builder.extend_header(text);
                builder.note_pages(&entry.pages);
                if !entry.pages.is_empty() {
                    builder.finish_header();
                }
            }
            Some(builder) => {
                builder.item.push_extra(text);
                builder.note_pages(&entry.pages);
            }
            None => log::debug!("Contents line before any agenda item: {}", text),
        }
    }
}

/// Build the agenda item tree from a contents block.
pub fn parse_agenda_items<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<AgendaItem> {
    let mut fold = AgendaFold::default();
    for entry in logical_entries(lines) {
        fold.step(&entry);
    }
    fold.close();
    fold.items
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERED_LINE: &str = "1. Aktuelle Debatte – Schleichender Verlust ... – beantragt von der Fraktion der AfD . . . 7639";

    #[test]
    fn test_numbered_item_rich_parse() {
        let items = parse_agenda_items([NUMBERED_LINE]);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.number.as_deref(), Some("1"));
        assert_eq!(item.kind.as_deref(), Some("Aktuelle Debatte"));
        assert_eq!(item.title, "Schleichender Verlust ...");
        assert_eq!(item.extra.as_deref(), Some("beantragt von der Fraktion der AfD"));
        assert_eq!(item.start_page, Some(7639));
    }

    #[test]
    fn test_numbered_item_classified() {
        let entries = parse_entries([NUMBERED_LINE]);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.kind, TocEntryKind::NumberedItem);
        assert_eq!(entry.number.as_deref(), Some("1"));
        assert_eq!(entry.item_kind.as_deref(), Some("Aktuelle Debatte"));
        assert_eq!(entry.title.as_deref(), Some("Schleichender Verlust ..."));
        assert_eq!(entry.page(), Some(7639));
        assert!(!entry.text.contains("7639"));
    }

    #[test]
    fn test_split_pages() {
        assert_eq!(
            split_pages("Abg. Stoch SPD . . . . 7640, 7652"),
            ("Abg. Stoch SPD".to_string(), vec![7640, 7652])
        );
        assert_eq!(split_pages("Mitteilungen 7639"), ("Mitteilungen".to_string(), vec![7639]));
        assert_eq!(split_pages("am 5. Oktober 2022"), ("am 5. Oktober 2022".to_string(), vec![]));
        assert_eq!(
            split_pages("Gesetzentwurf – Drucksache 17/8819"),
            ("Gesetzentwurf – Drucksache 17/8819".to_string(), vec![])
        );
        assert_eq!(split_pages("Verlust ..."), ("Verlust ...".to_string(), vec![]));
    }

    #[test]
    fn test_wrapped_lines_merge() {
        let entries = logical_entries([
            "2. Zweite Beratung des Gesetzentwurfs der Landesregierung",
            "– Gesetz zur Änderung des Landeswahlgesetzes . . . 7645",
            "Abg. Dr. Albrecht Schütte CDU . . . 7645,",
            "7660",
        ]);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].text.ends_with("Landeswahlgesetzes"));
        assert_eq!(entries[0].pages, vec![7645]);
        assert_eq!(entries[1].pages, vec![7645, 7660]);
    }

    #[test]
    fn test_uppercase_wrap_without_pages_merges() {
        let entries = logical_entries([
            "3. Aktuelle Debatte – Verlässliche",
            "Finanzierung der Kommunen . . . 7650",
        ]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "3. Aktuelle Debatte – Verlässliche Finanzierung der Kommunen");
    }

    #[test]
    fn test_multiple_page_blocks_split() {
        let entries = logical_entries(["Abg. Andreas Stoch SPD . . . 7640 Abg. Nico Weinmann FDP/DVP . . . 7642"]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Abg. Andreas Stoch SPD");
        assert_eq!(entries[1].pages, vec![7642]);
    }

    #[test]
    fn test_classification_priority() {
        let entries = parse_entries([
            "Eröffnung – Mitteilungen der Präsidentin . . . 7639",
            "Präsidentin Muhterem Aras . . . 7639",
            "Abg. Anton Baron AFD . . . 7640",
            "Gesetzentwurf über die Feuerwehr . . . 7641",
            "Sonstige Bemerkung",
        ]);
        let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TocEntryKind::UnnumberedItem,
                TocEntryKind::Speaker,
                TocEntryKind::Speaker,
                TocEntryKind::UnnumberedItem,
                TocEntryKind::Other,
            ]
        );
        assert_eq!(entries[0].item_kind.as_deref(), Some("Eröffnung"));
        assert_eq!(entries[0].title.as_deref(), Some("Mitteilungen der Präsidentin"));
        let speaker = entries[2].speaker.as_ref().unwrap();
        assert_eq!(speaker.name, "Anton Baron");
        assert_eq!(speaker.party.as_deref(), Some("AfD"));
        assert_eq!(speaker.page, Some(7640));
    }

    #[test]
    fn test_rich_tree_with_subentries_and_speakers() {
        let items = parse_agenda_items([
            "2. Zweite Beratung des Gesetzentwurfs der Landesregierung – Gesetz über die Feuerwehr",
            "– Drucksache 17/2839",
            "Beschlussempfehlung und Bericht des Innenausschusses – Drucksache 17/3001 . . . 7645",
            "Abg. Thomas Blenke CDU . . . 7645",
            "Minister für Inneres Thomas Strobl . . . 7650",
            "Beschluss . . . 7655",
            "zugleich Anmerkung zur Abstimmung",
            "3. Fragestunde – Drucksache 17/3100 . . . 7656",
        ]);

        assert_eq!(items.len(), 2);
        let item = &items[0];
        assert_eq!(item.number.as_deref(), Some("2"));
        assert_eq!(item.kind.as_deref(), Some("Zweite Beratung des Gesetzentwurfs der Landesregierung"));
        assert_eq!(item.title, "Gesetz über die Feuerwehr");
        assert!(item.drucksache_refs.contains("17/2839"));
        assert_eq!(item.start_page, Some(7645));
        assert_eq!(item.subentries.len(), 2);
        assert!(item.subentries[0].drucksache_refs.contains("17/3001"));
        assert_eq!(item.subentries[1].text, "Beschluss");
        assert_eq!(item.extra.as_deref(), Some("zugleich Anmerkung zur Abstimmung"));
        assert_eq!(item.declared_speakers.len(), 2);
        assert_eq!(item.declared_speakers[1].role, "Minister für Inneres");
        assert_eq!(item.declared_speakers[1].name, "Thomas Strobl");

        let next = &items[1];
        assert_eq!(next.title, "Fragestunde");
        assert!(next.drucksache_refs.contains("17/3100"));
        assert_eq!(next.start_page, Some(7656));
    }

    #[test]
    fn test_unclassified_line_goes_to_extra() {
        let items = parse_agenda_items([
            "1. Eröffnung . . . 7639",
            "Abg. Andreas Stoch SPD . . . 7640",
            "Nachruf auf einen früheren Abgeordneten",
        ]);
        assert_eq!(items[0].title, "Eröffnung");
        assert_eq!(items[0].extra.as_deref(), Some("Nachruf auf einen früheren Abgeordneten"));
    }

    #[test]
    fn test_find_toc_block() {
        let lines = vec![
            Line::new(1, "Plenarprotokoll 17/52"),
            Line::new(1, "I N H A L T"),
            Line::new(1, "1. Eröffnung . . . 7639"),
            Line::new(1, "Abg. Andreas Stoch SPD . . . 7640"),
            Line::new(2, "Präsidentin Muhterem Aras: Die Sitzung ist eröffnet."),
            Line::new(2, "Text"),
        ];
        let block = find_toc_block(&lines, 3).unwrap();
        assert_eq!(block.heading, 1);
        assert_eq!(block.lines, 2..4);
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn test_find_toc_block_respects_search_pages() {
        let lines = vec![
            Line::new(1, "Titel"),
            Line::new(2, "Vorwort"),
            Line::new(3, "INHALT"),
            Line::new(3, "1. Eröffnung . . . 7639"),
        ];
        assert!(find_toc_block(&lines, 2).is_none());
        assert!(find_toc_block(&lines, 3).is_some());
    }

    #[test]
    fn test_find_toc_block_stops_at_blank_lines() {
        let lines: Vec<Line> = ["INHALT", "1. Eröffnung . . . 7639", "", "", "Rest"]
            .iter()
            .map(|t| Line::new(1, *t))
            .collect();
        let block = find_toc_block(&lines, 3).unwrap();
        assert_eq!(block.lines, 1..3);
    }

    #[test]
    fn test_find_toc_block_stops_at_page_without_references() {
        let lines = vec![
            Line::new(1, "INHALT"),
            Line::new(1, "1. Eröffnung . . . 2"),
            Line::new(2, "2. Aktuelle Debatte – Haushalt . . . 3"),
            Line::new(3, "Protokollführer: Abg. Erika Beispiel"),
            Line::new(3, "Die Sitzung wird vorbereitet"),
            Line::new(3, "Präsidentin Muhterem Aras: Ich eröffne die Sitzung."),
        ];
        let block = find_toc_block(&lines, 3).unwrap();
        assert_eq!(block.lines, 1..3);
    }

    #[test]
    fn test_find_toc_block_stops_at_session_opening() {
        let lines: Vec<Line> = ["INHALT", "1. Eröffnung", "Beginn: 9:30 Uhr", "Text"]
            .iter()
            .map(|t| Line::new(1, *t))
            .collect();
        let block = find_toc_block(&lines, 3).unwrap();
        assert_eq!(block.lines, 1..2);
    }

    #[test]
    fn test_header_closed_by_page_reference() {
        let items = parse_agenda_items([
            "1. Eröffnung . . . 2",
            "Drucksache 17/1234 . . . 2",
            "Hinweis der Verwaltung – Anlage",
        ]);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.kind, None);
        assert_eq!(item.title, "Eröffnung");
        assert_eq!(item.extra.as_deref(), Some("Hinweis der Verwaltung – Anlage"));
        assert!(item.drucksache_refs.is_empty());
        assert_eq!(item.subentries.len(), 1);
        assert!(item.subentries[0].drucksache_refs.contains("17/1234"));
    }

    #[test]
    fn test_split_header_variants() {
        assert_eq!(split_header("Fragestunde"), (None, "Fragestunde".to_string(), None));
        assert_eq!(
            split_header("a – b - c — d"),
            (Some("a".to_string()), "b".to_string(), Some("c – d".to_string()))
        );
    }
}
