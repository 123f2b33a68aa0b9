//! Contents-block parsing through the public API.

use plenar::model::TocEntryKind;
use plenar::structure::{find_toc_block, parse_agenda_items, parse_partition};
use plenar::{parse_source, Line, MemorySource, PageContent, ParseOptions};

const CONTENTS: [&str; 6] = [
    "1. Eröffnung – Mitteilungen der Präsidentin . . . 12",
    "Präsidentin Muhterem Aras . . . 12",
    "2. Aktuelle Debatte – Wohnen – beantragt von der Fraktion der SPD . . . 13",
    "Abg. Andreas Stoch SPD . . . 13",
    "Abg. Nico Weinmann FDP/DVP . . . 13, 14",
    "Nächste Sitzung . . . 15",
];

/// Four physical pages printed as 11-14, page numbers at the page edges.
fn source() -> MemorySource {
    let mut cover = vec!["Plenarprotokoll 17 / 53", "INHALT"];
    cover.extend(CONTENTS);
    MemorySource::new(vec![
        PageContent::from_lines(cover),
        PageContent::from_lines([
            "12",
            "Präsidentin Muhterem Aras: Ich eröffne die Sitzung.",
            "Abg. Andreas Stoch SPD: Zur Geschäftsordnung.",
        ]),
        PageContent::from_lines([
            "13",
            "Abg. Andreas Stoch SPD: Wohnen ist teuer.",
            "(Beifall bei der SPD)",
        ]),
        PageContent::from_lines([
            "Abg. Nico Weinmann FDP/DVP: Bauen muss billiger werden.",
            "14",
        ]),
    ])
}

#[test]
fn test_agenda_tree_with_declared_speakers() {
    let items = parse_agenda_items(CONTENTS);
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].kind.as_deref(), Some("Eröffnung"));
    assert_eq!(items[0].title, "Mitteilungen der Präsidentin");
    assert_eq!(items[0].declared_speakers.len(), 1);
    assert_eq!(items[0].declared_speakers[0].name, "Muhterem Aras");

    let speakers: Vec<(&str, Option<&str>, Option<u32>)> = items[1]
        .declared_speakers
        .iter()
        .map(|s| (s.name.as_str(), s.party.as_deref(), s.page))
        .collect();
    assert_eq!(
        speakers,
        vec![
            ("Andreas Stoch", Some("SPD"), Some(13)),
            ("Nico Weinmann", Some("FDP/DVP"), Some(13)),
        ]
    );
}

#[test]
fn test_partition_buckets() {
    let partition = parse_partition(CONTENTS);
    assert_eq!(partition.agenda.len(), 2);
    assert_eq!(partition.speakers.len(), 3);
    assert_eq!(partition.other.len(), 1);
    assert_eq!(partition.len(), 6);
    assert!(partition
        .agenda
        .iter()
        .all(|e| e.kind == TocEntryKind::NumberedItem));
    assert_eq!(partition.speakers[2].pages, vec![13, 14]);
}

#[test]
fn test_pipeline_links_by_printed_page() {
    let protocol = parse_source(&source(), ParseOptions::default().with_debug(true));

    let pages: Vec<u32> = protocol.speeches.iter().map(|s| s.start_page).collect();
    assert_eq!(pages, vec![12, 12, 13, 14]);

    let items = &protocol.agenda_items;
    assert_eq!(items[0].linked_speech_indices, vec![1, 2]);
    assert_eq!(items[1].linked_speech_indices, vec![3, 4]);

    let diagnostics = protocol.diagnostics.unwrap();
    assert_eq!(diagnostics.page_offset, Some(10));
    assert_eq!(diagnostics.toc_lines, CONTENTS.len());
}

#[test]
fn test_partition_only_when_requested() {
    assert!(parse_source(&source(), ParseOptions::default()).toc.is_none());

    let options = ParseOptions::default().with_toc_partition(true);
    let toc = parse_source(&source(), options).toc.unwrap();
    assert_eq!(toc.agenda.len(), 2);
    assert_eq!(toc.speakers.len(), 3);
}

#[test]
fn test_contents_heading_outside_search_window() {
    let lines: Vec<Line> = [(1, "Titelblatt"), (2, "Vorwort"), (3, "INHALT"), (3, CONTENTS[0])]
        .iter()
        .map(|(page, text)| Line::new(*page, *text))
        .collect();
    assert!(find_toc_block(&lines, 2).is_none());

    let block = find_toc_block(&lines, 3).unwrap();
    assert_eq!(block.heading, 2);
    assert_eq!(block.lines, 3..4);
}

#[test]
fn test_contents_with_no_items() {
    let items = parse_agenda_items(["Abg. Andreas Stoch SPD . . . 13", "Anlage . . . 20"]);
    assert!(items.is_empty());
}

fn preamble_source(preamble: &[&'static str]) -> MemorySource {
    let mut body = preamble.to_vec();
    body.extend([
        "Präsidentin Muhterem Aras: Ich eröffne die Sitzung.",
        "Abg. Andreas Stoch SPD: Wir beraten den Haushalt.",
    ]);
    MemorySource::new(vec![
        PageContent::from_lines([
            "Plenarprotokoll 17 / 52",
            "INHALT",
            "1. Aktuelle Debatte – Haushalt – beantragt von der Fraktion GRÜNE . . . 2",
        ]),
        PageContent::from_lines(body),
    ])
}

#[test]
fn test_body_preamble_stays_out_of_agenda() {
    for preamble in [
        &["Beginn: 9:30 Uhr", "Protokollführer: Abg. Erika Beispiel"][..],
        &["Protokollführer: Abg. Erika Beispiel"][..],
    ] {
        let protocol = parse_source(&preamble_source(preamble), ParseOptions::default());
        let items = &protocol.agenda_items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Haushalt");
        assert_eq!(items[0].extra.as_deref(), Some("beantragt von der Fraktion GRÜNE"));
        assert_eq!(protocol.speeches.len(), 2);
    }
}
