//! Benchmarks for protocol parsing performance.
//!
//! Run with: cargo bench
//!
//! Documents are synthetic: a contents block followed by two-column speech
//! pages with page numbers, interjections and hyphenated line breaks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plenar::model::Word;
use plenar::{MemorySource, PageContent, ParseOptions, ProtocolParser};

const PARTIES: [&str; 5] = ["CDU", "GRÜNE", "SPD", "FDP/DVP", "AfD"];

fn column_words(words: &mut Vec<Word>, lines: &[String], x: f32, first_top: f32) {
    for (row, line) in lines.iter().enumerate() {
        let top = first_top + row as f32 * 12.0;
        let mut left = x;
        for token in line.split_whitespace() {
            let width = token.chars().count() as f32 * 5.0;
            words.push(Word::new(token, left, left + width, top));
            left += width + 3.0;
        }
    }
}

fn speech_lines(page: usize) -> Vec<String> {
    let party = PARTIES[page % PARTIES.len()];
    vec![
        format!("Abg. Max Mustermann{} {}: Meine Damen", page, party),
        "und Herren, wir beraten heute den Haus-".to_string(),
        "halt des Landes für das kommende Jahr.".to_string(),
        format!("(Beifall bei der {})", party),
        "Die Schulden steigen weiter an.".to_string(),
        "(Zuruf von der SPD: Stimmt nicht!)".to_string(),
        "Wir müssen sparen und investieren.".to_string(),
    ]
}

/// Creates a synthetic protocol with the given number of body pages.
fn create_test_source(page_count: usize) -> MemorySource {
    let mut cover = vec![
        "Plenarprotokoll 17 / 52".to_string(),
        "52. Sitzung Stuttgart, Mittwoch, 14. Dezember 2022".to_string(),
        "Beginn: 9:30 Uhr".to_string(),
        "INHALT".to_string(),
    ];
    for i in 0..page_count {
        cover.push(format!(
            "{}. Aktuelle Debatte – Thema {} – beantragt von der Fraktion der CDU . . . {}",
            i + 1,
            i + 1,
            7638 + i
        ));
    }
    let mut source = MemorySource::new(vec![PageContent::from_lines(
        cover.iter().map(String::as_str),
    )]);

    for i in 0..page_count {
        let mut words = Vec::new();
        column_words(&mut words, &[format!("{}", 7638 + i)], 50.0, 40.0);
        column_words(&mut words, &speech_lines(i), 50.0, 60.0);
        column_words(&mut words, &speech_lines(i + 1), 320.0, 60.0);
        source.push(PageContent::words(words));
    }
    source
}

/// Benchmark the full pipeline at various sizes.
fn bench_protocol_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("protocol_parsing");

    for page_count in [1, 10, 50].iter() {
        let source = create_test_source(*page_count);

        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            let parser = ProtocolParser::new(ParseOptions::default());
            b.iter(|| parser.parse(black_box(&source)));
        });

        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            let parser = ProtocolParser::new(ParseOptions::default().sequential());
            b.iter(|| parser.parse(black_box(&source)));
        });
    }

    group.finish();
}

/// Benchmark offset tracking and segment derivation overhead.
fn bench_offset_tracking(c: &mut Criterion) {
    let source = create_test_source(10);
    let options = ParseOptions::default()
        .with_offsets(true)
        .with_reflow(true)
        .with_segments(plenar::SegmentMode::All);
    let parser = ProtocolParser::new(options);

    c.bench_function("offsets_and_segments_10_pages", |b| {
        b.iter(|| parser.parse(black_box(&source)));
    });
}

/// Benchmark PDF magic detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = b"%PDF-1.7\n%test";
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| plenar::is_pdf_bytes(black_box(pdf_data)));
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| plenar::is_pdf_bytes(black_box(non_pdf_data)));
    });
}

criterion_group!(
    benches,
    bench_protocol_parsing,
    bench_offset_tracking,
    bench_format_detection,
);
criterion_main!(benches);
