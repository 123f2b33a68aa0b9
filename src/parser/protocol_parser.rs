//! The protocol pipeline: layout, cleanup, structure, linking.

use rayon::prelude::*;

use crate::cleanup::{
    apply_page_offset, infer_page_offset, normalize_lines, normalize_text, BoilerplateStripper,
};
use crate::model::{Diagnostics, Line, PageDiagnostic, PageLines, Protocol};
use crate::structure::{
    extract_metadata, find_toc_block, link_agenda, parse_agenda_items, parse_partition,
    segment_speeches,
};

use super::layout::{LayoutAnalyzer, LayoutConfig};
use super::options::ParseOptions;
use super::source::PageSource;

/// Runs the full pipeline over a [`PageSource`].
///
/// Parsing never fails once a source exists; input-quality problems show up
/// as empty or missing fields in the returned [`Protocol`].
#[derive(Debug, Clone, Default)]
pub struct ProtocolParser {
    options: ParseOptions,
    layout: LayoutAnalyzer,
}

impl ProtocolParser {
    /// Create a parser with the given options and default layout thresholds.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            layout: LayoutAnalyzer::new(),
        }
    }

    /// Override the layout thresholds.
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = LayoutAnalyzer::with_config(config);
        self
    }

    /// The options this parser honors.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Reconstruct every page of `source` in reading order.
    pub fn reconstruct<S: PageSource + ?Sized>(&self, source: &S) -> Vec<PageLines> {
        let count = source.page_count();
        if self.options.parallel {
            (1..=count)
                .into_par_iter()
                .map(|page| self.layout.reconstruct_page(source, page))
                .collect()
        } else {
            (1..=count)
                .map(|page| self.layout.reconstruct_page(source, page))
                .collect()
        }
    }

    /// Parse a whole document.
    pub fn parse<S: PageSource + ?Sized>(&self, source: &S) -> Protocol {
        let options = &self.options;
        let reconstructed = self.reconstruct(source);

        let page_diagnostics: Vec<PageDiagnostic> = reconstructed
            .iter()
            .map(|p| PageDiagnostic {
                page: p.page,
                layout: p.kind,
                split_x: p.split_x,
                line_count: p.lines.len(),
            })
            .collect();

        // Metadata reads the cover page, including running headers.
        let session = extract_metadata(&metadata_text(&reconstructed));

        let pages: Vec<Vec<Line>> = reconstructed.into_iter().map(|p| p.lines).collect();
        let outcome = BoilerplateStripper::new(options.boilerplate).strip(pages);

        let mut lines = normalize_lines(outcome.pages.into_iter().flatten().collect());

        let page_offset = if options.printed_page_numbers {
            infer_page_offset(&outcome.page_numbers)
        } else {
            None
        };
        if let Some(offset) = page_offset {
            log::debug!("Printed page offset {}", offset);
            apply_page_offset(&mut lines, offset);
        }

        let toc = find_toc_block(&lines, options.toc_search_pages);
        let (mut agenda_items, partition, body_start, toc_lines) = match &toc {
            Some(block) => {
                let texts = || lines[block.lines.clone()].iter().map(|l| l.text.as_str());
                let partition = options.toc_partition.then(|| parse_partition(texts()));
                (parse_agenda_items(texts()), partition, block.lines.end, block.len())
            }
            None => {
                log::debug!("No contents block found; whole body is speech content");
                (Vec::new(), None, 0, 0)
            }
        };

        let segmentation = segment_speeches(&lines, body_start, options);
        link_agenda(&mut agenda_items, &segmentation.speeches);

        log::info!(
            "Parsed {} pages: {} agenda items, {} speeches, {} interjections",
            source.page_count(),
            agenda_items.len(),
            segmentation.speeches.len(),
            segmentation
                .speeches
                .iter()
                .map(|s| s.annotations.len())
                .sum::<usize>()
        );

        let diagnostics = options.include_debug.then(|| Diagnostics {
            pages: page_diagnostics,
            boilerplate: outcome.report,
            page_offset,
            toc_lines,
            preamble_lines: segmentation.preamble_lines,
        });

        Protocol {
            session,
            toc: partition,
            agenda_items,
            speeches: segmentation.speeches,
            interjection_offsets: segmentation.interjection_offsets,
            diagnostics,
        }
    }
}

fn metadata_text(pages: &[PageLines]) -> String {
    pages
        .iter()
        .flat_map(|p| p.lines.iter())
        .map(|l| normalize_text(&l.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{MemorySource, PageContent};

    fn sample() -> MemorySource {
        MemorySource::new(vec![
            PageContent::from_lines([
                "Landtag von Baden-Württemberg",
                "Plenarprotokoll 17 / 52",
                "52. Sitzung Stuttgart, Mittwoch, 14. Dezember 2022",
                "INHALT",
                "1. Aktuelle Debatte – Haushalt – beantragt von der Fraktion GRÜNE . . . 2",
            ]),
            PageContent::from_lines([
                "Beginn: 9:30 Uhr",
                "Präsidentin Muhterem Aras: Ich eröffne die Sitzung.",
                "Abg. Andreas Stoch SPD: Wir beraten den Haushalt",
                "(Beifall bei der SPD)",
                "und danken allen.",
            ]),
        ])
    }

    #[test]
    fn test_parse_sequential_matches_parallel() {
        let source = sample();
        let parallel = ProtocolParser::new(ParseOptions::default()).parse(&source);
        let sequential = ProtocolParser::new(ParseOptions::default().sequential()).parse(&source);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_parse_produces_speeches_and_metadata() {
        let protocol = ProtocolParser::new(ParseOptions::default()).parse(&sample());
        assert_eq!(protocol.session.number, Some(52));
        assert_eq!(protocol.speeches.len(), 2);
        assert_eq!(protocol.speeches[1].annotations.len(), 1);
        assert_eq!(protocol.agenda_items.len(), 1);
        assert!(protocol.diagnostics.is_none());
    }

    #[test]
    fn test_debug_diagnostics() {
        let options = ParseOptions::default().with_debug(true);
        let protocol = ProtocolParser::new(options).parse(&sample());
        let diagnostics = protocol.diagnostics.unwrap();
        assert_eq!(diagnostics.pages.len(), 2);
        assert!(diagnostics.toc_lines >= 1);
    }

    #[test]
    fn test_empty_source() {
        let protocol = ProtocolParser::default().parse(&MemorySource::default());
        assert!(protocol.speeches.is_empty());
        assert!(protocol.agenda_items.is_empty());
    }
}
