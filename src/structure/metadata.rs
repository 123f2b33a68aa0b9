//! Session metadata from the normalized full text.
//!
//! Each field is matched independently; a miss leaves the field empty and
//! never affects the others.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};

use super::patterns::{self, MONTH_PATTERN};
use crate::model::{SessionMetadata, TimeRange};

static PROTOCOL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Plenarprotokoll\s+(\d{1,2})\s*/\s*(\d{1,4})").unwrap());

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(\d{{1,2}})\.\s*({})\s+(\d{{4}})\b", *MONTH_PATTERN)).unwrap()
});

static START_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Beginn|Sitzung beginnt um)\s*:?\s*(\d{1,2})[.:](\d{2})(?:\s*Uhr)?").unwrap()
});

static SESSION_OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?(?:Beginn|Sitzung beginnt um)\s*:?\s*\d{1,2}[.:]\d{2}(?:\s*Uhr)?").unwrap()
});

static END_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Schluss|Schluß|Sitzung endet um)\s*:?\s*(\d{1,2})[.:](\d{2})(?:\s*Uhr)?").unwrap()
});

static RECESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:Mittagspause|Unterbrechung)(?:\s+der\s+Sitzung)?\s*:?\s*(?:von\s+)?(\d{1,2})[.:](\d{2})(?:\s*Uhr)?\s*(?:bis|-|–)\s*(\d{1,2})[.:](\d{2})",
    )
    .unwrap()
});

static LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Ort:\s*|Sitzung in\s+)([^\n,;()]{2,80})").unwrap());

fn time(caps: &Captures, hour: usize, minute: usize) -> Option<NaiveTime> {
    let h = caps.get(hour)?.as_str().parse().ok()?;
    let m = caps.get(minute)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(h, m, 0)
}

/// Session number and legislative period from "Plenarprotokoll P/N".
pub fn extract_protocol_number(text: &str) -> (Option<u32>, Option<u32>) {
    match PROTOCOL_MARKER.captures(text) {
        Some(caps) => (caps[2].parse().ok(), caps[1].parse().ok()),
        None => (None, None),
    }
}

/// Date from "D. <Monat> YYYY".
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    DATE.captures_iter(text).find_map(|caps| {
        let day = caps[1].parse().ok()?;
        let month = patterns::month_number(&caps[2])?;
        let year = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// First opening time.
pub fn extract_start_time(text: &str) -> Option<NaiveTime> {
    START_TIME.captures_iter(text).find_map(|c| time(&c, 1, 2))
}

/// Last closing time.
pub fn extract_end_time(text: &str) -> Option<NaiveTime> {
    END_TIME
        .captures_iter(text)
        .filter_map(|c| time(&c, 1, 2))
        .last()
}

/// Recess window from "Mittagspause/Unterbrechung von H:MM bis H:MM".
pub fn extract_recess(text: &str) -> Option<TimeRange> {
    RECESS.captures_iter(text).find_map(|c| {
        Some(TimeRange {
            start: time(&c, 1, 2)?,
            end: time(&c, 3, 4)?,
        })
    })
}

/// Location from "Ort:" or "Sitzung in".
pub fn extract_location(text: &str) -> Option<String> {
    LOCATION.captures_iter(text).find_map(|c| {
        let location = c[1].trim().trim_end_matches('.').trim();
        (!location.is_empty()).then(|| location.to_string())
    })
}

/// Extract every metadata field from the full text.
pub fn extract_metadata(text: &str) -> SessionMetadata {
    let (number, legislative_period) = extract_protocol_number(text);
    SessionMetadata {
        number,
        legislative_period,
        date: extract_date(text),
        start_time: extract_start_time(text),
        end_time: extract_end_time(text),
        recess_interval: extract_recess(text),
        location: extract_location(text),
    }
}

/// Whether a line opens the session body, e.g. "Beginn: 9:30 Uhr".
pub fn is_session_opening(text: &str) -> bool {
    SESSION_OPENING.is_match(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE_PAGE: &str = "Landtag von Baden-Württemberg\n\
        Plenarprotokoll 17/52\n\
        52. Sitzung\n\
        Stuttgart, Mittwoch, 5. Oktober 2022\n\
        Ort: Haus des Landtags\n\
        Beginn: 9:30 Uhr\n\
        Mittagspause von 12.45 Uhr bis 14:00 Uhr\n\
        Schluss: 16:22 Uhr";

    #[test]
    fn test_extract_all_fields() {
        let meta = extract_metadata(TITLE_PAGE);
        assert_eq!(meta.legislative_period, Some(17));
        assert_eq!(meta.number, Some(52));
        assert_eq!(meta.date, NaiveDate::from_ymd_opt(2022, 10, 5));
        assert_eq!(meta.start_time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(meta.end_time, NaiveTime::from_hms_opt(16, 22, 0));
        assert_eq!(
            meta.recess_interval.map(|r| r.to_string()).as_deref(),
            Some("12:45:00-14:00:00")
        );
        assert_eq!(meta.location.as_deref(), Some("Haus des Landtags"));
    }

    #[test]
    fn test_missing_fields_are_independent() {
        let meta = extract_metadata("Die Sitzung beginnt um 10.05 Uhr.\nSitzung in Stuttgart");
        assert_eq!(meta.start_time, NaiveTime::from_hms_opt(10, 5, 0));
        assert_eq!(meta.location.as_deref(), Some("Stuttgart"));
        assert!(meta.date.is_none());
        assert!(meta.number.is_none());
        assert!(meta.end_time.is_none());
    }

    #[test]
    fn test_invalid_values_are_absent() {
        let meta = extract_metadata("31. Februar 2022\nBeginn: 25:99 Uhr");
        assert!(meta.date.is_none());
        assert!(meta.start_time.is_none());
        assert!(extract_metadata("").is_empty());
    }

    #[test]
    fn test_end_time_takes_last_match() {
        let text = "Schluss: 12:00 Uhr\nweiter\nSitzung endet um 18.15 Uhr";
        assert_eq!(extract_end_time(text), NaiveTime::from_hms_opt(18, 15, 0));
    }
}
