//! Session-level metadata.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata of a plenary session.
///
/// Every field is optional; a protocol without any recognizable metadata
/// simply yields the default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Session number within the legislative period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    /// Legislative period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legislative_period: Option<u32>,

    /// Session date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Opening time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,

    /// Closing time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,

    /// Lunch break or other recess
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recess_interval: Option<TimeRange>,

    /// Where the session took place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl SessionMetadata {
    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A time window, serialized as `HH:MM:SS-HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeRange {
    /// Start of the window
    pub start: NaiveTime,
    /// End of the window
    pub end: NaiveTime,
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M:%S"),
            self.end.format("%H:%M:%S")
        )
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

impl TryFrom<String> for TimeRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (start, end) = value
            .split_once('-')
            .ok_or_else(|| format!("invalid time range: {}", value))?;
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s.trim(), "%H:%M:%S").map_err(|e| e.to_string())
        };
        Ok(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }
}
