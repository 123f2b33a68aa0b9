//! JSON rendering for parsed protocols.

use crate::error::{Error, Result};
use crate::model::Protocol;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a protocol to JSON.
pub fn to_json(protocol: &Protocol, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(protocol),
        JsonFormat::Compact => serde_json::to_string(protocol),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
