//! Rendering of parsed protocols.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{speaker_line, to_text, TextOptions};
