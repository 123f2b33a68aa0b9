//! Speaker labels: "Abg. Dr. Erik Schweickert FDP/DVP",
//! "Minister für Finanzen Dr. Danyal Bayaz", "Präsidentin Muhterem Aras".

use std::sync::LazyLock;

use regex::Regex;

use super::patterns::{self, PARTY_PATTERN};

static TRAILING_PARTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"[\s,]+\(?({})\)?$", PARTY_PATTERN)).unwrap());

/// Lowercase words that may appear inside a name block.
const CONNECTIVES: &[&str] = &[
    "für", "und", "im", "des", "der", "die", "den", "von", "van", "de", "zu", "vom", "beim", "am",
    "in",
];

/// Name particles kept with a surname.
const PARTICLES: &[&str] = &["von", "van", "de", "zu", "der", "den", "vom"];

/// A parsed speaker label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLabel {
    /// Role including any department ("Minister für Finanzen")
    pub role: String,
    /// Name without academic titles
    pub name: String,
    /// Canonical party token
    pub party: Option<String>,
}

/// Parse a label that starts with a role token.
///
/// Returns `None` when there is no role token, no name, or the name block
/// reads like running text rather than a name.
pub fn parse_label(label: &str) -> Option<SpeakerLabel> {
    let label = label.trim();
    let role_len = patterns::role_prefix_len(label)?;
    let role = label[..role_len].split_whitespace().collect::<Vec<_>>().join(" ");
    let mut block = label[role_len..].trim();

    let mut party = None;
    if let Some(caps) = TRAILING_PARTY.captures(block) {
        party = patterns::normalize_party(&caps[1]);
        if let Some(m) = caps.get(0) {
            block = block[..m.start()].trim();
        }
    }

    if block.is_empty() || !plausible_name(block) {
        return None;
    }

    let stripped = patterns::strip_titles(block);
    let (role, name) = if stripped.starts_with("für ") || stripped.contains(" für ") || stripped.starts_with("im ") {
        split_department(&role, &stripped)
    } else {
        (role, stripped)
    };

    if name.is_empty() {
        return None;
    }

    Some(SpeakerLabel { role, name, party })
}

/// Every token is capitalized or a known connective.
pub fn plausible_name(block: &str) -> bool {
    block.split_whitespace().all(|token| {
        let token = token.trim_matches(|c: char| c == ',' || c == '(' || c == ')');
        token.is_empty()
            || token.chars().next().is_some_and(char::is_uppercase)
            || CONNECTIVES.contains(&token)
    })
}

/// Split "für Finanzen Danyal Bayaz" into department and name.
///
/// The name is the last two capitalized tokens plus any particles between
/// or directly before them.
fn split_department(role: &str, block: &str) -> (String, String) {
    let tokens: Vec<&str> = block.split_whitespace().collect();
    let mut start = tokens.len();
    let mut capitalized = 0;

    while start > 0 {
        let token = tokens[start - 1];
        let is_cap = token.chars().next().is_some_and(char::is_uppercase)
            && !token.ends_with(',');
        if capitalized < 2 && is_cap {
            capitalized += 1;
            start -= 1;
        } else if capitalized > 0 && PARTICLES.contains(&token) && capitalized < 2 {
            start -= 1;
        } else {
            break;
        }
    }

    let department = tokens[..start].join(" ");
    let name = tokens[start..].join(" ");
    let role = if department.is_empty() {
        role.to_string()
    } else {
        format!("{} {}", role, department)
    };
    (role, name)
}
