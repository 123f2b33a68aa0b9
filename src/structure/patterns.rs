//! Vocabulary shared by the structural parsers.
//!
//! Role tokens, parties, month names, academic titles, agenda openers and
//! interjection categories. Everything here is compiled once per process.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

/// Role tokens that open a speaker label, longest alternatives first.
pub const ROLE_PATTERN: &str = r"(?:Abg\.|Abgeordnete[rn]?|Stellv\.\s*Präsident(?:in)?|Stv\.\s*Präsident(?:in)?|Vizepräsident(?:in)?|Alterspräsident(?:in)?|Ministerpräsident(?:in)?|Präsident(?:in)?|Staatsminister(?:in)?|Minister(?:in)?|Staatssekretär(?:in)?)";

/// Party tokens as printed, longest alternatives first.
pub const PARTY_PATTERN: &str = r"(?:BÜNDNIS 90/DIE GRÜNEN|B90/GRÜNE|FREIE WÄHLER|DIE LINKE|FDP/DVP|GRUENE|GRÜNE|Grüne|fraktionslos|LINKE|Linke|CDU|CSU|SPD|FDP|AfD|AFD|BSW|SSW)";

/// Canonical party names keyed by printed variant.
static PARTY_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("BÜNDNIS 90/DIE GRÜNEN", "GRÜNE"),
        ("B90/GRÜNE", "GRÜNE"),
        ("GRUENE", "GRÜNE"),
        ("GRÜNE", "GRÜNE"),
        ("Grüne", "GRÜNE"),
        ("AFD", "AfD"),
        ("AfD", "AfD"),
        ("DIE LINKE", "DIE LINKE"),
        ("LINKE", "DIE LINKE"),
        ("Linke", "DIE LINKE"),
        ("CDU", "CDU"),
        ("CSU", "CSU"),
        ("SPD", "SPD"),
        ("FDP", "FDP"),
        ("FDP/DVP", "FDP/DVP"),
        ("BSW", "BSW"),
        ("SSW", "SSW"),
        ("FREIE WÄHLER", "FREIE WÄHLER"),
        ("fraktionslos", "fraktionslos"),
    ])
});

static PARTY_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\(?{}\)?$", PARTY_PATTERN)).unwrap());

static ROLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({})(?:\s|$)", ROLE_PATTERN)).unwrap());

const MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Month names as a regex alternation.
pub static MONTH_PATTERN: LazyLock<String> =
    LazyLock::new(|| format!("(?:{}|Jänner|Maerz)", MONTHS.join("|")));

/// Academic titles stripped from names.
static ACADEMIC_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:Prof\.|Dr\.|h\.\s?c\.|Dipl\.-[A-Za-zä]+\.|Dr\.-Ing\.|Mag\.|PD)(?:\s|$)").unwrap()
});

/// Keywords that open an unnumbered agenda item.
pub const AGENDA_OPENERS: &[&str] = &[
    "Eröffnung",
    "Beschlussempfehlung",
    "Beschluss",
    "Erste Beratung",
    "Zweite Beratung",
    "Dritte Beratung",
    "Aktuelle Debatte",
    "Beratung",
    "Fortsetzung",
    "Schluss",
];

/// Keywords that suggest agenda content anywhere in a line.
pub const AGENDA_KEYWORDS: &[&str] = &[
    "Gesetzentwurf",
    "Antrag",
    "Beschlussempfehlung",
    "Bericht",
    "Aktuelle Debatte",
    "Fragestunde",
    "Regierungsbefragung",
    "Wahl",
    "Beratung",
];

/// Keywords that start a subentry of an agenda item.
pub const SUBENTRY_OPENERS: &[&str] = &["Beschlussempfehlung", "Beschluss", "Bericht"];

/// Interjection categories, tried in order of appearance in the text.
pub const INTERJECTION_CATEGORIES: &[&str] = &[
    "Beifall",
    "Zuruf",
    "Heiterkeit",
    "Lachen",
    "Widerspruch",
    "Unruhe",
    "Zustimmung",
    "Glocke",
    "Unterbrechung",
];

/// Category used when no keyword matches.
pub const DEFAULT_CATEGORY: &str = "Sonstiges";

/// Printed paper references, e.g. "Drucksache 17/8819" or "Drs. 17/1, 17/2".
pub static DRUCKSACHE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Drucksachen?|Drs\.)\s*\d{1,2}\s*/\s*\d{1,6}(?:\s*(?:,|und)\s*\d{1,2}\s*/\s*\d{1,6})*")
        .unwrap()
});

static DRUCKSACHE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s*/\s*(\d{1,6})").unwrap());

/// Map a printed party token to its canonical name.
pub fn normalize_party(token: &str) -> Option<String> {
    let token = token.trim().trim_start_matches('(').trim_end_matches(')').trim();
    PARTY_ALIASES.get(token).map(|p| p.to_string())
}

/// Check if a token is a party token.
pub fn is_party(token: &str) -> bool {
    PARTY_EXACT.is_match(token.trim())
}

/// Length of the role token at the start of `text`, if any.
pub fn role_prefix_len(text: &str) -> Option<usize> {
    ROLE_PREFIX
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.end())
}

/// Whether a role belongs to the presiding officers.
pub fn is_presiding_role(role: &str) -> bool {
    let role = role.to_lowercase();
    role.contains("präsident") && !role.starts_with("ministerpräsident")
}

/// Whether a role denotes a member of parliament.
pub fn is_member_role(role: &str) -> bool {
    role.starts_with("Abg")
}

/// Month number (1-12) of a German month name.
pub fn month_number(name: &str) -> Option<u32> {
    match name {
        "Jänner" => Some(1),
        "Maerz" => Some(3),
        _ => MONTHS.iter().position(|m| *m == name).map(|i| i as u32 + 1),
    }
}

/// Remove academic titles and collapse whitespace.
pub fn strip_titles(name: &str) -> String {
    let mut result = name.to_string();
    // Titles may be adjacent; repeat until stable.
    loop {
        let next = ACADEMIC_TITLE.replace_all(&result, " ").to_string();
        if next == result {
            break;
        }
        result = next;
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Category of an interjection: the earliest keyword in the text.
pub fn categorize(text: &str) -> &'static str {
    INTERJECTION_CATEGORIES
        .iter()
        .filter_map(|k| text.find(k).map(|pos| (pos, *k)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, k)| k)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Normalized "period/number" references found in `text`.
pub fn drucksache_refs(text: &str) -> BTreeSet<String> {
    DRUCKSACHE
        .find_iter(text)
        .flat_map(|m| {
            DRUCKSACHE_NUMBER
                .captures_iter(m.as_str())
                .map(|c| format!("{}/{}", &c[1], &c[2]))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Remove printed paper references and the separators they leave behind.
pub fn strip_drucksache(text: &str) -> String {
    let stripped = DRUCKSACHE.replace_all(text, "");
    let stripped = stripped.replace("()", " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c == '–' || c == '—' || c == '-' || c == ',' || c.is_whitespace())
        .to_string()
}

/// Whether a line starts with one of `keywords` as a whole word.
pub fn starts_with_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| {
        text.strip_prefix(k)
            .is_some_and(|rest| rest.chars().next().map_or(true, |c| !c.is_alphanumeric()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_aliases() {
        assert_eq!(normalize_party("GRUENE").as_deref(), Some("GRÜNE"));
        assert_eq!(normalize_party("AFD").as_deref(), Some("AfD"));
        assert_eq!(normalize_party("(SPD)").as_deref(), Some("SPD"));
        assert_eq!(normalize_party("BÜNDNIS 90/DIE GRÜNEN").as_deref(), Some("GRÜNE"));
        assert_eq!(normalize_party("Piraten"), None);
        assert!(is_party("FDP/DVP"));
        assert!(!is_party("Stoch"));
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("März"), Some(3));
        assert_eq!(month_number("Dezember"), Some(12));
        assert_eq!(month_number("Brumaire"), None);
    }

    #[test]
    fn test_strip_titles() {
        assert_eq!(strip_titles("Dr. Prof. Erik  Schweickert"), "Erik Schweickert");
        assert_eq!(strip_titles("Dr. h. c. Rudi Hoogvliet"), "Rudi Hoogvliet");
        assert_eq!(strip_titles("Sabine Wölfle"), "Sabine Wölfle");
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("Beifall bei der SPD"), "Beifall");
        assert_eq!(categorize("Zuruf von der AfD – Beifall"), "Zuruf");
        assert_eq!(categorize("Abg. Stoch SPD meldet sich"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_drucksache_refs() {
        let refs = drucksache_refs("Gesetzentwurf – Drucksache 17/8819 und Drs. 17/1, 17/22");
        let refs: Vec<_> = refs.into_iter().collect();
        assert_eq!(refs, vec!["17/1", "17/22", "17/8819"]);
    }

    #[test]
    fn test_strip_drucksache() {
        assert_eq!(
            strip_drucksache("Gesetzentwurf der Landesregierung – Drucksache 17/8819"),
            "Gesetzentwurf der Landesregierung"
        );
        assert_eq!(strip_drucksache("Antrag (Drs. 17/5) der Fraktion"), "Antrag der Fraktion");
    }

    #[test]
    fn test_roles() {
        assert_eq!(role_prefix_len("Abg. Stoch"), Some(4));
        assert_eq!(role_prefix_len("Stellv. Präsidentin Kurtz"), Some(20));
        assert!(role_prefix_len("Herr Stoch").is_none());
        assert!(role_prefix_len("Ministerium für Verkehr").is_none());
        assert!(is_presiding_role("Stellv. Präsident"));
        assert!(!is_presiding_role("Ministerpräsident"));
        assert!(is_member_role("Abg."));
    }

    #[test]
    fn test_starts_with_keyword() {
        assert!(starts_with_keyword("Beschlussempfehlung und Bericht", SUBENTRY_OPENERS));
        assert!(starts_with_keyword("Bericht des Ausschusses", SUBENTRY_OPENERS));
        assert!(!starts_with_keyword("Berichterstatter", SUBENTRY_OPENERS));
    }
}
