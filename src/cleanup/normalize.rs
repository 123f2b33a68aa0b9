//! Whitespace normalization and dehyphenation.
//!
//! Dehyphenation departs from a plain "drop every break hyphen" rule in two
//! places, both for German compounds and layout:
//!
//! - before an uppercase continuation the hyphen is kept, so "Bund-" +
//!   "Länder" stays "Bund-Länder";
//! - a blank line between the broken line and its continuation ends the
//!   break, and both lines are kept as they are.

use unicode_normalization::UnicodeNormalization;

use crate::model::Line;

const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Normalize a single line: NFC, ligatures, soft hyphens, whitespace.
///
/// Any run of whitespace collapses to one space; the result is trimmed.
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.nfc() {
        match c {
            '\u{00AD}' | '\u{FFFD}' => {}
            c => match LIGATURES.iter().find(|(l, _)| *l == c) {
                Some((_, replacement)) => result.push_str(replacement),
                None => result.push(c),
            },
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a line ends in a single word-break hyphen.
///
/// A double hyphen is a dash, and a hyphen standing alone after a space is
/// a bullet or a dash as well.
fn ends_with_break_hyphen(text: &str) -> bool {
    let Some(body) = text.strip_suffix('-') else {
        return false;
    };
    match body.chars().last() {
        Some(c) => c != '-' && !c.is_whitespace(),
        None => false,
    }
}

/// Join a hyphen-broken line with its continuation.
///
/// The hyphen is dropped, except before an uppercase continuation where it
/// belongs to a compound ("Bund-" + "Länder-Finanzausgleich").
fn join_broken(head: &str, tail: &str) -> String {
    let keep_hyphen = tail.chars().next().is_some_and(char::is_uppercase);
    if keep_hyphen {
        format!("{}{}", head, tail)
    } else {
        format!("{}{}", &head[..head.len() - 1], tail)
    }
}

/// Rejoin words broken across line boundaries.
///
/// Single left-to-right pass with one pending line. A blank line ends any
/// pending break; a hyphen at the very end of the sequence is kept.
pub fn dehyphenate(lines: &[String]) -> Vec<String> {
    let mut output = Vec::with_capacity(lines.len());
    let mut pending: Option<String> = None;

    for line in lines {
        let current = match pending.take() {
            Some(head) if !line.trim().is_empty() => join_broken(&head, line),
            Some(head) => {
                output.push(head);
                line.clone()
            }
            None => line.clone(),
        };

        if ends_with_break_hyphen(&current) {
            pending = Some(current);
        } else {
            output.push(current);
        }
    }

    output.extend(pending);
    output
}

/// Normalize and dehyphenate a line stream.
///
/// Merged lines keep the page and bold flag of their first half.
pub fn normalize_lines(lines: Vec<Line>) -> Vec<Line> {
    let mut output: Vec<Line> = Vec::with_capacity(lines.len());
    let mut pending: Option<Line> = None;

    for mut line in lines {
        line.text = normalize_text(&line.text);

        let current = match pending.take() {
            Some(mut head) if !line.text.is_empty() => {
                head.text = join_broken(&head.text, &line.text);
                head
            }
            Some(head) => {
                output.push(head);
                line
            }
            None => line,
        };

        if ends_with_break_hyphen(&current.text) {
            pending = Some(current);
        } else {
            output.push(current);
        }
    }

    output.extend(pending);
    output
}
