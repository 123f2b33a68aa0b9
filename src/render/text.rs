//! Plain-text transcript rendering.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::{AgendaItem, Protocol, Speaker, Speech};

/// Options for the plain-text transcript.
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Print the agenda before the speeches
    pub include_agenda: bool,
    /// Print interjections on their own indented lines after each speech
    pub include_interjections: bool,
    /// Use reflowed paragraphs when a speech has them
    pub use_paragraphs: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            include_agenda: true,
            include_interjections: true,
            use_paragraphs: true,
        }
    }
}

/// Display form of a speaker: role, name and party.
pub fn speaker_line(speaker: &Speaker) -> String {
    let mut line = String::new();
    if !speaker.role.is_empty() {
        line.push_str(&speaker.role);
    }
    if !speaker.normalized_name.is_empty() {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&speaker.normalized_name);
    }
    if let Some(party) = &speaker.party {
        let _ = write!(line, " ({})", party);
    }
    line
}

fn agenda_line(item: &AgendaItem) -> String {
    let mut line = String::new();
    if let Some(number) = &item.number {
        let _ = write!(line, "{}. ", number);
    }
    if let Some(kind) = &item.kind {
        let _ = write!(line, "{} – ", kind);
    }
    line.push_str(&item.title);
    if let Some(page) = item.start_page {
        let _ = write!(line, " (S. {})", page);
    }
    line
}

fn render_speech(out: &mut String, speech: &Speech, options: &TextOptions) -> std::fmt::Result {
    let pages = if speech.start_page == speech.end_page {
        format!("S. {}", speech.start_page)
    } else {
        format!("S. {}-{}", speech.start_page, speech.end_page)
    };
    writeln!(out, "[{}] {} ({})", speech.index, speaker_line(&speech.speaker), pages)?;

    if options.use_paragraphs && !speech.paragraphs.is_empty() {
        for paragraph in &speech.paragraphs {
            writeln!(out, "{}", paragraph)?;
        }
    } else if !speech.text.is_empty() {
        writeln!(out, "{}", speech.text)?;
    }

    if options.include_interjections {
        for interjection in &speech.annotations {
            writeln!(out, "    ({})", interjection.text)?;
        }
    }
    writeln!(out)
}

fn write_transcript(out: &mut String, protocol: &Protocol, options: &TextOptions) -> std::fmt::Result {
    let session = &protocol.session;
    match (session.legislative_period, session.number) {
        (Some(period), Some(number)) => writeln!(out, "Plenarprotokoll {}/{}", period, number)?,
        (None, Some(number)) => writeln!(out, "Sitzung {}", number)?,
        _ => writeln!(out, "Plenarprotokoll")?,
    }
    if let Some(date) = session.date {
        writeln!(out, "Datum: {}", date.format("%d.%m.%Y"))?;
    }
    if let Some(location) = &session.location {
        writeln!(out, "Ort: {}", location)?;
    }
    if let Some(start) = session.start_time {
        writeln!(out, "Beginn: {} Uhr", start.format("%H:%M"))?;
    }
    if let Some(recess) = session.recess_interval {
        writeln!(
            out,
            "Unterbrechung: {} bis {} Uhr",
            recess.start.format("%H:%M"),
            recess.end.format("%H:%M")
        )?;
    }
    if let Some(end) = session.end_time {
        writeln!(out, "Schluss: {} Uhr", end.format("%H:%M"))?;
    }
    writeln!(out)?;

    if options.include_agenda && !protocol.agenda_items.is_empty() {
        writeln!(out, "TAGESORDNUNG")?;
        for item in &protocol.agenda_items {
            writeln!(out, "{}", agenda_line(item))?;
        }
        writeln!(out)?;
    }

    for speech in &protocol.speeches {
        render_speech(out, speech, options)?;
    }
    Ok(())
}

/// Render a protocol as a readable transcript.
pub fn to_text(protocol: &Protocol, options: &TextOptions) -> Result<String> {
    let mut out = String::new();
    write_transcript(&mut out, protocol, options)
        .map_err(|e| Error::Render(format!("Text rendering error: {}", e)))?;
    Ok(out.trim_end().to_string())
}
