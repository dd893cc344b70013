//! Splits raw CV text into named sections by recognising header lines.

use crate::analysis::patterns::bullet_marker;
use crate::analysis::sections::SectionKind;
use crate::models::document::{Document, Section};

/// Name of the section holding text that appears before any header.
pub const GENERIC_SECTION: &str = "content";

const MAX_HEADER_WORDS: usize = 5;
const MAX_HEADER_CHARS: usize = 40;

/// Characters that decorate headers ("## Skills", "**EXPERIENCE**", "== Education ==").
const HEADER_DECORATION: &[char] = &[':', '#', '*', '=', '-', '_', '|'];

/// A recognised header and any content written on the same line after a colon.
#[derive(Debug, PartialEq)]
struct Header<'a> {
    kind: SectionKind,
    inline: Option<&'a str>,
}

/// Builds a [`Document`] from plain text.
///
/// Text before the first header, or the whole text when no header is found,
/// lands in a [`GENERIC_SECTION`] section. A repeated header appends to the
/// section it first opened. Blank lines are dropped.
pub fn extract_sections(text: &str) -> Document {
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<usize> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(header) = detect_header(line) {
            let index = section_index(&mut sections, header.kind.as_str());
            if let Some(inline) = header.inline {
                sections[index].lines.push(inline.to_string());
            }
            current = Some(index);
            continue;
        }

        let index = match current {
            Some(index) => index,
            None => {
                let index = section_index(&mut sections, GENERIC_SECTION);
                current = Some(index);
                index
            }
        };
        sections[index].lines.push(line.to_string());
    }

    Document::new(sections)
}

fn section_index(sections: &mut Vec<Section>, name: &str) -> usize {
    if let Some(index) = sections.iter().position(|s| s.name == name) {
        return index;
    }
    sections.push(Section::new(name, Vec::<String>::new()));
    sections.len() - 1
}

fn detect_header(line: &str) -> Option<Header<'_>> {
    // "- Projects" is a list item; "- Projects -" is a decorated header.
    if let Some(marker) = bullet_marker(line) {
        let closed = line.len() > marker.len() && line.trim_end().ends_with(marker.as_str());
        if !closed {
            return None;
        }
    }

    let emphasized_by_markup = line.starts_with('#') || line.starts_with("**");

    let (head, inline) = match line.split_once(':') {
        Some((head, rest)) => {
            let rest = rest.trim();
            (head, (!rest.is_empty()).then_some(rest))
        }
        None => (line, None),
    };
    let has_colon = line.contains(':');

    let head = head.trim_matches(|c: char| HEADER_DECORATION.contains(&c) || c.is_whitespace());
    if head.is_empty()
        || head.chars().count() > MAX_HEADER_CHARS
        || head.split_whitespace().count() > MAX_HEADER_WORDS
    {
        return None;
    }

    let emphasized = emphasized_by_markup || has_colon || is_all_caps(head);
    let kind = SectionKind::from_header(head, emphasized)?;

    Some(Header { kind, inline })
}

fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}
