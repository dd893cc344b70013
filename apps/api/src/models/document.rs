use serde::{Deserialize, Serialize};

use crate::analysis::sections::SectionKind;
use crate::analysis::text::normalize;

/// A labelled block of résumé lines, e.g. "experience" or "skills".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonical kind derived from the free-text name.
    pub fn kind(&self) -> SectionKind {
        SectionKind::from_name(&self.name)
    }

    /// Non-blank lines, trimmed.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
    }

    pub fn has_content(&self) -> bool {
        self.content_lines().next().is_some()
    }

    pub fn text(&self) -> String {
        self.content_lines().collect::<Vec<_>>().join("\n")
    }

    pub fn word_count(&self) -> usize {
        self.content_lines()
            .map(|l| l.split_whitespace().count())
            .sum()
    }
}

/// An ordered résumé. Section order mirrors the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// True when at least one section carries non-blank text.
    pub fn has_content(&self) -> bool {
        self.sections.iter().any(Section::has_content)
    }

    /// All sections of a kind that carry content, in document order.
    pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(move |s| s.kind() == kind && s.has_content())
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections_of(kind).next().is_some()
    }

    /// Joined text of every section of `kind`, or `None` when the kind is absent.
    pub fn text_of(&self, kind: SectionKind) -> Option<String> {
        let parts: Vec<String> = self.sections_of(kind).map(Section::text).collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    /// Content lines of every section of `kind`.
    pub fn lines_of(&self, kind: SectionKind) -> Vec<&str> {
        self.sections_of(kind)
            .flat_map(Section::content_lines)
            .collect()
    }

    pub fn full_text(&self) -> String {
        self.sections
            .iter()
            .filter(|s| s.has_content())
            .map(Section::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lowercased, punctuation-free form of the whole document used for keyword search.
    pub fn normalized_text(&self) -> String {
        normalize(&self.full_text())
    }

    pub fn word_count(&self) -> usize {
        self.sections.iter().map(Section::word_count).sum()
    }
}
