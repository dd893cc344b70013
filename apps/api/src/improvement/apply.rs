//! Applies high-confidence improvements to a copy of the CV and renders it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::improvement::models::Improvement;
use crate::models::document::{Document, Section};

pub const NO_IMPROVEMENTS_APPLIED: &str = "No high-priority improvements applied";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedCv {
    pub document: Document,
    /// `SECTION-NAME` followed by its lines, one block per section.
    pub text: String,
    pub applied: Vec<Improvement>,
    pub summary: String,
}

/// Applies every improvement that passes [`Improvement::should_apply`].
///
/// An applied improvement replaces its `original_text` inside the target
/// section when both exist; advisory improvements with no anchor in the text
/// are still recorded as applied.
pub fn apply_improvements(document: &Document, improvements: &[Improvement]) -> EnhancedCv {
    let mut enhanced = document.clone();
    let mut applied = Vec::new();

    for improvement in improvements.iter().filter(|i| i.should_apply()) {
        if let Some(section) = target_section(&mut enhanced, &improvement.section) {
            let replaced = replace_in_section(section, &improvement.original_text, &improvement.improved_text);
            debug!(
                "Applied improvement to '{}' (text replaced: {replaced})",
                improvement.section
            );
        }
        applied.push(improvement.clone());
    }

    let summary = if applied.is_empty() {
        NO_IMPROVEMENTS_APPLIED.to_string()
    } else {
        let lines: Vec<String> = applied.iter().map(|i| format!("- {}", i.reasoning)).collect();
        format!("Applied improvements:\n{}", lines.join("\n"))
    };

    EnhancedCv {
        text: render(&enhanced),
        document: enhanced,
        applied,
        summary,
    }
}

/// Exact (case-insensitive) name first, then the first section of the same kind.
fn target_section<'a>(document: &'a mut Document, name: &str) -> Option<&'a mut Section> {
    let index = document
        .sections
        .iter()
        .position(|s| s.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            let kind = Section::new(name, Vec::<String>::new()).kind();
            document.sections.iter().position(|s| s.kind() == kind && s.has_content())
        })?;
    document.sections.get_mut(index)
}

fn replace_in_section(section: &mut Section, original: &str, improved: &str) -> bool {
    if original.trim().is_empty() {
        return false;
    }
    let text = section.lines.join("\n");
    if !text.contains(original) {
        return false;
    }
    section.lines = text
        .replacen(original, improved, 1)
        .split('\n')
        .map(str::to_string)
        .collect();
    true
}

/// Renders each section with content as an upper-cased header and its lines.
pub fn render(document: &Document) -> String {
    document
        .sections()
        .iter()
        .filter(|s| s.has_content())
        .map(|s| format!("{}\n{}\n", s.name.to_uppercase(), s.text()))
        .collect::<Vec<_>>()
        .join("\n")
}
