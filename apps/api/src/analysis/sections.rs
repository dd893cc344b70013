//! Canonical section kinds and the header vocabulary used to recognise them.

use serde::{Deserialize, Serialize};

use crate::analysis::text::{contains_phrase, normalize, starts_with_phrase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Achievements,
    Languages,
    References,
    Other,
}

/// Header phrases per kind, already normalised. Checked in this order.
const VOCABULARY: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Contact,
        &[
            "contact",
            "contact information",
            "contact details",
            "personal info",
            "personal information",
            "personal details",
        ],
    ),
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "career summary",
            "profile",
            "professional profile",
            "objective",
            "career objective",
            "about",
            "about me",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "employment",
            "employment history",
            "work history",
            "career history",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "academic background",
            "academics",
            "academic",
            "qualifications",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "core skills",
            "key skills",
            "competencies",
            "core competencies",
        ],
    ),
    (
        SectionKind::Projects,
        &["projects", "personal projects", "portfolio"],
    ),
    (
        SectionKind::Certifications,
        &["certifications", "certificates", "licenses"],
    ),
    (
        SectionKind::Achievements,
        &["achievements", "accomplishments", "awards", "honors", "honours"],
    ),
    (SectionKind::Languages, &["languages"]),
    (SectionKind::References, &["references", "referees"]),
];

/// Filler words allowed after a header phrase ("Awards and Honors").
const HEADER_CONNECTORS: &[&str] = &["and", "of", "my"];

impl SectionKind {
    /// The four sections an ATS expects to find.
    pub const STANDARD: [SectionKind; 4] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Contact => "contact",
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Achievements => "achievements",
            SectionKind::Languages => "languages",
            SectionKind::References => "references",
            SectionKind::Other => "other",
        }
    }

    /// Sections where achievements and metrics are expected.
    pub fn is_experience_like(self) -> bool {
        matches!(
            self,
            SectionKind::Experience | SectionKind::Projects | SectionKind::Achievements
        )
    }

    /// Word count below which a section reads as thin.
    pub fn min_words(self) -> usize {
        match self {
            SectionKind::Summary => 30,
            SectionKind::Experience => 50,
            _ => 10,
        }
    }

    /// Classifies a free-text section name. Any known phrase anywhere in the
    /// name counts, so "Relevant Work Experience" is experience.
    pub fn from_name(name: &str) -> SectionKind {
        let normalized = normalize(name);
        VOCABULARY
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|p| contains_phrase(&normalized, p)))
            .map(|(kind, _)| *kind)
            .unwrap_or(SectionKind::Other)
    }

    /// Recognises a header line. Stricter than [`SectionKind::from_name`]:
    /// the line must open with a known phrase and anything after it must be
    /// more header vocabulary, so "Experience with Python" is not a header
    /// while "Skills & Competencies" is. `emphasized` relaxes the tail check
    /// for lines that were all caps, colon-terminated or markdown headings.
    pub fn from_header(line: &str, emphasized: bool) -> Option<SectionKind> {
        let normalized = normalize(line);
        if normalized.is_empty() {
            return None;
        }

        let (kind, phrase) = VOCABULARY
            .iter()
            .flat_map(|(kind, phrases)| phrases.iter().map(move |p| (*kind, *p)))
            .filter(|(_, p)| starts_with_phrase(&normalized, p))
            .max_by_key(|(_, p)| p.len())?;

        let tail_is_vocabulary = normalized[phrase.len()..]
            .split_whitespace()
            .all(|word| HEADER_CONNECTORS.contains(&word) || is_vocabulary_word(word));

        (emphasized || tail_is_vocabulary).then_some(kind)
    }
}

fn is_vocabulary_word(word: &str) -> bool {
    VOCABULARY
        .iter()
        .flat_map(|(_, phrases)| phrases.iter())
        .any(|p| p.split(' ').any(|w| w == word))
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_common_headers() {
        assert_eq!(SectionKind::from_name("EXPERIENCE"), SectionKind::Experience);
        assert_eq!(SectionKind::from_name("Work History"), SectionKind::Experience);
        assert_eq!(SectionKind::from_name("Technical Skills"), SectionKind::Skills);
        assert_eq!(SectionKind::from_name("Profile"), SectionKind::Summary);
        assert_eq!(SectionKind::from_name("Awards"), SectionKind::Achievements);
        assert_eq!(SectionKind::from_name("Hobbies"), SectionKind::Other);
    }

    #[test]
    fn test_from_name_needs_whole_words() {
        assert_eq!(SectionKind::from_name("experienced"), SectionKind::Other);
    }

    #[test]
    fn test_from_header_accepts_vocabulary_tail() {
        assert_eq!(
            SectionKind::from_header("Skills & Competencies", false),
            Some(SectionKind::Skills)
        );
        assert_eq!(
            SectionKind::from_header("Awards and Honors", false),
            Some(SectionKind::Achievements)
        );
        assert_eq!(
            SectionKind::from_header("Professional Experience", false),
            Some(SectionKind::Experience)
        );
    }

    #[test]
    fn test_from_header_rejects_prose() {
        assert_eq!(SectionKind::from_header("Experience with Python", false), None);
        assert_eq!(SectionKind::from_header("Led projects", false), None);
        assert_eq!(SectionKind::from_header("", false), None);
    }

    #[test]
    fn test_from_header_emphasis_relaxes_tail() {
        assert_eq!(
            SectionKind::from_header("EXPERIENCE AT STARTUPS", true),
            Some(SectionKind::Experience)
        );
    }

    #[test]
    fn test_standard_sections() {
        assert_eq!(SectionKind::STANDARD.len(), 4);
        assert!(SectionKind::Projects.is_experience_like());
        assert!(!SectionKind::Skills.is_experience_like());
    }
}
