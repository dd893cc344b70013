//! Regex patterns and line-level detectors used by the scoring rules.

use std::sync::LazyLock;

use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!("invalid regex: ", stringify!($name))));
    };
}

// Ordered so that the most specific alternative wins at a given position.
pattern!(
    METRIC,
    r"(?i)[$€£]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:k|m|b|million|billion|thousand)\b)?|\d+(?:\.\d+)?\s?%|\b\d+(?:\.\d+)?\s?(?:x|k|m|b|million|billion|thousand)\b|\b\d+\+|\b\d+(?:[.,]\d+)?\b"
);
pattern!(
    YEAR_RANGE,
    r"(?i)\b((?:19|20)\d{2})\s*(?:-|–|—|to|until)\s*(?:[a-z]{3,9}\.?\s+)?((?:19|20)\d{2}|present|current|now|today)\b"
);
pattern!(
    DURATION,
    r"(?i)\b\d+\+?\s*(?:years?|yrs?|months?|mos?)\b"
);
pattern!(
    YEARS_OF_EXPERIENCE,
    r"(?i)\b(\d{1,2})\s*\+?\s*(?:-\s*\d{1,2}\s*)?(?:years?|yrs?)\b"
);
pattern!(
    EMAIL,
    r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b"
);
pattern!(
    PHONE,
    r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\b\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b"
);
pattern!(
    BULLET,
    r"^\s*([•·▪▫◦‣⁃●○■□➢➤►–*-]|\d{1,2}[.)])\s+"
);

/// Column-separator count from which a line reads as a table row.
const TABLE_PIPES: usize = 2;

/// Counts quantifiable metrics in `text`. Four-digit years are dates, not metrics.
pub fn count_metrics(text: &str) -> usize {
    METRIC
        .find_iter(text)
        .filter(|m| !is_year(m.as_str()))
        .count()
}

fn is_year(token: &str) -> bool {
    token.len() == 4
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token.starts_with("19") || token.starts_with("20"))
}

pub fn has_year_range(text: &str) -> bool {
    YEAR_RANGE.is_match(text)
}

pub fn has_duration(text: &str) -> bool {
    DURATION.is_match(text)
}

pub fn has_email(text: &str) -> bool {
    EMAIL.is_match(text)
}

pub fn has_phone(text: &str) -> bool {
    PHONE.is_match(text)
}

/// Largest "N years" figure stated in `text`.
pub fn stated_years(text: &str) -> Option<u32> {
    YEARS_OF_EXPERIENCE
        .captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .max()
}

/// First "N years" figure stated in `text`, as a job description phrases it.
pub fn first_stated_years(text: &str) -> Option<u32> {
    YEARS_OF_EXPERIENCE
        .captures(text)
        .and_then(|c| c.get(1)?.as_str().parse::<u32>().ok())
}

/// Span in whole years from the earliest start to the latest end of all year
/// ranges in `text`. Open ranges ("2021 - Present") end at `current_year`.
pub fn year_range_span(text: &str, current_year: i32) -> Option<u32> {
    let mut earliest: Option<i32> = None;
    let mut latest: Option<i32> = None;

    for caps in YEAR_RANGE.captures_iter(text) {
        let Some(start) = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok()) else {
            continue;
        };
        let end = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or(current_year);

        earliest = Some(earliest.map_or(start, |e| e.min(start)));
        latest = Some(latest.map_or(end, |l| l.max(end)));
    }

    match (earliest, latest) {
        (Some(start), Some(end)) if end >= start => Some((end - start) as u32),
        _ => None,
    }
}

/// The bullet marker opening `line`, with numbered markers folded to "1.".
pub fn bullet_marker(line: &str) -> Option<String> {
    let marker = BULLET.captures(line)?.get(1)?.as_str();
    if marker.starts_with(|c: char| c.is_ascii_digit()) {
        Some("1.".to_string())
    } else {
        Some(marker.to_string())
    }
}

/// Splits `line` into its bullet marker (with trailing space) and the body.
pub fn split_bullet(line: &str) -> (&str, &str) {
    match BULLET.find(line) {
        Some(m) => line.split_at(m.end()),
        None => ("", line),
    }
}

pub fn is_bullet(line: &str) -> bool {
    BULLET.is_match(line)
}

/// Table rows survive ATS parsing badly: pipe-separated or tab-aligned columns.
pub fn is_table_like(line: &str) -> bool {
    if line.matches('|').count() >= TABLE_PIPES {
        return true;
    }
    line.contains('\t') && line.split('\t').filter(|c| !c.trim().is_empty()).count() >= 2
}

/// Box drawing, block elements, emoji and private-use icon glyphs. Ordinary
/// bullet glyphs are fine.
pub fn has_non_text_glyphs(line: &str) -> bool {
    line.chars().any(|c| {
        matches!(c,
            '\u{2500}'..='\u{259F}'
            | '\u{2600}'..='\u{26FF}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{1F300}'..='\u{1FAFF}'
        ) || (matches!(c, '\u{2700}'..='\u{27BF}') && !matches!(c, '➢' | '➤'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_metrics_percent_currency_multiplier() {
        assert_eq!(count_metrics("Improved system performance by 40%"), 1);
        assert_eq!(count_metrics("Saved $1.2M annually"), 1);
        assert_eq!(count_metrics("Made builds 3x faster for 20+ teams"), 2);
    }

    #[test]
    fn test_count_metrics_skips_years() {
        assert_eq!(count_metrics("Acme Corp (2019 - 2021)"), 0);
        assert_eq!(count_metrics("Led a team of 3 developers since 2019"), 1);
    }

    #[test]
    fn test_count_metrics_none() {
        assert_eq!(count_metrics("Developed scalable web applications"), 0);
    }

    #[test]
    fn test_year_range_variants() {
        assert!(has_year_range("Senior Developer (2021-Present)"));
        assert!(has_year_range("Jan 2019 – Dec 2020"));
        assert!(has_year_range("2015 to 2018"));
        assert!(!has_year_range("Graduated 2019"));
    }

    #[test]
    fn test_duration_phrases() {
        assert!(has_duration("5+ years of experience"));
        assert!(has_duration("18 months contract"));
        assert!(!has_duration("Yearly planning"));
    }

    #[test]
    fn test_contact_detection() {
        assert!(has_email("Email: john.doe@example.com"));
        assert!(has_phone("Phone: (555) 123-4567"));
        assert!(has_phone("555.123.4567"));
        assert!(!has_phone("Call me maybe"));
    }

    #[test]
    fn test_stated_years_takes_max() {
        assert_eq!(stated_years("3 years Python, 7+ years Java"), Some(7));
        assert_eq!(stated_years("no numbers"), None);
        assert_eq!(first_stated_years("5+ years Rust, 7 years overall"), Some(5));
    }

    #[test]
    fn test_year_range_span_open_range_uses_current_year() {
        assert_eq!(year_range_span("2018 - 2020\n2021 - Present", 2025), Some(7));
        assert_eq!(year_range_span("2019 - 2021", 2025), Some(2));
        assert_eq!(year_range_span("no ranges", 2025), None);
    }

    #[test]
    fn test_bullet_marker_styles() {
        assert_eq!(bullet_marker("• Built things").as_deref(), Some("•"));
        assert_eq!(bullet_marker("- Built things").as_deref(), Some("-"));
        assert_eq!(bullet_marker("2. Built things").as_deref(), Some("1."));
        assert_eq!(bullet_marker("2019-2021 Acme"), None);
        assert_eq!(bullet_marker("Built things"), None);
    }

    #[test]
    fn test_split_bullet() {
        assert_eq!(split_bullet("- Built things"), ("- ", "Built things"));
        assert_eq!(split_bullet("3) Shipped"), ("3) ", "Shipped"));
        assert_eq!(split_bullet("Plain line"), ("", "Plain line"));
    }

    #[test]
    fn test_table_like_lines() {
        assert!(is_table_like("Skill | Level | Years"));
        assert!(is_table_like("Python\tExpert"));
        assert!(!is_table_like("Python, Rust | Go"));
    }

    #[test]
    fn test_non_text_glyphs() {
        assert!(has_non_text_glyphs("☎ 555 123 4567"));
        assert!(has_non_text_glyphs("┌──────┐"));
        assert!(has_non_text_glyphs("\u{F0E0} john@example.com"));
        assert!(!has_non_text_glyphs("• Built APIs"));
        assert!(!has_non_text_glyphs("➤ Shipped v2"));
    }
}
