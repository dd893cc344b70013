//! Text normalisation shared by keyword matching and section classification.

/// Lowercases `text`, turns punctuation into single spaces and collapses whitespace.
///
/// `+` and `#` survive so that "C++" and "C#" stay distinguishable from "C".
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '+' || ch == '#' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

/// Token-bounded contiguous match of an already-normalised phrase inside
/// already-normalised text. "ai" does not match inside "maintained".
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    haystack.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let left_ok = start == 0 || haystack.as_bytes()[start - 1] == b' ';
        let right_ok = end == haystack.len() || haystack.as_bytes()[end] == b' ';
        left_ok && right_ok
    })
}

/// Like [`contains_phrase`] but the phrase must open the text.
pub fn starts_with_phrase(haystack: &str, phrase: &str) -> bool {
    !phrase.is_empty()
        && haystack.starts_with(phrase)
        && (haystack.len() == phrase.len() || haystack.as_bytes()[phrase.len()] == b' ')
}
