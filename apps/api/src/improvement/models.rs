use serde::{Deserialize, Serialize};

/// Confidence an improvement must exceed to be applied automatically.
pub const APPLY_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementKind {
    Content,
    Format,
    Keyword,
    Structure,
}

/// A single suggested edit to the CV.
///
/// `original_text` is the exact text to replace inside `section`; it may be
/// empty for advisory suggestions that have no single anchor in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub section: String,
    pub kind: ImprovementKind,
    #[serde(default)]
    pub original_text: String,
    pub improved_text: String,
    pub reasoning: String,
    pub priority: Priority,
    /// 0.0 – 1.0
    pub confidence: f64,
}

impl Improvement {
    /// High priority with confidence above [`APPLY_CONFIDENCE`].
    pub fn should_apply(&self) -> bool {
        self.priority == Priority::High && self.confidence > APPLY_CONFIDENCE
    }

    /// Confidence forced into [0, 1]; NaN becomes 0.
    pub fn normalized(mut self) -> Self {
        self.confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn improvement(priority: Priority, confidence: f64) -> Improvement {
        Improvement {
            section: "experience".to_string(),
            kind: ImprovementKind::Content,
            original_text: "Responsible for billing".to_string(),
            improved_text: "Led billing".to_string(),
            reasoning: "Stronger opener".to_string(),
            priority,
            confidence,
        }
    }

    #[test]
    fn test_should_apply_needs_high_priority_and_confidence() {
        assert!(improvement(Priority::High, 0.85).should_apply());
        assert!(!improvement(Priority::High, 0.7).should_apply());
        assert!(!improvement(Priority::Medium, 0.95).should_apply());
    }

    #[test]
    fn test_normalized_clamps_confidence() {
        assert_eq!(improvement(Priority::Low, 1.4).normalized().confidence, 1.0);
        assert_eq!(improvement(Priority::Low, f64::NAN).normalized().confidence, 0.0);
    }

    #[test]
    fn test_deserializes_without_original_text() {
        let json = r#"{
            "section": "skills",
            "kind": "keyword",
            "improved_text": "Add Docker and Kubernetes",
            "reasoning": "Missing keywords",
            "priority": "medium",
            "confidence": 0.8
        }"#;
        let parsed: Improvement = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.kind, ImprovementKind::Keyword);
        assert_eq!(parsed.priority, Priority::Medium);
        assert!(parsed.original_text.is_empty());
    }
}
