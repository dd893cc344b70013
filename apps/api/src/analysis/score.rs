use serde::{Deserialize, Serialize};

/// Fixed weights of the four sub-scores in the overall score. Sums to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub content_quality: f64,
    pub ats_compatibility: f64,
    pub keyword_density: f64,
    pub formatting: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            content_quality: 0.4,
            ats_compatibility: 0.25,
            keyword_density: 0.2,
            formatting: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.content_quality + self.ats_compatibility + self.keyword_density + self.formatting
    }

    pub fn weight(&self, sub_score: SubScore) -> f64 {
        match sub_score {
            SubScore::ContentQuality => self.content_quality,
            SubScore::AtsCompatibility => self.ats_compatibility,
            SubScore::KeywordDensity => self.keyword_density,
            SubScore::Formatting => self.formatting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubScore {
    ContentQuality,
    AtsCompatibility,
    KeywordDensity,
    Formatting,
}

impl SubScore {
    pub const ALL: [SubScore; 4] = [
        SubScore::ContentQuality,
        SubScore::AtsCompatibility,
        SubScore::KeywordDensity,
        SubScore::Formatting,
    ];
}

/// Sub-scores in [0, 100] and their weighted overall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub content_quality: f64,
    pub ats_compatibility: f64,
    pub keyword_density: f64,
    pub formatting: f64,
    pub overall: f64,
}

impl ScoreBreakdown {
    /// Builds a breakdown from raw sub-scores.
    ///
    /// An undefined (`None`) sub-score contributes 0 and the remaining weights
    /// are NOT renormalised: a missing dimension is penalised.
    pub fn from_parts(
        content_quality: Option<f64>,
        ats_compatibility: Option<f64>,
        keyword_density: Option<f64>,
        formatting: Option<f64>,
    ) -> Self {
        let mut breakdown = Self {
            content_quality: clamp_score(content_quality),
            ats_compatibility: clamp_score(ats_compatibility),
            keyword_density: clamp_score(keyword_density),
            formatting: clamp_score(formatting),
            overall: 0.0,
        };
        let weights = ScoringWeights::default();
        debug_assert!((weights.total() - 1.0).abs() < 1e-9, "weights must sum to 1");
        breakdown.overall = breakdown.weighted_sum(&weights);
        breakdown
    }

    pub fn get(&self, sub_score: SubScore) -> f64 {
        match sub_score {
            SubScore::ContentQuality => self.content_quality,
            SubScore::AtsCompatibility => self.ats_compatibility,
            SubScore::KeywordDensity => self.keyword_density,
            SubScore::Formatting => self.formatting,
        }
    }

    pub fn weighted_sum(&self, weights: &ScoringWeights) -> f64 {
        SubScore::ALL
            .iter()
            .map(|s| weights.weight(*s) * self.get(*s))
            .sum::<f64>()
            .clamp(0.0, 100.0)
    }
}

/// Undefined or non-finite values count as 0; everything lands in [0, 100].
pub fn clamp_score(value: Option<f64>) -> f64 {
    value
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        assert!((w.total() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overall_is_weighted_sum() {
        // 0.4*80 + 0.25*60 + 0.2*50 + 0.15*40 = 32 + 15 + 10 + 6 = 63
        let b = ScoreBreakdown::from_parts(Some(80.0), Some(60.0), Some(50.0), Some(40.0));
        assert!((b.overall - 63.0).abs() < 1e-9, "overall was {}", b.overall);
    }

    #[test]
    fn test_overall_matches_weighted_sum_over_grid() {
        let w = ScoringWeights::default();
        for c in [0.0, 12.5, 50.0, 100.0] {
            for a in [0.0, 33.3, 100.0] {
                for k in [0.0, 70.0] {
                    for f in [5.0, 100.0] {
                        let b = ScoreBreakdown::from_parts(Some(c), Some(a), Some(k), Some(f));
                        let expected = 0.4 * c + 0.25 * a + 0.2 * k + 0.15 * f;
                        assert!((b.overall - expected).abs() < 1e-9);
                        assert!((b.weighted_sum(&w) - b.overall).abs() < 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_undefined_sub_score_counts_zero_without_renormalising() {
        let b = ScoreBreakdown::from_parts(Some(100.0), None, Some(100.0), Some(100.0));
        assert_eq!(b.ats_compatibility, 0.0);
        assert!((b.overall - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let b = ScoreBreakdown::from_parts(Some(140.0), Some(-20.0), Some(f64::NAN), Some(100.0));
        assert_eq!(b.content_quality, 100.0);
        assert_eq!(b.ats_compatibility, 0.0);
        assert_eq!(b.keyword_density, 0.0);
        assert!(b.overall <= 100.0 && b.overall >= 0.0);
    }

    #[test]
    fn test_sub_score_serializes_snake_case() {
        let json = serde_json::to_string(&SubScore::AtsCompatibility).unwrap();
        assert_eq!(json, r#""ats_compatibility""#);
    }
}
