use serde::{Deserialize, Serialize};

use crate::ranking::RankingError;

/// Weights of the five sub-scores. They need not sum to 1.
///
/// Missing keys take the defaults. Canonical keys are `tfidf`, `semantic`,
/// `skill`, `experience` and `education`; the resume enhancement API names
/// (`skill_matching`, ...) and the breakdown field names (`skill_match`, ...)
/// are accepted as aliases. Sending two spellings of the same weight is a
/// duplicate-field error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    #[serde(alias = "tfidf_score")]
    pub tfidf: f64,
    #[serde(alias = "semantic_score")]
    pub semantic: f64,
    #[serde(alias = "skill_match", alias = "skill_matching")]
    pub skill: f64,
    #[serde(alias = "experience_match", alias = "experience_matching")]
    pub experience: f64,
    #[serde(alias = "education_match", alias = "education_matching")]
    pub education: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            tfidf: 0.10,
            semantic: 0.20,
            skill: 0.45,
            experience: 0.15,
            education: 0.10,
        }
    }
}

/// One resume's five sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubScores {
    pub tfidf: f64,
    pub semantic: f64,
    pub skill: f64,
    pub experience: f64,
    pub education: f64,
}

impl WeightConfig {
    /// Rejects negative or non-finite weights.
    pub fn validate(&self) -> Result<(), RankingError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(RankingError::InputValidation(format!(
                    "weight '{name}' must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Weighted sum of the sub-scores, clamped to [0, 1].
    pub fn combine(&self, s: &SubScores) -> f64 {
        (self.tfidf * s.tfidf
            + self.semantic * s.semantic
            + self.skill * s.skill
            + self.experience * s.experience
            + self.education * s.education)
            .clamp(0.0, 1.0)
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("tfidf", self.tfidf),
            ("semantic", self.semantic),
            ("skill", self.skill),
            ("experience", self.experience),
            ("education", self.education),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = WeightConfig::default();
        let sum = w.tfidf + w.semantic + w.skill + w.experience + w.education;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_full() {
        let s = SubScores {
            tfidf: 1.0,
            semantic: 1.0,
            skill: 1.0,
            experience: 1.0,
            education: 1.0,
        };
        assert!((WeightConfig::default().combine(&s) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_partial() {
        // 0.1*0.2 + 0.2*0.5 + 0.45*0.5 + 0.15*1.0 + 0.1*0.5 = 0.545
        let s = SubScores {
            tfidf: 0.2,
            semantic: 0.5,
            skill: 0.5,
            experience: 1.0,
            education: 0.5,
        };
        let total = WeightConfig::default().combine(&s);
        assert!((total - 0.545).abs() < 1e-9, "Total was {total}");
    }

    #[test]
    fn test_combine_clamped_when_weights_exceed_one() {
        let w = WeightConfig {
            tfidf: 1.0,
            semantic: 1.0,
            skill: 1.0,
            experience: 1.0,
            education: 1.0,
        };
        assert_eq!(w.combine(&SubScores { skill: 1.0, experience: 1.0, ..Default::default() }), 1.0);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let w: WeightConfig = serde_json::from_str(r#"{"skill": 0.9}"#).unwrap();
        assert_eq!(w.skill, 0.9);
        assert_eq!(w.tfidf, 0.10);
        assert_eq!(w.education, 0.10);
    }

    #[test]
    fn test_accepts_legacy_key_names() {
        let w: WeightConfig = serde_json::from_str(
            r#"{"tfidf": 0.2, "semantic": 0.2, "skill_matching": 0.3,
                "experience_matching": 0.2, "education_matching": 0.1}"#,
        )
        .unwrap();
        assert_eq!(w.skill, 0.3);
        assert_eq!(w.experience, 0.2);
        assert_eq!(w.education, 0.1);
    }

    #[test]
    fn test_two_spellings_of_one_weight_are_rejected() {
        let err = serde_json::from_str::<WeightConfig>(r#"{"skill": 0.5, "skill_matching": 0.6}"#)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate field `skill`"), "{err}");
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let w = WeightConfig {
            semantic: -0.1,
            ..Default::default()
        };
        assert!(matches!(w.validate(), Err(RankingError::InputValidation(_))));
    }

    #[test]
    fn test_nan_weight_is_rejected() {
        let w = WeightConfig {
            tfidf: f64::NAN,
            ..Default::default()
        };
        assert!(w.validate().is_err());
        assert!(WeightConfig::default().validate().is_ok());
    }
}
