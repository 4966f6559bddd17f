use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeId;

/// Per-resume sub-scores, each a percentage in [0, 100] rounded to two decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub tfidf_score: f64,
    pub semantic_score: f64,
    pub skill_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
}

/// One entry of the ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub id: ResumeId,
    pub applicant_name: String,
    pub total_score: f64, // 0 – 100
    pub score_breakdown: ScoreBreakdown,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
}
