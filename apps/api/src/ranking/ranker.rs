//! Score Combiner & Ranker.
//!
//! `RankingService` owns the lexical and semantic backends, built once in
//! `main.rs` and shared through `AppState`. `rank` is synchronous and pure:
//! callers on the async runtime should run it via `spawn_blocking`.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::models::job::JobDescription;
use crate::models::ranking::{RankedResult, ScoreBreakdown};
use crate::models::resume::{ResumeId, ResumeRecord};
use crate::ranking::fields::{match_fields, FieldScores};
use crate::ranking::lexical::LexicalScorer;
use crate::ranking::semantic::SemanticScorer;
use crate::ranking::text::{job_text, resume_text};
use crate::ranking::weights::{SubScores, WeightConfig};
use crate::ranking::RankingError;

pub struct RankingService {
    lexical: LexicalScorer,
    semantic: SemanticScorer,
    default_weights: WeightConfig,
}

impl RankingService {
    pub fn new(
        lexical: LexicalScorer,
        semantic: SemanticScorer,
        default_weights: WeightConfig,
    ) -> Result<Self, RankingError> {
        default_weights.validate()?;
        Ok(Self {
            lexical,
            semantic,
            default_weights,
        })
    }

    pub fn default_weights(&self) -> &WeightConfig {
        &self.default_weights
    }

    pub fn semantic_backend(&self) -> &str {
        self.semantic.backend_name()
    }

    /// Ranks `resumes` against `jd`, best first.
    ///
    /// Every resume appears exactly once in the output. Equal totals keep
    /// their input order. Any failure aborts the whole call.
    pub fn rank(
        &self,
        jd: &JobDescription,
        resumes: &[ResumeRecord],
        weights: Option<&WeightConfig>,
    ) -> Result<Vec<RankedResult>, RankingError> {
        let weights = weights.unwrap_or(&self.default_weights);
        weights.validate()?;
        validate_job_description(jd)?;

        if resumes.is_empty() {
            debug!("Empty candidate pool, nothing to rank");
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let job = job_text(jd);
        let texts: Vec<String> = resumes.par_iter().map(resume_text).collect();

        let (tfidf_scores, semantic_scores) = rayon::join(
            || self.lexical.score(&job, &texts),
            || self.semantic.score(&job, &texts),
        );
        let semantic_scores = semantic_scores?;

        let mut results: Vec<RankedResult> = resumes
            .par_iter()
            .enumerate()
            .map(|(i, resume)| {
                let fields = match_fields(jd, resume);
                let sub = SubScores {
                    tfidf: tfidf_scores[i],
                    semantic: semantic_scores[i],
                    skill: fields.skill_match,
                    experience: fields.experience_match,
                    education: fields.education_match,
                };
                build_result(resume.resolved_id(i), resume, &sub, fields, weights)
            })
            .collect();

        // Vec::sort_by is stable: ties keep input order.
        results.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

        info!(
            candidates = results.len(),
            semantic_backend = self.semantic.backend_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            top_score = results.first().map(|r| r.total_score).unwrap_or(0.0),
            "Ranked candidate pool"
        );

        Ok(results)
    }
}

fn validate_job_description(jd: &JobDescription) -> Result<(), RankingError> {
    if jd.job_title.trim().is_empty() {
        return Err(RankingError::InputValidation(
            "job_description.job_title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn build_result(
    id: ResumeId,
    resume: &ResumeRecord,
    sub: &SubScores,
    fields: FieldScores,
    weights: &WeightConfig,
) -> RankedResult {
    RankedResult {
        id,
        applicant_name: resume.applicant_name.clone(),
        total_score: to_percent(weights.combine(sub)),
        score_breakdown: ScoreBreakdown {
            tfidf_score: to_percent(sub.tfidf),
            semantic_score: to_percent(sub.semantic),
            skill_match: to_percent(sub.skill),
            experience_match: to_percent(sub.experience),
            education_match: to_percent(sub.education),
        },
        matched_skills: fields.matched_skills,
        missing_skills: fields.missing_skills,
    }
}

/// Fraction in [0, 1] to a percentage with two decimals (half away from zero).
pub fn to_percent(fraction: f64) -> f64 {
    (fraction.clamp(0.0, 1.0) * 100.0 * 100.0).round() / 100.0
}
