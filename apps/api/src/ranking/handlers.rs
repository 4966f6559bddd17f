//! Axum route handlers for the Ranking API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobDescription;
use crate::models::ranking::RankedResult;
use crate::models::resume::ResumeRecord;
use crate::ranking::weights::WeightConfig;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeScoresRequest {
    pub job_description: JobDescription,
    #[serde(alias = "resumes_data")]
    pub resumes: Vec<ResumeRecord>,
    /// Overrides the service defaults for this call only.
    #[serde(default)]
    pub weights: Option<WeightConfig>,
}

#[derive(Debug, Serialize)]
pub struct ResumeScoresResponse {
    pub ranking_id: Uuid,
    pub message: String,
    pub generated_at: DateTime<Utc>,
    pub weights: WeightConfig,
    pub scores: Vec<RankedResult>,
}

#[derive(Debug, Serialize)]
pub struct WeightsResponse {
    pub weights: WeightConfig,
    pub semantic_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume-scores
///
/// Ranks the submitted resumes against the job description, best first.
/// CPU-bound, so scoring runs on the blocking pool.
///
/// `weights` uses the canonical keys `tfidf`, `semantic`, `skill`,
/// `experience`, `education`. Aliases are accepted, but two spellings of the
/// same weight in one request are rejected with 422.
pub async fn handle_resume_scores(
    State(state): State<AppState>,
    payload: Result<Json<ResumeScoresRequest>, JsonRejection>,
) -> Result<Json<ResumeScoresResponse>, AppError> {
    let Json(request) = payload?;
    let ranking_id = Uuid::new_v4();
    let weights = request
        .weights
        .unwrap_or_else(|| *state.ranker.default_weights());

    info!(
        %ranking_id,
        job_title = %request.job_description.job_title,
        candidates = request.resumes.len(),
        "Ranking request received"
    );

    let ranker = state.ranker.clone();
    let scores = tokio::task::spawn_blocking(move || {
        ranker.rank(&request.job_description, &request.resumes, Some(&weights))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("ranking task failed: {e}")))??;

    Ok(Json(ResumeScoresResponse {
        ranking_id,
        message: "Resume scores generated".to_string(),
        generated_at: Utc::now(),
        weights,
        scores,
    }))
}

/// GET /api/v1/resume-scores/weights
///
/// Returns the default weights applied when a request omits `weights`.
pub async fn handle_default_weights(State(state): State<AppState>) -> Json<WeightsResponse> {
    Json(WeightsResponse {
        weights: *state.ranker.default_weights(),
        semantic_backend: state.ranker.semantic_backend().to_string(),
    })
}
