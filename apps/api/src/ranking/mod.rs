// Resume Ranking Engine
// Implements: text normalization, TF-IDF lexical scoring, embedding-based semantic
// scoring, structured field matching, weighted combination and ranking.
// Pure CPU work: no I/O, no LLM calls. Backends are built once in main.rs.

#[cfg(feature = "embeddings-candle")]
pub mod candle_embedder;
pub mod fields;
pub mod handlers;
pub mod lexical;
pub mod ranker;
pub mod semantic;
pub mod stop_words;
pub mod text;
pub mod weights;

use thiserror::Error;

/// Errors that abort a whole ranking call. No partial results are returned.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Invalid ranking input: {0}")]
    InputValidation(String),

    #[error("Scoring backend '{backend}' unavailable: {reason}")]
    ScoringBackendUnavailable { backend: String, reason: String },
}

impl RankingError {
    pub fn backend(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        RankingError::ScoringBackendUnavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }
}
