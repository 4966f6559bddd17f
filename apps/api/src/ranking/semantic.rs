//! Semantic Scorer — dense embedding similarity between job and resume texts.
//!
//! The embedding backend sits behind `TextEmbedder` and is chosen once at startup:
//! - `candle`: pretrained sentence-transformers model (`CandleEmbedder`,
//!   `embeddings-candle` feature). Captures synonyms and paraphrases.
//! - `hash`: `HashEmbedder`, signed feature hashing of words and sub-word
//!   trigrams. Deterministic and offline; for tests and air-gapped runs only,
//!   it cannot relate words that share no spelling.
//!
//! Any backend failure aborts the ranking call; there is no fallback score.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rayon::prelude::*;
use siphasher::sip::SipHasher13;
use thiserror::Error;

use crate::ranking::RankingError;

/// Changing these keys changes every embedding.
const HASH_SEED_K0: u64 = 0x5eed_0f7e_a1e9_7700;
const HASH_SEED_K1: u64 = 0x0c0f_fee0_ba5e_ba11;

pub const DEFAULT_DIMENSION: usize = 512;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model not loaded: {0}")]
    NotLoaded(String),

    #[error("expected {expected}-dimensional embedding, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding contains non-finite values")]
    NonFinite,

    #[error("embedding dimension must be at least 1")]
    ZeroDimension,

    #[error("{0}")]
    Backend(String),
}

/// A text embedding backend. Shared across requests as `Arc<dyn TextEmbedder>`.
pub trait TextEmbedder: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds every text, preserving order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.par_iter().map(|t| self.embed(t)).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HashEmbedder
// ────────────────────────────────────────────────────────────────────────────

/// Feature-hashing embedder.
///
/// Each lower-cased word contributes with weight 1.0 and each character
/// trigram of `<word>` with weight 0.5, so inflected or compound forms
/// ("develop", "developer", "development") land near each other even when the
/// TF-IDF vocabulary treats them as unrelated terms.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::ZeroDimension);
        }
        Ok(Self { dimension })
    }

    fn hash(&self, feature: &str, salt: u8) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        salt.hash(&mut hasher);
        feature.hash(&mut hasher);
        hasher.finish()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let index = (self.hash(feature, 0) % self.dimension as u64) as usize;
        let sign = if self.hash(feature, 1) & 1 == 0 { 1.0 } else { -1.0 };
        vector[index] += sign * weight;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl TextEmbedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0_f32; self.dimension];
        let lowered = text.to_lowercase();

        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            self.add_feature(&mut vector, word, 1.0);

            let padded: Vec<char> = format!("<{word}>").chars().collect();
            for trigram in padded.windows(3) {
                let gram: String = trigram.iter().collect();
                self.add_feature(&mut vector, &format!("#{gram}"), 0.5);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}

/// Builds the embedding backend named in configuration.
///
/// `dimension` applies to `hash` only; `candle` takes it from the model config.
pub fn build_embedder(
    backend: &str,
    dimension: usize,
    model: &str,
) -> Result<Arc<dyn TextEmbedder>, RankingError> {
    match backend {
        "hash" => {
            let embedder = HashEmbedder::new(dimension)
                .map_err(|e| RankingError::backend(backend, e.to_string()))?;
            Ok(Arc::new(embedder))
        }
        "candle" => build_candle(model),
        other => Err(RankingError::backend(
            other,
            "unknown embedding backend (available: candle, hash)",
        )),
    }
}

#[cfg(feature = "embeddings-candle")]
fn build_candle(model: &str) -> Result<Arc<dyn TextEmbedder>, RankingError> {
    let embedder = crate::ranking::candle_embedder::CandleEmbedder::load(model)
        .map_err(|e| RankingError::backend("candle", e.to_string()))?;
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "embeddings-candle"))]
fn build_candle(model: &str) -> Result<Arc<dyn TextEmbedder>, RankingError> {
    let error = EmbeddingError::NotLoaded(format!(
        "{model}: binary built without the `embeddings-candle` feature"
    ));
    Err(RankingError::backend("candle", error.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// SemanticScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct SemanticScorer {
    embedder: Arc<dyn TextEmbedder>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }

    pub fn backend_name(&self) -> &str {
        self.embedder.name()
    }

    /// Cosine similarity of each resume embedding to the job embedding,
    /// negative values clamped to 0.
    pub fn score(&self, job_text: &str, resume_texts: &[String]) -> Result<Vec<f64>, RankingError> {
        if resume_texts.is_empty() {
            return Ok(Vec::new());
        }

        let job = self.checked_embed(job_text)?;
        let resumes = self
            .embedder
            .embed_batch(resume_texts)
            .map_err(|e| self.unavailable(e))?;

        if resumes.len() != resume_texts.len() {
            return Err(self.unavailable(EmbeddingError::Backend(format!(
                "returned {} embeddings for {} texts",
                resumes.len(),
                resume_texts.len()
            ))));
        }

        resumes
            .iter()
            .map(|r| {
                self.validate(r).map_err(|e| self.unavailable(e))?;
                Ok(cosine_similarity(&job, r).clamp(0.0, 1.0))
            })
            .collect()
    }

    fn checked_embed(&self, text: &str) -> Result<Vec<f32>, RankingError> {
        let vector = self.embedder.embed(text).map_err(|e| self.unavailable(e))?;
        self.validate(&vector).map_err(|e| self.unavailable(e))?;
        Ok(vector)
    }

    fn validate(&self, vector: &[f32]) -> Result<(), EmbeddingError> {
        if vector.len() != self.embedder.dimension() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.embedder.dimension(),
                actual: vector.len(),
            });
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite);
        }
        Ok(())
    }

    fn unavailable(&self, error: EmbeddingError) -> RankingError {
        RankingError::backend(self.embedder.name(), error.to_string())
    }
}

/// Dense cosine similarity. Zero vectors yield 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
