use std::str::FromStr;

use anyhow::{Context, Result};

#[cfg(feature = "embeddings-candle")]
use crate::ranking::candle_embedder::DEFAULT_MODEL;
use crate::ranking::semantic::DEFAULT_DIMENSION;
use crate::ranking::weights::WeightConfig;

#[cfg(feature = "embeddings-candle")]
const DEFAULT_BACKEND: &str = "candle";
#[cfg(not(feature = "embeddings-candle"))]
const DEFAULT_BACKEND: &str = "hash";
#[cfg(not(feature = "embeddings-candle"))]
const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Embedding backend for the semantic scorer: "candle" (pretrained model)
    /// or "hash" (offline, deterministic; tests and air-gapped runs).
    pub embedding_backend: String,
    /// HuggingFace model id loaded by the "candle" backend.
    pub embedding_model: String,
    /// Vector size of the "hash" backend; "candle" uses the model's own size.
    pub embedding_dimension: usize,
    /// Applied when a ranking request carries no weights of its own.
    pub default_weights: WeightConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = WeightConfig::default();
        let default_weights = WeightConfig {
            tfidf: env_or("RANKING_WEIGHT_TFIDF", defaults.tfidf)?,
            semantic: env_or("RANKING_WEIGHT_SEMANTIC", defaults.semantic)?,
            skill: env_or("RANKING_WEIGHT_SKILL", defaults.skill)?,
            experience: env_or("RANKING_WEIGHT_EXPERIENCE", defaults.experience)?,
            education: env_or("RANKING_WEIGHT_EDUCATION", defaults.education)?,
        };

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding_backend: std::env::var("EMBEDDING_BACKEND")
                .unwrap_or_else(|_| DEFAULT_BACKEND.to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            embedding_dimension: env_or("EMBEDDING_DIMENSION", DEFAULT_DIMENSION)?,
            default_weights,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
