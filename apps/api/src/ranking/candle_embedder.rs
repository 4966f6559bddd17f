//! Pretrained sentence embedder on Candle (BERT family, e.g. all-MiniLM-L6-v2).
//!
//! Weights, config and tokenizer are fetched once from the HuggingFace Hub
//! (or its local cache under `HF_HOME`) at startup. Token embeddings are
//! mean-pooled over the attention mask and L2-normalised, the usual
//! sentence-transformers recipe.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::api::sync::ApiBuilder;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use crate::ranking::semantic::{EmbeddingError, TextEmbedder};

pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

pub struct CandleEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dimension: usize,
    model_id: String,
}

impl CandleEmbedder {
    /// Downloads (or reads from cache) and loads `model_id`.
    pub fn load(model_id: &str) -> Result<Self, EmbeddingError> {
        let device = Device::cuda_if_available(0).map_err(|e| not_loaded(model_id, "device", e))?;

        let mut api = ApiBuilder::new();
        if let Ok(cache_dir) = std::env::var("HF_HOME") {
            api = api.with_cache_dir(cache_dir.into());
        }
        let repo = api
            .build()
            .map_err(|e| not_loaded(model_id, "hub client", e))?
            .model(model_id.to_string());

        let config_path = repo
            .get("config.json")
            .map_err(|e| not_loaded(model_id, "config.json", e))?;
        let raw_config = std::fs::read_to_string(config_path)
            .map_err(|e| not_loaded(model_id, "config.json", e))?;
        let config: Config = serde_json::from_str(&raw_config)
            .map_err(|e| not_loaded(model_id, "config.json", e))?;

        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| not_loaded(model_id, "model.safetensors", e))?;
        // SAFETY: the hub cache file is not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| not_loaded(model_id, "model.safetensors", e))?
        };
        let model = BertModel::load(vb, &config).map_err(|e| not_loaded(model_id, "model", e))?;

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| not_loaded(model_id, "tokenizer.json", e))?;
        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| not_loaded(model_id, "tokenizer.json", e))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| not_loaded(model_id, "tokenizer truncation", e))?;

        info!(
            model = model_id,
            dimension = config.hidden_size,
            device = ?device,
            "Sentence embedding model loaded"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            dimension: config.hidden_size,
            model_id: model_id.to_string(),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn mean_pooled(&self, ids: &[u32], mask: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = Tensor::new(mask, &self.device)?.unsqueeze(0)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Padding positions contribute nothing to the mean
        let mask = attention_mask
            .unsqueeze(2)?
            .to_dtype(hidden.dtype())?
            .broadcast_as(hidden.shape())?;
        let summed = hidden.mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let mean = summed.div(&counts)?;

        let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?;
        mean.broadcast_div(&norm)?.squeeze(0)?.to_vec1::<f32>()
    }
}

impl TextEmbedder for CandleEmbedder {
    fn name(&self) -> &str {
        "candle"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::Backend(format!("tokenization failed: {e}")))?;

        self.mean_pooled(encoding.get_ids(), encoding.get_attention_mask())
            .map_err(|e| EmbeddingError::Backend(format!("{} forward failed: {e}", self.model_id)))
    }
}

fn not_loaded(model_id: &str, stage: &str, error: impl std::fmt::Display) -> EmbeddingError {
    EmbeddingError::NotLoaded(format!("{model_id} ({stage}): {error}"))
}
