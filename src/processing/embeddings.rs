//! Sentence embeddings using Model2Vec

use crate::config::Config;
use crate::error::{RankerError, Result};
use crate::processing::embedding_manager::EmbeddingModelManager;
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Fixed-length vector produced by an [`Encoder`]
pub type Embedding = Vec<f32>;

/// Frozen text encoder shared by every ranking run in the process
pub trait Encoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Embedding>;

    fn model_name(&self) -> &str;
}

pub type SharedEncoder = Arc<dyn Encoder>;

pub struct EmbeddingEngine {
    model: StaticModel,
    model_name: String,
}

impl EmbeddingEngine {
    /// Load a Model2Vec model from a local directory. This is the expensive
    /// step; do it once and share the engine.
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| e.context(format!("Failed to load model from {}", model_path.display())))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    /// Resolve the configured model, downloading it on first use
    pub async fn from_config(config: &Config) -> Result<Self> {
        let mut manager = EmbeddingModelManager::new(config.get_models_dir()).await?;
        let model_id = manager
            .resolve_model_id(&config.models.default_embedding_model)
            .ok_or_else(|| {
                RankerError::Configuration(format!(
                    "Unknown embedding model: {}",
                    config.models.default_embedding_model
                ))
            })?;
        let model_path = manager.ensure_model_available(&model_id).await?;
        Self::load(&model_path, &model_id)
    }

    pub fn shared(self) -> SharedEncoder {
        Arc::new(self)
    }
}

impl Encoder for EmbeddingEngine {
    fn encode(&self, text: &str) -> Result<Embedding> {
        let embedding = self.model.encode_single(text);
        if embedding.is_empty() {
            return Err(RankerError::Embedding("model returned an empty vector".to_string()));
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity in [-1, 1]. A zero vector scores 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RankerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
}
