//! Download and bookkeeping for Model2Vec embedding models

use crate::error::{RankerError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files `StaticModel::from_pretrained` needs in a local model directory
const REQUIRED_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];
const OPTIONAL_FILES: [&str; 1] = ["README.md"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
    api: Api,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                RankerError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let api = Api::new()
            .map_err(|e| RankerError::ModelError(format!("Failed to initialize HF API: {}", e)))?;

        let mut manager = Self {
            models_dir,
            available_models: BTreeMap::new(),
            downloaded_models: HashSet::new(),
            api,
        };

        manager.init_available_models();
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn init_available_models(&mut self) {
        let models = [
            (
                "potion-base-8M",
                "Potion Base 8M",
                "minishlab/potion-base-8M",
                33,
                256,
                "Small general-purpose static embeddings (default)",
            ),
            (
                "potion-base-32M",
                "Potion Base 32M",
                "minishlab/potion-base-32M",
                130,
                512,
                "Larger general-purpose static embeddings",
            ),
            (
                "potion-retrieval-32M",
                "Potion Retrieval 32M",
                "minishlab/potion-retrieval-32M",
                130,
                512,
                "Static embeddings tuned for retrieval",
            ),
            (
                "m2v-base",
                "Model2Vec Base",
                "minishlab/M2V_base_output",
                90,
                256,
                "Legacy Model2Vec base output model",
            ),
        ];

        for (id, name, repo_id, size_mb, dimensions, description) in models {
            self.available_models.insert(
                id.to_string(),
                EmbeddingModelInfo {
                    name: name.to_string(),
                    repo_id: repo_id.to_string(),
                    size_mb,
                    description: description.to_string(),
                    dimensions,
                },
            );
        }
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            RankerError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_complete_model_dir(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .ok_or_else(|| RankerError::ModelError(format!("Unknown embedding model: {}", model_id)))?
            .clone();

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );
        fs::create_dir_all(&model_dir).await?;

        let repo = self.api.repo(hf_hub::Repo::model(model_info.repo_id.clone()));

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                RankerError::ModelError(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("  downloaded {}", file);
        }

        for file in OPTIONAL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                }
                Err(e) => warn!("Optional file {} not found: {}", file, e),
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        if let Some(path) = self.get_model_path(model_id) {
            return Ok(path);
        }
        self.download_model(model_id).await
    }

    pub fn list_available_models(&self) -> Vec<(&String, &EmbeddingModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Accepts a model id, a Hugging Face repo id, or a display name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(_, info)| info.repo_id == input || info.name.to_lowercase() == input_lower)
            .map(|(id, _)| id.clone())
    }
}

async fn is_complete_model_dir(path: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}
