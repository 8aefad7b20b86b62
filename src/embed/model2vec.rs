//! Model2Vec embedding model implementation
//!
//! Provides real semantic embeddings using static Model2Vec models.
//! The default model downloads from Hugging Face on first use (~30 MB).

use model2vec_rs::model::StaticModel;

use super::model::{l2_normalize, EmbeddingModel, ModelError};

/// Real embedding model backed by `model2vec-rs`
///
/// # Performance
/// - Model size: ~30 MB for potion-base-8M (downloads on first use)
/// - Embedding time: well under 1ms per sentence
/// - Dimensions: varies by model (256 for potion-base-8M)
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_id: String,
    dims: usize,
}

impl Model2VecEmbedder {
    /// Default model ID for Hugging Face Hub
    pub const DEFAULT_MODEL: &'static str = "minishlab/potion-base-8M";

    /// Create with the default model (potion-base-8M)
    ///
    /// # Errors
    /// Returns `ModelError::LoadError` if the model cannot be downloaded or loaded.
    pub fn new() -> Result<Self, ModelError> {
        Self::from_pretrained(Self::DEFAULT_MODEL)
    }

    /// Create from a specific Hugging Face model or a local model directory
    ///
    /// # Arguments
    /// * `model_id` - Hugging Face model ID (e.g., "minishlab/potion-base-8M") or path
    pub fn from_pretrained(model_id: &str) -> Result<Self, ModelError> {
        tracing::info!("Loading Model2Vec model: {}", model_id);

        // (repo_or_path, token, normalize, subfolder)
        let model = StaticModel::from_pretrained(model_id, None, None, None)
            .map_err(|e| ModelError::LoadError(format!("Failed to load {}: {}", model_id, e)))?;

        // Dimension is only discoverable by encoding something
        let dims = model.encode_single("dimension check").len();
        if dims == 0 {
            return Err(ModelError::LoadError(format!(
                "Model {} produced empty embeddings",
                model_id
            )));
        }

        tracing::info!("Model2Vec loaded successfully. Dimensions: {}", dims);

        Ok(Self {
            model,
            model_id: model_id.to_string(),
            dims,
        })
    }

    /// Create from a local path
    pub fn from_path(path: &std::path::Path) -> Result<Self, ModelError> {
        Self::from_pretrained(path.to_string_lossy().as_ref())
    }
}

impl EmbeddingModel for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let mut embedding = self.model.encode_single(text);

        if embedding.is_empty() {
            return Err(ModelError::Inference("No embeddings returned".to_string()));
        }

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    /// Batch embed using the native model2vec batch API
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut embeddings = self.model.encode(texts);

        if embeddings.len() != texts.len() {
            return Err(ModelError::Inference(format!(
                "Batch size mismatch: {} inputs, {} outputs",
                texts.len(),
                embeddings.len()
            )));
        }

        for embedding in embeddings.iter_mut() {
            l2_normalize(embedding);
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
