//! Embedding model trait and implementations
//!
//! Provides:
//! - `EmbeddingModel` trait for generating semantic embeddings
//! - `StubModel` for testing without actual ML model
//!
//! The scorer only ever talks to `EmbeddingModel`. Dimension is whatever the
//! model returns; nothing downstream hard-codes it.

use ring::digest::{digest, SHA256};

/// Number of dimensions produced by `StubModel::new()`
pub const STUB_DIMS: usize = 64;

/// Trait for embedding models
///
/// Implementations map text into a fixed-dimension vector space in which
/// cosine similarity is meaningful. Outputs must be deterministic for a given
/// model version. Implementations must tolerate concurrent `&self` calls,
/// since a scorer may be shared across threads.
pub trait EmbeddingModel: Send + Sync {
    /// Generate an embedding vector from text
    fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError>;

    /// Generate embeddings for multiple texts in a single batch
    ///
    /// The scorer requests all sentences of one document through this method
    /// in a single call.
    ///
    /// # Default Implementation
    /// Falls back to calling `embed()` for each text sequentially.
    /// Implementations should override for better performance.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Get the number of dimensions in the embedding
    fn dimensions(&self) -> usize;

    /// Get the model identifier (for logging and result provenance)
    fn model_id(&self) -> &str;
}

/// Errors from embedding model operations
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to load model: {0}")]
    LoadError(String),

    #[error("Inference error: {0}")]
    Inference(String),
}

/// SHA-256 digest as a fixed array
pub(crate) fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = digest(&SHA256, data);
    let mut result = [0u8; 32];
    result.copy_from_slice(hash.as_ref());
    result
}

/// Scale a vector to unit length in place. Zero vectors are left untouched.
pub(crate) fn l2_normalize(embedding: &mut [f32]) {
    let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for val in embedding.iter_mut() {
            *val /= magnitude;
        }
    }
}

/// Stub embedding model for testing
///
/// Generates deterministic embeddings based on input hash. Two different
/// texts get unrelated vectors, so this model carries no semantics at all;
/// use `HashingModel` when tests need overlapping wording to score higher.
pub struct StubModel {
    dims: usize,
}

impl StubModel {
    /// Create a new stub model with default settings
    pub fn new() -> Self {
        Self { dims: STUB_DIMS }
    }

    /// Create a stub model with custom dimensions
    pub fn with_dims(dims: usize) -> Self {
        Self { dims }
    }
}

impl Default for StubModel {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingModel for StubModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let hash = sha256(text.as_bytes());

        // Each hash byte becomes one value in [-1, 1], cycling over the digest
        let mut embedding: Vec<f32> = (0..self.dims)
            .map(|i| ((hash[i % 32] as f32 / 255.0) * 2.0) - 1.0)
            .collect();

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_id(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_model_embed_length() {
        let model = StubModel::new();
        let embedding = model.embed("test input").unwrap();
        assert_eq!(embedding.len(), STUB_DIMS);
        assert_eq!(model.dimensions(), STUB_DIMS);
    }

    #[test]
    fn test_stub_model_deterministic() {
        let model = StubModel::new();
        let emb1 = model.embed("hello world").unwrap();
        let emb2 = model.embed("hello world").unwrap();
        assert_eq!(emb1, emb2);
    }

    #[test]
    fn test_stub_model_different_inputs() {
        let model = StubModel::new();
        let emb1 = model.embed("hello").unwrap();
        let emb2 = model.embed("world").unwrap();
        assert_ne!(emb1, emb2);
    }

    #[test]
    fn test_stub_model_normalized() {
        let model = StubModel::with_dims(128);
        let embedding = model.embed("test").unwrap();
        assert_eq!(embedding.len(), 128);

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!(
            (magnitude - 1.0).abs() < 0.001,
            "Embedding not normalized: magnitude = {}",
            magnitude
        );
    }

    #[test]
    fn test_default_embed_batch_matches_single() {
        let model = StubModel::new();
        let texts = vec![
            "hello world".to_string(),
            "goodbye world".to_string(),
            "test input".to_string(),
        ];

        let embeddings = model.embed_batch(&texts).unwrap();
        assert_eq!(embeddings.len(), 3);

        for (text, batch_emb) in texts.iter().zip(embeddings.iter()) {
            assert_eq!(batch_emb, &model.embed(text).unwrap());
        }
    }

    #[test]
    fn test_embed_batch_empty() {
        let model = StubModel::new();
        assert!(model.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_l2_normalize_zero_vector_untouched() {
        let mut zero = vec![0.0f32; 4];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0; 4]);
    }
}
