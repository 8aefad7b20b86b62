//! Offline feature-hashing embedder
//!
//! Maps each content word to a signed bucket chosen by its SHA-256 digest and
//! sums the buckets into a unit vector. Texts sharing vocabulary get positive
//! cosine similarity, unrelated texts land near zero. No model download, no
//! network, fully deterministic across platforms.

use super::model::{l2_normalize, sha256, EmbeddingModel, ModelError};

/// Default vector width for `HashingModel::new()`
pub const DEFAULT_HASHING_DIMS: usize = 256;

/// Function words ignored when hashing
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "into",
    "is", "it", "its", "of", "on", "or", "that", "the", "their", "this", "to", "was", "were",
    "with",
];

/// Bag-of-words embedder using the hashing trick
pub struct HashingModel {
    dims: usize,
    model_id: String,
}

impl HashingModel {
    /// Create with `DEFAULT_HASHING_DIMS` buckets
    pub fn new() -> Self {
        Self::with_dims(DEFAULT_HASHING_DIMS)
    }

    /// Create with a custom number of buckets (at least 1)
    pub fn with_dims(dims: usize) -> Self {
        let dims = dims.max(1);
        Self {
            dims,
            model_id: format!("hashing-{}", dims),
        }
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .filter(|w| w.chars().count() >= 2 && !STOPWORDS.contains(&w.as_str()))
    }
}

impl Default for HashingModel {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingModel for HashingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let mut embedding = vec![0.0f32; self.dims];

        for token in Self::tokens(text) {
            let hash = sha256(token.as_bytes());
            let bucket =
                u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]]) as usize % self.dims;
            let sign = if hash[4] & 1 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        // Text with no content words stays a zero vector (similarity 0 to anything)
        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
