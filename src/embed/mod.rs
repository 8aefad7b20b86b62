//! Embedding providers
//!
//! Provides:
//! - `EmbeddingModel` trait consumed by the scorer
//! - `Model2VecEmbedder` for real semantic embeddings (production)
//! - `HashingModel` for offline bag-of-words embeddings
//! - `StubModel` for testing without an ML model

pub mod hashing;
pub mod model;
pub mod model2vec;

pub use hashing::HashingModel;
pub use model::{EmbeddingModel, ModelError, StubModel, STUB_DIMS};
pub use model2vec::Model2VecEmbedder;
