//! rolecolor - Behavioral role profiling for professional documents
//!
//! Scores free-form professional text (resumes, profiles, bios) against a
//! taxonomy of behavioral archetypes using sentence embeddings, and explains
//! the verdict with the sentences that drove it.
//!
//! ## Features
//!
//! - **Embedding-based scoring**: cosine similarity of every sentence to every role anchor
//! - **Attention weighting**: the strongest sentences count most, filler cannot dilute them
//! - **Calibrated output**: temperature softmax into a strictly positive distribution
//! - **Explainability**: evidence sentences and a per-sentence breakdown
//! - **Pluggable taxonomy**: roles are data, loaded from config
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rolecolor::{HashingModel, RoleScorer};
//!
//! let scorer = RoleScorer::with_defaults(Arc::new(HashingModel::new()))?;
//! let result = scorer.score("Architects scalable systems and sets technical direction.")?;
//! println!("{} ({:.2})", result.dominant_role, result.confidence);
//! # Ok::<(), rolecolor::ScoringError>(())
//! ```

pub mod cli;
pub mod embed;
pub mod pipeline;
pub mod roles;
pub mod scoring;
pub mod summary;

// Re-exports for convenience
pub use embed::{EmbeddingModel, HashingModel, Model2VecEmbedder, ModelError, StubModel};
pub use pipeline::{Analysis, RoleColorPipeline};
pub use roles::{RoleConfigError, RoleDefinition, RoleSet};
pub use scoring::{
    RoleScorer, RoleScores, ScoringConfig, ScoringError, ScoringResult, Sentence, SentenceScore,
    UNKNOWN_ROLE,
};
pub use summary::{ProfileMetadata, Summary, SummaryGenerator};
