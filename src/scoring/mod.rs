//! Sentence-level semantic role scoring
//!
//! ## Pipeline
//!
//! 1. `sentences`: split and filter the document into candidate sentences
//! 2. `EmbeddingModel::embed_batch`: one call for all sentences
//! 3. `similarity`: sentence × role cosine matrix
//! 4. `attention`: rank-tiered weighted mean per role
//! 5. `normalizer`: temperature softmax over roles
//! 6. `evidence`: top sentences for the winner plus a per-sentence breakdown
//!
//! `RoleScorer` wires the steps together and owns the role anchors.

pub mod attention;
pub mod evidence;
pub mod normalizer;
pub mod scorer;
pub mod sentences;
pub mod similarity;
pub mod types;

pub use attention::{aggregate, AttentionConfig, TierBounds};
pub use evidence::{select_evidence, sentence_breakdown, DEFAULT_EVIDENCE_COUNT};
pub use normalizer::{argmax, softmax, Normalizer, DEFAULT_TEMPERATURE};
pub use scorer::{RoleAnchor, RoleScorer, ScoringConfig, DEFAULT_MIN_SENTENCES};
pub use sentences::{alpha_ratio, extract_sentences, ExtractionRules, BOILERPLATE_PHRASES};
pub use similarity::{cosine_similarity, SimilarityMatrix};
pub use types::{
    RoleScores, ScoringError, ScoringResult, Sentence, SentenceScore, UNKNOWN_ROLE,
};
