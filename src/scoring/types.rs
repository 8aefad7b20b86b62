//! Shared types for the scoring module
//!
//! Defines the sentence, score map, per-sentence record and final result
//! structures, plus the error taxonomy of a scoring call.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::embed::ModelError;
use crate::roles::RoleConfigError;

/// Dominant role reported when the document was too short to score
pub const UNKNOWN_ROLE: &str = "Unknown";

/// A candidate sentence extracted from the document
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Sentence {
    /// Sentence text, trimmed, without terminal punctuation
    pub text: String,
    /// Position in the extracted list (first-appearance order)
    pub index: usize,
    /// Source line (1-indexed)
    pub line_number: usize,
}

/// Ordered role id -> value mapping
///
/// Keeps the taxonomy order so output maps read the same way every time.
/// Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleScores {
    entries: Vec<(String, f64)>,
}

impl RoleScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Build from parallel role ids and values
    pub fn from_parts<'a>(ids: impl IntoIterator<Item = &'a str>, values: &[f64]) -> Self {
        Self {
            entries: ids
                .into_iter()
                .zip(values.iter().copied())
                .map(|(id, v)| (id.to_string(), v))
                .collect(),
        }
    }

    pub fn push(&mut self, role: impl Into<String>, value: f64) {
        self.entries.push((role.into(), value));
    }

    pub fn get(&self, role: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(id, _)| id == role)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), *v))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    /// Highest-valued entry; the first one wins on ties
    pub fn best(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (id, value) in self.iter() {
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((id, value)),
            }
        }
        best
    }
}

impl Serialize for RoleScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (role, value) in &self.entries {
            map.serialize_entry(role, value)?;
        }
        map.end()
    }
}

/// Per-sentence explainability record
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SentenceScore {
    pub sentence: String,
    pub index: usize,
    /// Raw cosine similarity of this sentence to every role
    pub role_scores: RoleScores,
    /// Argmax of `role_scores`
    pub best_match_role: String,
    /// Max of `role_scores`
    pub best_match_score: f64,
}

/// Complete output of one scoring call
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScoringResult {
    /// Normalized distribution over roles (sums to 1, all > 0)
    pub scores: RoleScores,
    pub dominant_role: String,
    /// Probability of the dominant role
    pub confidence: f64,
    /// Evidence sentences for the dominant role, strongest first
    pub top_sentences: Vec<String>,
    pub total_sentences: usize,
    pub sentence_scores: Vec<SentenceScore>,
    pub embedding_dim: usize,
    /// Attention-weighted aggregates before normalization
    pub raw_scores: RoleScores,
    /// Insufficient-input marker; only set on the degraded path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoringResult {
    /// True when the document was too short and the result is a uniform fallback
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Fatal errors from scorer construction or a scoring call
///
/// A too-short document is not an error; see `ScoringResult::is_degraded`.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Malformed role configuration: {0}")]
    MalformedRoleConfig(#[from] RoleConfigError),

    #[error("Invalid scoring configuration: {0}")]
    InvalidConfig(String),

    #[error("Embedding provider failed: {0}")]
    Provider(#[from] ModelError),

    #[error("Embedding provider returned {actual} vectors for {expected} inputs")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
