//! Role scorer
//!
//! Owns the role anchors and runs the full pipeline for one document:
//! extract → embed (one batch) → similarity → attention → softmax → evidence.

use std::sync::Arc;
use std::time::Instant;

use crate::embed::EmbeddingModel;
use crate::roles::RoleSet;

use super::attention::{aggregate, AttentionConfig};
use super::evidence::{select_evidence, sentence_breakdown, DEFAULT_EVIDENCE_COUNT};
use super::normalizer::{argmax, Normalizer, DEFAULT_TEMPERATURE};
use super::sentences::{extract_sentences, ExtractionRules};
use super::similarity::SimilarityMatrix;
use super::types::{RoleScores, ScoringError, ScoringResult, UNKNOWN_ROLE};

/// Default minimum number of qualifying sentences
pub const DEFAULT_MIN_SENTENCES: usize = 5;

/// Tunables for a scorer instance
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub temperature: f64,
    pub attention: AttentionConfig,
    /// Below this many qualifying sentences the result is a uniform fallback
    pub min_sentences: usize,
    /// Evidence sentences reported for the dominant role
    pub evidence_count: usize,
    pub extraction: ExtractionRules,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            attention: AttentionConfig::default(),
            min_sentences: DEFAULT_MIN_SENTENCES,
            evidence_count: DEFAULT_EVIDENCE_COUNT,
            extraction: ExtractionRules::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        Normalizer::new(self.temperature).map_err(ScoringError::InvalidConfig)?;
        self.attention
            .validate()
            .map_err(ScoringError::InvalidConfig)?;
        if self.min_sentences == 0 {
            return Err(ScoringError::InvalidConfig(
                "min_sentences must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Embedded definition of one role
#[derive(Debug, Clone)]
pub struct RoleAnchor {
    pub role_id: String,
    pub description: String,
    pub embedding: Vec<f32>,
}

/// Scores documents against a fixed role taxonomy
///
/// Anchors are embedded once in `new` and never change afterwards. The scorer
/// holds no mutable state, so `&RoleScorer` can be used from many threads at
/// once as long as the embedding model tolerates concurrent calls.
pub struct RoleScorer {
    model: Arc<dyn EmbeddingModel>,
    roles: RoleSet,
    anchors: Vec<RoleAnchor>,
    anchor_vectors: Vec<Vec<f32>>,
    normalizer: Normalizer,
    config: ScoringConfig,
}

impl std::fmt::Debug for RoleScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleScorer")
            .field("model", &self.model.model_id())
            .field("roles", &self.roles.ids().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

impl RoleScorer {
    /// Build a scorer with the default taxonomy and configuration
    pub fn with_defaults(model: Arc<dyn EmbeddingModel>) -> Result<Self, ScoringError> {
        Self::new(model, RoleSet::default_taxonomy(), ScoringConfig::default())
    }

    /// Validate configuration and embed every role description in one batch
    ///
    /// # Errors
    /// - `InvalidConfig` for an unusable temperature, tier layout or minimum
    /// - `Provider` / `BatchSizeMismatch` / `DimensionMismatch` if the model
    ///   cannot produce consistent anchor vectors
    pub fn new(
        model: Arc<dyn EmbeddingModel>,
        roles: RoleSet,
        config: ScoringConfig,
    ) -> Result<Self, ScoringError> {
        config.validate()?;
        let normalizer = Normalizer::new(config.temperature).map_err(ScoringError::InvalidConfig)?;

        let start = Instant::now();
        let descriptions: Vec<String> = roles.iter().map(|r| r.description.clone()).collect();
        let vectors = model.embed_batch(&descriptions)?;

        if vectors.len() != descriptions.len() {
            return Err(ScoringError::BatchSizeMismatch {
                expected: descriptions.len(),
                actual: vectors.len(),
            });
        }
        let dims = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dims) {
            return Err(ScoringError::DimensionMismatch {
                expected: dims,
                actual: bad.len(),
            });
        }

        let anchors: Vec<RoleAnchor> = roles
            .iter()
            .zip(vectors.iter())
            .map(|(role, embedding)| RoleAnchor {
                role_id: role.id.clone(),
                description: role.description.clone(),
                embedding: embedding.clone(),
            })
            .collect();

        tracing::info!(
            "Computed {} role anchors with {} ({} dims) in {:?}",
            anchors.len(),
            model.model_id(),
            dims,
            start.elapsed()
        );

        Ok(Self {
            model,
            roles,
            anchors,
            anchor_vectors: vectors,
            normalizer,
            config,
        })
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn anchors(&self) -> &[RoleAnchor] {
        &self.anchors
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Score one document
    ///
    /// A document with fewer than `min_sentences` qualifying sentences returns
    /// `Ok` with a uniform, degraded result (see `ScoringResult::is_degraded`).
    /// Any embedding failure is returned as `Err` untouched; nothing is retried.
    pub fn score(&self, text: &str) -> Result<ScoringResult, ScoringError> {
        let start = Instant::now();
        let sentences = extract_sentences(text, &self.config.extraction);

        if sentences.len() < self.config.min_sentences {
            tracing::warn!(
                "Only {} substantive sentences (need {}); returning uniform scores",
                sentences.len(),
                self.config.min_sentences
            );
            return Ok(self.insufficient_input(sentences.len()));
        }

        let texts: Vec<String> = sentences.iter().map(|s| s.text.clone()).collect();
        let vectors = self.model.embed_batch(&texts)?;
        self.check_sentence_vectors(&vectors, texts.len())?;
        let embedding_dim = vectors.first().map(Vec::len).unwrap_or(0);

        let matrix = SimilarityMatrix::compute(&vectors, &self.anchor_vectors);

        let raw: Vec<f64> = (0..self.anchors.len())
            .map(|role| aggregate(&matrix.column(role), &self.config.attention))
            .collect();
        let probabilities = self.normalizer.normalize(&raw);

        let dominant = argmax(&probabilities).unwrap_or(0);
        let role_ids: Vec<&str> = self.roles.ids().collect();

        let top_sentences: Vec<String> =
            select_evidence(&matrix, dominant, self.config.evidence_count)
                .into_iter()
                .map(|i| sentences[i].text.clone())
                .collect();
        let sentence_scores = sentence_breakdown(&matrix, &sentences, &role_ids);

        tracing::debug!(
            sentences = sentences.len(),
            dominant = role_ids[dominant],
            confidence = probabilities[dominant],
            "Scored document in {:?}",
            start.elapsed()
        );

        Ok(ScoringResult {
            scores: RoleScores::from_parts(role_ids.iter().copied(), &probabilities),
            dominant_role: role_ids[dominant].to_string(),
            confidence: probabilities[dominant],
            top_sentences,
            total_sentences: sentences.len(),
            sentence_scores,
            embedding_dim,
            raw_scores: RoleScores::from_parts(role_ids.iter().copied(), &raw),
            error: None,
        })
    }

    fn check_sentence_vectors(
        &self,
        vectors: &[Vec<f32>],
        expected: usize,
    ) -> Result<(), ScoringError> {
        if vectors.len() != expected {
            return Err(ScoringError::BatchSizeMismatch {
                expected,
                actual: vectors.len(),
            });
        }

        let anchor_dims = self.anchor_vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != anchor_dims) {
            return Err(ScoringError::DimensionMismatch {
                expected: anchor_dims,
                actual: bad.len(),
            });
        }
        Ok(())
    }

    fn insufficient_input(&self, total_sentences: usize) -> ScoringResult {
        let uniform = 1.0 / self.roles.len() as f64;
        let ids: Vec<&str> = self.roles.ids().collect();

        ScoringResult {
            scores: RoleScores::from_parts(ids.iter().copied(), &vec![uniform; ids.len()]),
            dominant_role: UNKNOWN_ROLE.to_string(),
            confidence: uniform,
            top_sentences: Vec::new(),
            total_sentences,
            sentence_scores: Vec::new(),
            embedding_dim: 0,
            raw_scores: RoleScores::from_parts(ids.iter().copied(), &vec![0.0; ids.len()]),
            error: Some(format!(
                "Document too short (<{} substantive sentences)",
                self.config.min_sentences
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::{HashingModel, ModelError, StubModel};
    use crate::roles::RoleDefinition;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BUILDER_DOCUMENT: &str = "\
Creates innovative solutions and drives strategic vision for the platform.
Architects scalable systems and establishes technical direction for engineering.
Focuses on long-term product thinking and builds foundational infrastructure.
Drives strategic vision and creates innovative solutions across product lines.
Builds foundational infrastructure and architects scalable systems from scratch.
Establishes technical direction and focuses on long-term product thinking.
Creates innovative platform solutions that drive strategic product vision.
Architects foundational infrastructure and scalable systems for long-term growth.
Establishes strategic technical direction and builds innovative infrastructure.
Drives long-term vision by architecting scalable foundational systems.
The office kitchen was renovated during the spring of last year.
Weekend hobbies include hiking mountain trails and photographing birds.
Our cafeteria serves soup on most Tuesdays around noon.
Volunteered at the local library sorting donated novels.
Enjoys reading historical fiction about ancient maritime voyages.
";

    fn hashing_scorer() -> RoleScorer {
        RoleScorer::with_defaults(Arc::new(HashingModel::new())).unwrap()
    }

    /// Counts calls and delegates to a hashing model
    struct CountingModel {
        inner: HashingModel,
        batch_calls: AtomicUsize,
        single_calls: AtomicUsize,
    }

    impl CountingModel {
        fn new() -> Self {
            Self {
                inner: HashingModel::new(),
                batch_calls: AtomicUsize::new(0),
                single_calls: AtomicUsize::new(0),
            }
        }
    }

    impl EmbeddingModel for CountingModel {
        fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
            self.single_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(text)
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            texts.iter().map(|t| self.inner.embed(t)).collect()
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }

        fn model_id(&self) -> &str {
            "counting"
        }
    }

    /// Embeds anchors fine, then fails on the first document
    struct FailingModel {
        calls: AtomicUsize,
        fail_from_call: usize,
    }

    impl EmbeddingModel for FailingModel {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
            Ok(vec![1.0, 0.0])
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.fail_from_call {
                return Err(ModelError::Inference("backend unavailable".into()));
            }
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model_id(&self) -> &str {
            "failing"
        }
    }

    /// Returns vectors of a different width for documents than for anchors
    struct ShiftingDimsModel {
        calls: AtomicUsize,
    }

    impl EmbeddingModel for ShiftingDimsModel {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
            Ok(vec![1.0; 4])
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
            let dims = if self.calls.fetch_add(1, Ordering::SeqCst) == 0 { 4 } else { 8 };
            Ok(texts.iter().map(|_| vec![1.0; dims]).collect())
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn model_id(&self) -> &str {
            "shifting"
        }
    }

    #[test]
    fn test_insufficient_input_is_uniform() {
        let scorer = hashing_scorer();
        let text = "Led the migration of the billing platform to the cloud.\n\
                    Hired and mentored four engineers on the payments team.\n\
                    Wrote the incident response playbook used by every squad.\n\
                    Python, Go\nPhone: 555-0100";

        let result = scorer.score(text).unwrap();

        assert!(result.is_degraded());
        assert_eq!(result.total_sentences, 3);
        assert_eq!(result.dominant_role, UNKNOWN_ROLE);
        assert_eq!(result.confidence, 0.25);
        assert!(result.top_sentences.is_empty());
        assert!(result.sentence_scores.is_empty());
        assert_eq!(result.embedding_dim, 0);
        for role in ["Builder", "Enabler", "Thriver", "Supportee"] {
            assert_eq!(result.scores.get(role), Some(0.25));
        }
        assert!(result.error.unwrap().contains("<5"));
    }

    #[test]
    fn test_insufficient_input_skips_provider() {
        let model = Arc::new(CountingModel::new());
        let scorer = RoleScorer::with_defaults(model.clone()).unwrap();
        assert_eq!(model.batch_calls.load(Ordering::SeqCst), 1);

        scorer.score("Too short to score").unwrap();
        assert_eq!(model.batch_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_builder_paraphrases_dominate() {
        let scorer = hashing_scorer();
        let result = scorer.score(BUILDER_DOCUMENT).unwrap();

        assert!(!result.is_degraded());
        assert_eq!(result.total_sentences, 15);
        assert_eq!(result.dominant_role, "Builder");

        let builder = result.scores.get("Builder").unwrap();
        for role in ["Enabler", "Thriver", "Supportee"] {
            assert!(builder > result.scores.get(role).unwrap());
        }
        assert_eq!(result.confidence, builder);
    }

    #[test]
    fn test_result_invariants() {
        let scorer = hashing_scorer();
        let result = scorer.score(BUILDER_DOCUMENT).unwrap();

        assert!((result.scores.total() - 1.0).abs() < 1e-6);
        assert!(result.scores.values().all(|p| p > 0.0));
        assert_eq!(result.embedding_dim, HashingModel::new().dimensions());
        assert_eq!(result.sentence_scores.len(), result.total_sentences);
        assert_eq!(result.raw_scores.len(), 4);
        assert!(result.error.is_none());

        for (i, record) in result.sentence_scores.iter().enumerate() {
            assert_eq!(record.index, i);
            let (role, score) = record.role_scores.best().unwrap();
            assert_eq!(record.best_match_role, role);
            assert_eq!(record.best_match_score, score);
            assert!(record.role_scores.values().all(|s| (-1.0..=1.0).contains(&s)));
        }
    }

    #[test]
    fn test_evidence_is_top_three_for_dominant_role() {
        let scorer = hashing_scorer();
        let result = scorer.score(BUILDER_DOCUMENT).unwrap();
        assert_eq!(result.top_sentences.len(), 3);

        let builder_sim = |text: &str| {
            result
                .sentence_scores
                .iter()
                .find(|r| r.sentence == text)
                .and_then(|r| r.role_scores.get("Builder"))
                .unwrap()
        };

        let mut all: Vec<f64> = result
            .sentence_scores
            .iter()
            .map(|r| r.role_scores.get("Builder").unwrap())
            .collect();
        all.sort_by(|a, b| b.total_cmp(a));

        let picked: Vec<f64> = result
            .top_sentences
            .iter()
            .map(|t| builder_sim(t.as_str()))
            .collect();
        assert_eq!(picked, all[..3].to_vec());
    }

    #[test]
    fn test_one_batch_call_per_document() {
        let model = Arc::new(CountingModel::new());
        let scorer = RoleScorer::with_defaults(model.clone()).unwrap();

        scorer.score(BUILDER_DOCUMENT).unwrap();
        scorer.score(BUILDER_DOCUMENT).unwrap();

        // One for anchors, one per document
        assert_eq!(model.batch_calls.load(Ordering::SeqCst), 3);
        assert_eq!(model.single_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_provider_failure_propagates() {
        let model = Arc::new(FailingModel {
            calls: AtomicUsize::new(0),
            fail_from_call: 1,
        });
        let scorer = RoleScorer::with_defaults(model).unwrap();

        let err = scorer.score(BUILDER_DOCUMENT).unwrap_err();
        assert!(matches!(err, ScoringError::Provider(ModelError::Inference(_))));
    }

    #[test]
    fn test_provider_failure_at_construction() {
        let model = Arc::new(FailingModel {
            calls: AtomicUsize::new(0),
            fail_from_call: 0,
        });
        let err = RoleScorer::with_defaults(model).unwrap_err();
        assert!(matches!(err, ScoringError::Provider(_)));
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let model = Arc::new(ShiftingDimsModel {
            calls: AtomicUsize::new(0),
        });
        let scorer = RoleScorer::with_defaults(model).unwrap();
        let err = scorer.score(BUILDER_DOCUMENT).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::DimensionMismatch {
                expected: 4,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_malformed_roles_rejected_before_scoring() {
        let err = RoleSet::new(vec![RoleDefinition::new("Only", "A single role")])
            .map_err(ScoringError::from)
            .unwrap_err();
        assert!(matches!(err, ScoringError::MalformedRoleConfig(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScoringConfig {
            temperature: 0.0,
            ..Default::default()
        };
        let err = RoleScorer::new(Arc::new(StubModel::new()), RoleSet::default(), config)
            .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidConfig(_)));

        let config = ScoringConfig {
            min_sentences: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_two_role_taxonomy() {
        let roles = RoleSet::new(vec![
            RoleDefinition::new("Gardener", "Grows vegetables and tends flower beds in the garden"),
            RoleDefinition::new("Sailor", "Navigates boats across the open ocean and trims sails"),
        ])
        .unwrap();
        let scorer =
            RoleScorer::new(Arc::new(HashingModel::new()), roles, ScoringConfig::default()).unwrap();

        let text = "Grows vegetables in the community garden every summer.\n\
                    Tends flower beds and vegetables for the neighborhood garden.\n\
                    Planted tomatoes and tends the vegetables each morning.\n\
                    Designed new flower beds for the botanical garden.\n\
                    Harvests vegetables from the garden for local families.";
        let result = scorer.score(text).unwrap();

        assert_eq!(result.dominant_role, "Gardener");
        assert_eq!(result.scores.len(), 2);
        assert_eq!(scorer.anchors().len(), 2);
        assert_eq!(scorer.anchors()[1].role_id, "Sailor");
    }

    #[test]
    fn test_temperature_changes_confidence_not_verdict() {
        let sharp = RoleScorer::new(
            Arc::new(HashingModel::new()),
            RoleSet::default(),
            ScoringConfig {
                temperature: 0.5,
                ..Default::default()
            },
        )
        .unwrap();
        let flat = RoleScorer::new(
            Arc::new(HashingModel::new()),
            RoleSet::default(),
            ScoringConfig {
                temperature: 3.0,
                ..Default::default()
            },
        )
        .unwrap();

        let a = sharp.score(BUILDER_DOCUMENT).unwrap();
        let b = flat.score(BUILDER_DOCUMENT).unwrap();
        assert_eq!(a.dominant_role, b.dominant_role);
        assert_eq!(a.raw_scores, b.raw_scores);
        assert!(a.confidence > b.confidence);
    }

    #[test]
    fn test_shared_across_threads() {
        let scorer = Arc::new(hashing_scorer());
        let expected = scorer.score(BUILDER_DOCUMENT).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let scorer = Arc::clone(&scorer);
                    scope.spawn(move || scorer.score(BUILDER_DOCUMENT).unwrap())
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_deterministic() {
        let scorer = hashing_scorer();
        assert_eq!(
            scorer.score(BUILDER_DOCUMENT).unwrap(),
            scorer.score(BUILDER_DOCUMENT).unwrap()
        );
    }
}
