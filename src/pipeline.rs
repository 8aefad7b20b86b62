//! End-to-end analysis: score a document, then summarize it
//!
//! Wraps a `RoleScorer` and a `SummaryGenerator` built over the same role
//! set, so the summary template always matches the dominant role the scorer
//! reports.

use std::sync::Arc;

use serde::Serialize;

use crate::embed::EmbeddingModel;
use crate::roles::RoleSet;
use crate::scoring::{RoleScorer, ScoringConfig, ScoringError, ScoringResult};
use crate::summary::{ProfileMetadata, Summary, SummaryGenerator};

/// Everything produced for one document
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub scoring: ScoringResult,
    /// Absent when the document was too short to score
    pub summary: Option<Summary>,
    pub metadata: ProfileMetadata,
    pub model_id: String,
}

#[derive(Debug)]
pub struct RoleColorPipeline {
    scorer: RoleScorer,
    generator: SummaryGenerator,
}

impl RoleColorPipeline {
    pub fn new(
        model: Arc<dyn EmbeddingModel>,
        roles: RoleSet,
        config: ScoringConfig,
    ) -> Result<Self, ScoringError> {
        let generator = SummaryGenerator::new(roles.clone());
        let scorer = RoleScorer::new(model, roles, config)?;
        Ok(Self { scorer, generator })
    }

    pub fn with_defaults(model: Arc<dyn EmbeddingModel>) -> Result<Self, ScoringError> {
        Self::new(model, RoleSet::default_taxonomy(), ScoringConfig::default())
    }

    pub fn scorer(&self) -> &RoleScorer {
        &self.scorer
    }

    pub fn analyze(&self, text: &str) -> Result<Analysis, ScoringError> {
        let scoring = self.scorer.score(text)?;
        let metadata = ProfileMetadata::extract(text);
        let summary = self.generator.generate(&scoring, &metadata);

        if let Some(summary) = &summary {
            tracing::debug!("Generated {} summary ({} chars)", summary.role, summary.text.len());
        }

        Ok(Analysis {
            scoring,
            summary,
            metadata,
            model_id: self.scorer.model_id().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::HashingModel;

    const PROFILE: &str = "\
Principal Platform Engineer
Platform engineer with 9 years of experience building Rust and Kafka systems.
Architects scalable systems and establishes technical direction for engineering.
Creates innovative solutions and drives strategic vision for the platform.
Builds foundational infrastructure and architects scalable systems from scratch.
Establishes strategic technical direction and builds innovative infrastructure.
Drives long-term vision by architecting scalable foundational systems.
";

    fn pipeline() -> RoleColorPipeline {
        RoleColorPipeline::with_defaults(Arc::new(HashingModel::new())).unwrap()
    }

    #[test]
    fn test_analyze_produces_matching_summary() {
        let analysis = pipeline().analyze(PROFILE).unwrap();

        assert!(!analysis.scoring.is_degraded());
        let summary = analysis.summary.expect("summary for scored document");
        assert_eq!(summary.role, analysis.scoring.dominant_role);
        assert!(summary.text.contains("with 9 years of experience"));
        assert!(!summary.text.contains('{'));

        assert_eq!(analysis.metadata.title.as_deref(), Some("Principal Platform Engineer"));
        assert_eq!(analysis.metadata.skills, vec!["Rust", "Kafka"]);
        assert_eq!(analysis.model_id, "hashing-256");
    }

    #[test]
    fn test_short_document_has_no_summary() {
        let analysis = pipeline().analyze("Just one line about nothing much at all.").unwrap();
        assert!(analysis.scoring.is_degraded());
        assert!(analysis.summary.is_none());
    }

    #[test]
    fn test_analysis_serializes() {
        let analysis = pipeline().analyze(PROFILE).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["scoring"]["scores"].is_object());
        assert_eq!(json["summary"]["method"], "template");
        assert_eq!(json["metadata"]["years"], "9");
        assert!(json["metadata"]["original_summary"].is_null());
    }

    #[test]
    fn test_analyze_keeps_original_summary() {
        let text = format!(
            "Summary\nBuilds platforms that other teams rely on.\nExperience\n{}",
            PROFILE
        );
        let analysis = pipeline().analyze(&text).unwrap();
        assert_eq!(
            analysis.metadata.original_summary.as_deref(),
            Some("Builds platforms that other teams rely on.")
        );
        assert!(analysis.summary.is_some());
    }
}
