//! Writing analyses to disk
//!
//! Two files can be produced per run: the full analysis as pretty JSON, and a
//! sentence-level export meant for offline inspection of which sentences drove
//! the verdict.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::pipeline::Analysis;
use crate::scoring::{RoleScores, ScoringResult, SentenceScore};

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ExportSummary<'a> {
    dominant_role: &'a str,
    confidence: f64,
    scores: &'a RoleScores,
    total_sentences: usize,
    embedding_dimension: usize,
    exported_at: String,
}

#[derive(Debug, Serialize)]
struct SentenceExport<'a> {
    analysis: ExportSummary<'a>,
    sentence_scores: &'a [SentenceScore],
}

fn write_pretty(path: &Path, value: &impl Serialize) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(io_err)?;
    Ok(())
}

/// Save the complete analysis as pretty-printed JSON
pub fn save_analysis(path: &Path, analysis: &Analysis) -> Result<(), ExportError> {
    write_pretty(path, analysis)?;
    tracing::debug!("Saved analysis to {:?}", path);
    Ok(())
}

/// Save per-sentence scores with a short analysis header
///
/// Returns `Ok(None)` without touching the filesystem when the result carries
/// no sentence scores (a degraded result), otherwise the written path.
pub fn export_sentence_scores(
    path: &Path,
    result: &ScoringResult,
) -> Result<Option<PathBuf>, ExportError> {
    if result.sentence_scores.is_empty() {
        tracing::warn!("No sentence scores to export");
        return Ok(None);
    }

    let export = SentenceExport {
        analysis: ExportSummary {
            dominant_role: &result.dominant_role,
            confidence: result.confidence,
            scores: &result.scores,
            total_sentences: result.total_sentences,
            embedding_dimension: result.embedding_dim,
            exported_at: Utc::now().to_rfc3339(),
        },
        sentence_scores: &result.sentence_scores,
    };

    write_pretty(path, &export)?;
    tracing::info!(
        "Exported {} sentence scores to {:?}",
        result.sentence_scores.len(),
        path
    );
    Ok(Some(path.to_path_buf()))
}
