//! Evidence selection and per-sentence breakdown
//!
//! Evidence is chosen from raw cosine similarity to the dominant role, not
//! from the normalized distribution. The per-sentence breakdown tags each
//! sentence with its own best role, independent of the document verdict.

use super::similarity::SimilarityMatrix;
use super::types::{RoleScores, Sentence, SentenceScore, UNKNOWN_ROLE};

/// Default number of evidence sentences
pub const DEFAULT_EVIDENCE_COUNT: usize = 3;

/// Indices of the `count` sentences most similar to `role`, strongest first
///
/// Ties keep source order.
pub fn select_evidence(matrix: &SimilarityMatrix, role: usize, count: usize) -> Vec<usize> {
    let column = matrix.column(role);
    let mut ranked: Vec<usize> = (0..column.len()).collect();
    // Stable sort: equal similarities stay in sentence order
    ranked.sort_by(|&a, &b| column[b].total_cmp(&column[a]));
    ranked.truncate(count);
    ranked
}

/// One `SentenceScore` per sentence, across all roles
pub fn sentence_breakdown(
    matrix: &SimilarityMatrix,
    sentences: &[Sentence],
    role_ids: &[&str],
) -> Vec<SentenceScore> {
    sentences
        .iter()
        .enumerate()
        .map(|(row, sentence)| {
            let values: Vec<f64> = matrix.row(row).iter().map(|&s| s as f64).collect();
            let role_scores = RoleScores::from_parts(role_ids.iter().copied(), &values);
            let (best_role, best_score) = role_scores
                .best()
                .map(|(id, score)| (id.to_string(), score))
                .unwrap_or_else(|| (UNKNOWN_ROLE.to_string(), 0.0));

            SentenceScore {
                sentence: sentence.text.clone(),
                index: sentence.index,
                role_scores,
                best_match_role: best_role,
                best_match_score: best_score,
            }
        })
        .collect()
}
