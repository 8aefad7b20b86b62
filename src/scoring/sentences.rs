//! Sentence extraction
//!
//! Turns raw document text into the ordered list of candidate sentences that
//! get embedded. Filtering is heuristic on purpose: resumes are full of
//! headers, contact lines and skill lists that carry no behavioral signal.

use std::sync::OnceLock;

use regex::Regex;

use super::types::Sentence;

/// Phrases that mark a fragment as boilerplate (matched case-insensitively)
///
/// Contact details and bare section labels. A fragment containing any of
/// these anywhere is dropped, so keep entries specific.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "references available",
    "upon request",
    "email:",
    "phone:",
    "education:",
    "skills:",
    "experience:",
    "summary:",
    "linkedin.com",
];

/// Filtering rules for candidate sentences
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRules {
    /// Minimum whitespace-separated words
    pub min_words: usize,
    /// Alphabetic characters / all characters must exceed this
    pub min_alpha_ratio: f64,
    /// Lowercase phrases that disqualify a fragment
    pub boilerplate: Vec<String>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            min_words: 5,
            min_alpha_ratio: 0.4,
            boilerplate: BOILERPLATE_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ExtractionRules {
    /// Whether a trimmed fragment qualifies as a candidate sentence
    pub fn accepts(&self, fragment: &str) -> bool {
        if fragment.split_whitespace().count() < self.min_words {
            return false;
        }
        if alpha_ratio(fragment) <= self.min_alpha_ratio {
            return false;
        }
        !self.is_boilerplate(fragment)
    }

    pub fn is_boilerplate(&self, fragment: &str) -> bool {
        let lower = fragment.to_lowercase();
        self.boilerplate.iter().any(|p| lower.contains(p.as_str()))
    }
}

/// Fraction of characters that are alphabetic (0 for empty input)
pub fn alpha_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let alpha = text.chars().filter(|c| c.is_alphabetic()).count();
    alpha as f64 / total as f64
}

fn bullet_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-•*]\s*").expect("valid bullet regex"))
}

fn terminal_punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("valid terminal punctuation regex"))
}

/// Extract qualifying sentences in order of first appearance
pub fn extract_sentences(text: &str, rules: &ExtractionRules) -> Vec<Sentence> {
    let mut sentences = Vec::new();

    for (line_idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let line = bullet_prefix().replace(line, "");
        let line = line.trim();

        for fragment in terminal_punctuation().split(line) {
            let fragment = fragment.trim();
            if fragment.is_empty() || !rules.accepts(fragment) {
                continue;
            }
            sentences.push(Sentence {
                text: fragment.to_string(),
                index: sentences.len(),
                line_number: line_idx + 1,
            });
        }
    }

    tracing::debug!("Extracted {} candidate sentences", sentences.len());
    sentences
}
