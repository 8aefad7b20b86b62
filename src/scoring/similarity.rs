//! Sentence × role cosine similarity

/// Calculate cosine similarity between two vectors
///
/// Returns 0.0 when either vector has zero magnitude, the lengths differ, or a
/// component is not finite, and clamps the result to [-1, 1] to absorb rounding error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    // Accumulate in f64 so large provider components cannot overflow to inf
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if !similarity.is_finite() {
        return 0.0;
    }
    similarity.clamp(-1.0, 1.0) as f32
}

/// Dense N × R similarity table, row-major by sentence
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl SimilarityMatrix {
    /// Compare every sentence vector with every anchor vector
    pub fn compute(sentences: &[Vec<f32>], anchors: &[Vec<f32>]) -> Self {
        let mut values = Vec::with_capacity(sentences.len() * anchors.len());
        for sentence in sentences {
            for anchor in anchors {
                values.push(cosine_similarity(sentence, anchor));
            }
        }

        Self {
            values,
            rows: sentences.len(),
            cols: anchors.len(),
        }
    }

    /// Number of sentences
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of roles
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, sentence: usize, role: usize) -> f32 {
        self.values[sentence * self.cols + role]
    }

    /// Similarities of one sentence to every role, in role order
    pub fn row(&self, sentence: usize) -> &[f32] {
        let start = sentence * self.cols;
        &self.values[start..start + self.cols]
    }

    /// Similarities of every sentence to one role, in sentence order
    pub fn column(&self, role: usize) -> Vec<f32> {
        (0..self.rows).map(|s| self.get(s, role)).collect()
    }
}
