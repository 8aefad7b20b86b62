//! Rank-tiered attention aggregation
//!
//! Reduces one role's column of sentence similarities to a single raw score.
//! Similarities are sorted descending and split into top / middle / bottom
//! tiers by rank fraction; each tier's mean is weighted (top heaviest) and the
//! weighted sum is divided by the total weight.
//!
//! A document's strongest evidence for a role dominates, bulk filler cannot
//! dilute it, and a single weak sentence cannot erase it.

/// Guards tier rounding against representation error (0.3 * 10 != 3.0 exactly)
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Tier fractions and weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttentionConfig {
    /// Rank fraction closing the top tier (rounded up)
    pub top_fraction: f64,
    /// Rank fraction closing the middle tier (rounded down)
    pub middle_fraction: f64,
    pub top_weight: f64,
    pub middle_weight: f64,
    pub bottom_weight: f64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            top_fraction: 0.3,
            middle_fraction: 0.7,
            top_weight: 2.0,
            middle_weight: 1.0,
            bottom_weight: 0.5,
        }
    }
}

impl AttentionConfig {
    /// Check fractions are ordered within [0, 1] and weights are usable
    pub fn validate(&self) -> Result<(), String> {
        let fractions_ok = self.top_fraction.is_finite()
            && self.middle_fraction.is_finite()
            && 0.0 <= self.top_fraction
            && self.top_fraction <= self.middle_fraction
            && self.middle_fraction <= 1.0;
        if !fractions_ok {
            return Err(format!(
                "tier fractions must satisfy 0 <= top ({}) <= middle ({}) <= 1",
                self.top_fraction, self.middle_fraction
            ));
        }

        let weights = [self.top_weight, self.middle_weight, self.bottom_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(format!("tier weights must be finite and >= 0, got {:?}", weights));
        }
        if self.total_weight() <= 0.0 {
            return Err("tier weights must not all be zero".to_string());
        }

        Ok(())
    }

    pub fn total_weight(&self) -> f64 {
        self.top_weight + self.middle_weight + self.bottom_weight
    }
}

/// Exclusive end indices of the top and middle tiers for N sorted items
///
/// `top_end = ceil(N * top_fraction)`, `middle_end = floor(N * middle_fraction)`
/// (never before `top_end`), both clamped to N. Every role of a document goes
/// through this same function, so tiers line up across roles.
///
/// Small documents make the top tier tiny: at N = 5 it holds 2 sentences and
/// its mean swings with a single sentence. That variance is a property of the
/// scheme and is left as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBounds {
    pub top_end: usize,
    pub middle_end: usize,
}

impl TierBounds {
    pub fn for_len(n: usize, config: &AttentionConfig) -> Self {
        let scaled_top = n as f64 * config.top_fraction;
        let scaled_middle = n as f64 * config.middle_fraction;

        let top_end = ((scaled_top - BOUNDARY_EPSILON).ceil().max(0.0) as usize).min(n);
        let middle_end = ((scaled_middle + BOUNDARY_EPSILON).floor().max(0.0) as usize)
            .min(n)
            .max(top_end);

        Self {
            top_end,
            middle_end,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Aggregate one role's similarities into a raw score
///
/// Order of `similarities` is irrelevant. An empty slice scores exactly 0.
pub fn aggregate(similarities: &[f32], config: &AttentionConfig) -> f64 {
    if similarities.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f64> = similarities.iter().map(|&s| s as f64).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let bounds = TierBounds::for_len(sorted.len(), config);
    let top = mean(&sorted[..bounds.top_end]);
    let middle = mean(&sorted[bounds.top_end..bounds.middle_end]);
    let bottom = mean(&sorted[bounds.middle_end..]);

    tracing::trace!(
        n = sorted.len(),
        top_end = bounds.top_end,
        middle_end = bounds.middle_end,
        "Attention tiers"
    );

    (config.top_weight * top + config.middle_weight * middle + config.bottom_weight * bottom)
        / config.total_weight()
}
