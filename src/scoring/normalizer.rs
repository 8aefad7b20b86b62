//! Temperature-scaled softmax normalization

/// Default softmax temperature
pub const DEFAULT_TEMPERATURE: f64 = 1.2;

/// Convert raw scores into a probability distribution
///
/// Scores are divided by `temperature`, shifted by their maximum for
/// numerical stability, exponentiated and divided by the sum. Each
/// exponential is floored at `f64::MIN_POSITIVE`, so no probability is ever
/// exactly zero however far apart the inputs are.
///
/// Callers must pass a finite `temperature > 0` (see `Normalizer::new`).
pub fn softmax(raw: &[f64], temperature: f64) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }

    // Shift before scaling: dividing first can overflow to inf - inf
    let max = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let exps: Vec<f64> = raw
        .iter()
        .map(|r| ((r - max) / temperature).exp().max(f64::MIN_POSITIVE))
        .collect();
    let sum: f64 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first one wins on ties
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        match best {
            Some(b) if *v <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Validated softmax with a fixed temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    temperature: f64,
}

impl Normalizer {
    pub fn new(temperature: f64) -> Result<Self, String> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(format!(
                "temperature must be finite and > 0, got {}",
                temperature
            ));
        }
        Ok(Self { temperature })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn normalize(&self, raw: &[f64]) -> Vec<f64> {
        softmax(raw, self.temperature)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Output is a strictly positive distribution for any input
        #[test]
        fn softmax_is_distribution(
            raw in proptest::collection::vec(-1000.0f64..1000.0, 2..12),
            temperature in 0.05f64..50.0,
        ) {
            let probs = softmax(&raw, temperature);
            let sum: f64 = probs.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-6);
            for p in &probs {
                prop_assert!(*p > 0.0);
            }
        }

        /// Distinct raw scores keep their strict order
        #[test]
        fn softmax_preserves_order(
            raw in proptest::collection::vec(-10.0f64..10.0, 2..10),
            temperature in 0.5f64..5.0,
        ) {
            let probs = softmax(&raw, temperature);
            for i in 0..raw.len() {
                for j in 0..raw.len() {
                    if raw[i] - raw[j] > 1e-9 {
                        prop_assert!(probs[i] > probs[j]);
                    } else if raw[i] == raw[j] {
                        prop_assert_eq!(probs[i], probs[j]);
                    }
                }
            }
        }

        /// Raising temperature lowers the winner's probability
        #[test]
        fn higher_temperature_flattens(
            raw in proptest::collection::vec(-5.0f64..5.0, 2..8),
            t in 0.5f64..4.0,
            bump in 0.5f64..4.0,
        ) {
            let max = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let min = raw.iter().cloned().fold(f64::INFINITY, f64::min);
            prop_assume!(max - min > 1e-3);

            let low = softmax(&raw, t);
            let high = softmax(&raw, t + bump);
            let winner = argmax(&low).unwrap();
            prop_assert!(high[winner] < low[winner]);
        }
    }
}
