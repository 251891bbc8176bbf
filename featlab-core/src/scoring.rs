//! Scorer traits consumed by the filters.
//!
//! The engine does not compute statistics itself. Association and
//! significance are injected, so the statistical primitives live with the
//! caller (see `featlab-runner::stats`). Both traits are implemented for
//! plain closures, which keeps tests short.

/// Symmetric association between two columns.
///
/// Must return a value comparable against the colinearity cutoff, usually a
/// correlation magnitude in `[0, 1]`. The filters compare its absolute value.
pub trait AssociationScorer: Send + Sync {
    fn score(&self, a: &[f64], b: &[f64]) -> f64;
}

impl<F> AssociationScorer for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    fn score(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

/// Result of a permutation-based significance test.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceOutcome {
    /// Fit quality of the unpermuted data.
    pub fit_score: f64,
    /// Fit quality under each permutation of the target.
    pub permutation_scores: Vec<f64>,
    /// Fraction of permutations at least as good as the real fit.
    pub p_value: f64,
}

/// Significance of one column as a predictor of the target.
///
/// Implementations must be deterministic for a given `seed`.
pub trait SignificanceScorer: Send + Sync {
    fn evaluate(&self, values: &[f64], target: &[f64], seed: u64) -> SignificanceOutcome;
}

impl<F> SignificanceScorer for F
where
    F: Fn(&[f64], &[f64], u64) -> SignificanceOutcome + Send + Sync,
{
    fn evaluate(&self, values: &[f64], target: &[f64], seed: u64) -> SignificanceOutcome {
        self(values, target, seed)
    }
}
