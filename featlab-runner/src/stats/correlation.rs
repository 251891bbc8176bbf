//! Pearson correlation and association scorers.

use featlab_core::AssociationScorer;

/// Pearson correlation coefficient of two equal-length columns.
///
/// Returns `None` for fewer than two samples or when either column has zero
/// variance, where the coefficient is undefined.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mean_a = a.iter().sum::<f64>() / nf;
    let mean_b = b.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    // Rounding can push |r| a hair above 1 for exactly linear columns.
    Some((cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

/// Squared Pearson correlation (coefficient of determination of a linear fit).
///
/// A constant column has no linear association with anything and scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredPearson;

impl AssociationScorer for SquaredPearson {
    fn score(&self, a: &[f64], b: &[f64]) -> f64 {
        pearson(a, b).map_or(0.0, |r| r * r)
    }
}

/// Absolute Pearson correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsPearson;

impl AssociationScorer for AbsPearson {
    fn score(&self, a: &[f64], b: &[f64]) -> f64 {
        pearson(a, b).map_or(0.0, f64::abs)
    }
}
