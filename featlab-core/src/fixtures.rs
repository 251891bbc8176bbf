//! Reference scorers for tests and benchmarks.
//!
//! Production runs inject the scorers from `featlab-runner::stats`. These are
//! small, deterministic stand-ins so the engine can be exercised without the
//! runner crate.

use crate::domain::{Parameter, ParameterTable};
use crate::scoring::SignificanceOutcome;

/// Absolute Pearson correlation. Zero-variance input scores 0.
pub fn abs_corr(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let ma = a.iter().sum::<f64>() / n;
    let mb = b.iter().sum::<f64>() / n;
    let (mut sab, mut saa, mut sbb) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        sab += (x - ma) * (y - mb);
        saa += (x - ma) * (x - ma);
        sbb += (y - mb) * (y - mb);
    }
    if saa == 0.0 || sbb == 0.0 {
        return 0.0;
    }
    (sab / (saa * sbb).sqrt()).abs()
}

/// Significance that ignores the target: p shrinks as `|Σ values|` grows.
pub fn by_sum(values: &[f64], _target: &[f64], _seed: u64) -> SignificanceOutcome {
    let fit = values.iter().sum::<f64>().abs();
    SignificanceOutcome {
        fit_score: fit,
        permutation_scores: Vec::new(),
        p_value: 1.0 / (1.0 + fit),
    }
}

/// Raw table from `(name, values)` pairs.
///
/// # Panics
/// On duplicate names or unequal lengths.
pub fn raw_table<'a>(columns: impl IntoIterator<Item = (&'a str, Vec<f64>)>) -> ParameterTable {
    let mut table = ParameterTable::new();
    for (name, values) in columns {
        if let Err(err) = table.insert(Parameter::raw(name, values)) {
            panic!("invalid fixture table: {err}");
        }
    }
    table
}
