//! Permutation test of a single predictor against the target.
//!
//! The fit score is the R² of the least-squares line of the target on the
//! predictor. The target is shuffled `permutations` times (Fisher–Yates, from
//! a `StdRng` seeded with the run seed) and refitted each time. The p-value is
//! the add-one estimate `(#{perm ≥ fit} + 1) / (permutations + 1)`, which is
//! never 0 and is exactly 1 for a predictor with no spread.

use featlab_core::{SignificanceOutcome, SignificanceScorer};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::LinearFit;

pub const DEFAULT_PERMUTATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermutationTest {
    permutations: usize,
}

impl PermutationTest {
    pub fn new(permutations: usize) -> Self {
        Self { permutations }
    }

    pub fn permutations(&self) -> usize {
        self.permutations
    }

    /// Smallest p-value this test can report.
    pub fn resolution(&self) -> f64 {
        1.0 / (self.permutations + 1) as f64
    }
}

impl Default for PermutationTest {
    fn default() -> Self {
        Self::new(DEFAULT_PERMUTATIONS)
    }
}

fn fit_score(values: &[f64], target: &[f64]) -> f64 {
    LinearFit::fit(values, target).map_or(0.0, |fit| fit.r_squared)
}

impl SignificanceScorer for PermutationTest {
    fn evaluate(&self, values: &[f64], target: &[f64], seed: u64) -> SignificanceOutcome {
        let fit = fit_score(values, target);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut shuffled = target.to_vec();
        let permutation_scores: Vec<f64> = (0..self.permutations)
            .map(|_| {
                shuffled.shuffle(&mut rng);
                fit_score(values, &shuffled)
            })
            .collect();

        let at_least_as_good = permutation_scores.iter().filter(|&&s| s >= fit).count();
        SignificanceOutcome {
            fit_score: fit,
            permutation_scores,
            p_value: (at_least_as_good + 1) as f64 / (self.permutations + 1) as f64,
        }
    }
}
