//! Redundancy screening by pairwise association.
//!
//! Two modes share one comparison rule: a pair is redundant when
//! `|score| >= cutoff` (a NaN score counts as redundant).
//! - Global collinearity cleans the raw input once. Columns are visited in
//!   ascending name order and a column survives only if it is below the cutoff
//!   against every earlier survivor, so the later name of a collinear pair goes.
//! - Cleaning also drops constant columns before comparing anything.
//! - Parent collinearity screens one candidate against a reference set, which
//!   is the whole accepted set rather than just the candidate's parents.

use std::collections::HashSet;

use crate::domain::{Parameter, ParameterTable};
use crate::scoring::AssociationScorer;

use super::{is_degenerate, RejectReason, Rejection};

/// Outcome of global collinearity cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanResult {
    /// Surviving names, in table order.
    pub kept: Vec<String>,
    /// Dropped columns, constant or with the survivor they collided with.
    pub dropped: Vec<Rejection>,
}

pub struct RedundancyFilter<'a> {
    scorer: &'a dyn AssociationScorer,
    cutoff: f64,
}

impl<'a> RedundancyFilter<'a> {
    pub fn new(scorer: &'a dyn AssociationScorer, cutoff: f64) -> Self {
        Self { scorer, cutoff }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn is_redundant(&self, score: f64) -> bool {
        !(score.abs() < self.cutoff)
    }

    /// Global collinearity over every column of `table`.
    pub fn clean(&self, table: &ParameterTable) -> CleanResult {
        let mut by_name: Vec<&Parameter> = table.iter().collect();
        by_name.sort_by(|a, b| a.name.cmp(&b.name));

        let mut survivors: Vec<&Parameter> = Vec::with_capacity(by_name.len());
        let mut dropped = Vec::new();
        for p in by_name {
            let verdict = if is_degenerate(&p.values) {
                Err(RejectReason::Degenerate {
                    value: p.values.first().copied().unwrap_or(f64::NAN),
                })
            } else {
                self.screen(&p.values, survivors.iter().copied())
            };
            match verdict {
                Ok(()) => survivors.push(p),
                Err(reason) => dropped.push(Rejection {
                    candidate: p.name.clone(),
                    round: 0,
                    reason,
                }),
            }
        }

        let keep: HashSet<&str> = survivors.iter().map(|p| p.name.as_str()).collect();
        let kept = table
            .names()
            .filter(|n| keep.contains(n))
            .map(String::from)
            .collect();
        CleanResult { kept, dropped }
    }

    /// Parent collinearity: reject `values` if it is redundant with any
    /// reference column. The first offending column (in reference order) is
    /// reported.
    pub fn screen<'t>(
        &self,
        values: &[f64],
        reference: impl IntoIterator<Item = &'t Parameter>,
    ) -> Result<(), RejectReason> {
        for other in reference {
            let score = self.scorer.score(values, &other.values);
            if self.is_redundant(score) {
                return Err(RejectReason::Collinear {
                    with: other.name.clone(),
                    score,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{abs_corr, raw_table as table};

    #[test]
    fn clean_drops_lexicographically_later_of_collinear_pair() {
        let t = table(vec![
            ("zeta", vec![1.0, 2.0, 3.0, 4.0]),
            ("alpha", vec![2.0, 4.0, 6.0, 8.0]),
            ("mid", vec![1.0, -1.0, -1.0, 1.0]),
        ]);
        let filter = RedundancyFilter::new(&abs_corr, 0.7);
        let result = filter.clean(&t);
        assert_eq!(result.kept, vec!["alpha".to_string(), "mid".to_string()]);
        assert_eq!(result.dropped.len(), 1);
        assert_eq!(result.dropped[0].candidate, "zeta");
        assert!(matches!(
            &result.dropped[0].reason,
            RejectReason::Collinear { with, .. } if with == "alpha"
        ));
    }

    #[test]
    fn clean_keeps_table_order() {
        let t = table(vec![
            ("c", vec![1.0, 0.0, 0.0]),
            ("a", vec![0.0, 1.0, 0.0]),
            ("b", vec![0.0, 0.0, 1.0]),
        ]);
        // Pairwise |r| = 0.5 for these indicator columns.
        let result = RedundancyFilter::new(&abs_corr, 0.7).clean(&t);
        assert_eq!(result.kept, vec!["c", "a", "b"]);
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn clean_drops_constant_columns() {
        let t = table(vec![
            ("x", vec![1.0, -1.0, 1.0, -1.0]),
            ("ones", vec![1.0, 1.0, 1.0, 1.0]),
            ("twos", vec![2.0, 2.0, 2.0, 2.0]),
        ]);
        let result = RedundancyFilter::new(&abs_corr, 0.7).clean(&t);
        assert_eq!(result.kept, vec!["x"]);
        let dropped: Vec<&str> = result.dropped.iter().map(|r| r.candidate.as_str()).collect();
        assert_eq!(dropped, vec!["ones", "twos"]);
        assert!(result
            .dropped
            .iter()
            .all(|r| matches!(r.reason, RejectReason::Degenerate { .. })));
    }

    #[test]
    fn cutoff_is_inclusive() {
        let exactly = |_: &[f64], _: &[f64]| 0.7;
        let filter = RedundancyFilter::new(&exactly, 0.7);
        let reference = [Parameter::raw("a", vec![1.0])];
        assert!(filter.screen(&[1.0], reference.iter()).is_err());

        let below = |_: &[f64], _: &[f64]| 0.699;
        let filter = RedundancyFilter::new(&below, 0.7);
        assert!(filter.screen(&[1.0], reference.iter()).is_ok());
    }

    #[test]
    fn negative_scores_compare_by_magnitude() {
        let anti = |_: &[f64], _: &[f64]| -0.95;
        let filter = RedundancyFilter::new(&anti, 0.7);
        let reference = [Parameter::raw("a", vec![1.0])];
        assert!(filter.screen(&[1.0], reference.iter()).is_err());
    }

    #[test]
    fn nan_score_is_redundant() {
        let nan = |_: &[f64], _: &[f64]| f64::NAN;
        assert!(RedundancyFilter::new(&nan, 0.7).is_redundant(f64::NAN));
    }

    #[test]
    fn screen_reports_first_collinear_reference() {
        let t = table(vec![
            ("a", vec![1.0, 2.0, 3.0, 4.0]),
            ("b", vec![4.0, 3.0, 2.0, 1.0]),
        ]);
        let filter = RedundancyFilter::new(&abs_corr, 0.7);
        let err = filter.screen(&[2.0, 4.0, 6.0, 8.5], t.iter()).unwrap_err();
        assert!(matches!(err, RejectReason::Collinear { ref with, .. } if with == "a"));
        assert!(filter.screen(&[1.0, -1.0, -1.0, 1.0], t.iter()).is_ok());
    }
}
