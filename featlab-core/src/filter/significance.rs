//! Significance screening against direct parents.
//!
//! A candidate is accepted iff its p-value is strictly below the p-value of
//! every parent. Parent p-values come from the [`SignificanceRecord`], which
//! holds the baseline for the cleaned input and every accepted candidate.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::domain::ParameterTable;
use crate::scoring::SignificanceScorer;

use super::RejectReason;

/// Parameter name → p-value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignificanceRecord {
    p_values: BTreeMap<String, f64>,
}

impl SignificanceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.p_values.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, p_value: f64) {
        self.p_values.insert(name.into(), p_value);
    }

    /// Keep only entries whose name satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.p_values.retain(|name, _| keep(name));
    }

    pub fn len(&self) -> usize {
        self.p_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p_values.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.p_values.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

pub struct SignificanceFilter<'a> {
    scorer: &'a dyn SignificanceScorer,
    target: &'a [f64],
    seed: u64,
}

impl<'a> SignificanceFilter<'a> {
    pub fn new(scorer: &'a dyn SignificanceScorer, target: &'a [f64], seed: u64) -> Self {
        Self {
            scorer,
            target,
            seed,
        }
    }

    /// p-value of `values` as a predictor of the target.
    pub fn p_value(&self, values: &[f64]) -> f64 {
        self.scorer.evaluate(values, self.target, self.seed).p_value
    }

    /// p-values for every column of `table`, evaluated in parallel.
    pub fn baseline(&self, table: &ParameterTable) -> SignificanceRecord {
        let scored: Vec<(String, f64)> = table
            .as_slice()
            .par_iter()
            .map(|p| (p.name.clone(), self.p_value(&p.values)))
            .collect();
        let mut record = SignificanceRecord::new();
        for (name, p) in scored {
            record.insert(name, p);
        }
        record
    }

    /// Strict improvement over all parents.
    ///
    /// A parent missing from the record never admits a child.
    pub fn screen(
        &self,
        p_value: f64,
        parents: &[String],
        record: &SignificanceRecord,
    ) -> Result<(), RejectReason> {
        for parent in parents {
            let parent_p_value = record.get(parent).unwrap_or(f64::NAN);
            if !(p_value < parent_p_value) {
                return Err(RejectReason::NotSignificant {
                    parent: parent.clone(),
                    p_value,
                    parent_p_value,
                });
            }
        }
        Ok(())
    }
}
