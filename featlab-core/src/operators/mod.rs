//! Operator library — unary and binary transformations with explicit domain guards.
//!
//! Operators never produce NaN or infinite values: a guard failure or a
//! non-finite result rejects the whole candidate with a [`DomainViolation`].
//! Rejection is local to the candidate and never aborts a round.

pub mod binary;
pub mod unary;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use binary::BinaryOp;
pub use unary::UnaryOp;

/// Operator precondition failure for one candidate. Non-fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainViolation {
    #[error("negative value {value} at sample {index}")]
    Negative { index: usize, value: f64 },

    #[error("non-positive value {value} at sample {index}")]
    NonPositive { index: usize, value: f64 },

    #[error("zero divisor at sample {index}")]
    ZeroDivisor { index: usize },

    #[error("non-finite result at sample {index}")]
    NonFinite { index: usize },
}

/// Any operator of the library.
///
/// The derived ordering (all unary before all binary, then declaration order)
/// is the operator component of the candidate merge key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "op", rename_all = "snake_case")]
pub enum Operator {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl Operator {
    pub fn arity(self) -> usize {
        match self {
            Operator::Unary(_) => 1,
            Operator::Binary(_) => 2,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Operator::Unary(op) => op.id(),
            Operator::Binary(op) => op.id(),
        }
    }

    /// Apply to resolved parent columns, in parent order.
    ///
    /// `inputs.len()` must equal [`Operator::arity`].
    pub fn apply(self, inputs: &[&[f64]]) -> Result<Vec<f64>, DomainViolation> {
        debug_assert_eq!(inputs.len(), self.arity());
        match self {
            Operator::Unary(op) => op.apply(inputs[0]),
            Operator::Binary(op) => op.apply(inputs[0], inputs[1]),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A candidate before evaluation: an operator and the names of its parents.
///
/// Ordering is the deterministic merge key: operator kind, then parent names
/// lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateSpec {
    operator: Operator,
    parents: Vec<String>,
    grouped: Vec<bool>,
}

impl CandidateSpec {
    pub fn unary(op: UnaryOp, parent: impl Into<String>) -> Self {
        Self {
            operator: Operator::Unary(op),
            parents: vec![parent.into()],
            grouped: vec![false],
        }
    }

    pub fn binary(op: BinaryOp, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            operator: Operator::Binary(op),
            parents: vec![a.into(), b.into()],
            grouped: vec![false, false],
        }
    }

    /// Parenthesize the parents flagged in `grouped` when naming.
    ///
    /// Parents that are themselves binary results must be grouped, otherwise
    /// `sum(a, b_+_c)` and `sum(a_+_b, c)` would share one name.
    pub fn with_grouping(mut self, grouped: &[bool]) -> Self {
        debug_assert_eq!(grouped.len(), self.parents.len());
        self.grouped = grouped.to_vec();
        self
    }

    fn label(&self, i: usize) -> Cow<'_, str> {
        if self.grouped[i] {
            Cow::Owned(format!("({})", self.parents[i]))
        } else {
            Cow::Borrowed(&self.parents[i])
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn is_unary(&self) -> bool {
        matches!(self.operator, Operator::Unary(_))
    }

    /// Column name of the candidate.
    pub fn name(&self) -> String {
        match self.operator {
            Operator::Unary(op) => op.candidate_name(&self.label(0)),
            Operator::Binary(op) => op.candidate_name(&self.label(0), &self.label(1)),
        }
    }
}

impl fmt::Display for CandidateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operator, self.parents.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unary_sorts_before_binary() {
        let mut specs = vec![
            CandidateSpec::binary(BinaryOp::Sum, "a", "b"),
            CandidateSpec::unary(UnaryOp::Cube, "z"),
            CandidateSpec::unary(UnaryOp::Sqrt, "z"),
            CandidateSpec::unary(UnaryOp::Sqrt, "a"),
        ];
        specs.sort();
        let names: Vec<String> = specs.iter().map(CandidateSpec::name).collect();
        assert_eq!(names, vec!["a_sqrt", "z_sqrt", "z_^3", "a_+_b"]);
    }

    #[test]
    fn apply_dispatches_by_arity() {
        let a = [1.0, 4.0];
        let b = [2.0, 2.0];
        let sqrt = Operator::Unary(UnaryOp::Sqrt).apply(&[&a]).unwrap();
        assert_eq!(sqrt, vec![1.0, 2.0]);
        let q = Operator::Binary(BinaryOp::Quotient).apply(&[&a, &b]).unwrap();
        assert_eq!(q, vec![0.5, 2.0]);
    }

    #[test]
    fn grouped_parents_are_parenthesized() {
        let left = CandidateSpec::binary(BinaryOp::Sum, "a_+_b", "c").with_grouping(&[true, false]);
        let right = CandidateSpec::binary(BinaryOp::Sum, "a", "b_+_c").with_grouping(&[false, true]);
        assert_eq!(left.name(), "(a_+_b)_+_c");
        assert_eq!(right.name(), "a_+_(b_+_c)");

        let sq = CandidateSpec::unary(UnaryOp::Square, "a_+_b").with_grouping(&[true]);
        assert_eq!(sq.name(), "(a_+_b)_^2");
        assert_ne!(sq.name(), CandidateSpec::binary(BinaryOp::Sum, "a", "b_^2").name());
    }

    #[test]
    fn display_lists_parents() {
        let spec = CandidateSpec::binary(BinaryOp::Difference, "b", "a");
        assert_eq!(spec.to_string(), "difference(b, a)");
        assert_eq!(spec.name(), "b_-_a");
    }
}
