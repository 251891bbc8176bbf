//! Candidate screening.
//!
//! Two gates decide whether a candidate enters the accepted set:
//! - [`RedundancyFilter`] compares association against already-accepted columns.
//! - [`SignificanceFilter`] compares permutation p-values against the parents.
//!
//! Both only read the accepted table. Rejections are values, never errors.
//! Constant columns are refused before either gate: see [`is_degenerate`].

pub mod redundancy;
pub mod significance;

use std::fmt;

pub use redundancy::{CleanResult, RedundancyFilter};
pub use significance::{SignificanceFilter, SignificanceRecord};

use crate::operators::DomainViolation;

/// True when every sample equals the first one (including empty columns).
///
/// Such a column has no variance, so any association with it is undefined
/// and it cannot explain anything the accepted set does not.
pub fn is_degenerate(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Why a candidate (or, during cleaning, a raw column) was not accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    Domain(DomainViolation),
    /// Every sample has the same value.
    Degenerate {
        value: f64,
    },
    Collinear {
        with: String,
        score: f64,
    },
    NotSignificant {
        parent: String,
        p_value: f64,
        parent_p_value: f64,
    },
}

impl RejectReason {
    /// Short label used for counting rejections by kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::Domain(_) => "domain",
            RejectReason::Degenerate { .. } => "degenerate",
            RejectReason::Collinear { .. } => "collinear",
            RejectReason::NotSignificant { .. } => "not_significant",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Domain(v) => write!(f, "domain violation: {v}"),
            RejectReason::Degenerate { value } => {
                write!(f, "constant column (every sample is {value})")
            }
            RejectReason::Collinear { with, score } => {
                write!(f, "collinear with '{with}' (association {score:.4})")
            }
            RejectReason::NotSignificant {
                parent,
                p_value,
                parent_p_value,
            } => write!(
                f,
                "p-value {p_value:.4} does not improve on parent '{parent}' ({parent_p_value:.4})"
            ),
        }
    }
}

/// One entry of the rejection log.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub candidate: String,
    /// 0 for cleaning, otherwise the expansion round.
    pub round: usize,
    pub reason: RejectReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_messages() {
        let r = RejectReason::Collinear {
            with: "x1".into(),
            score: 0.91234,
        };
        assert_eq!(r.kind(), "collinear");
        assert_eq!(r.to_string(), "collinear with 'x1' (association 0.9123)");

        let r = RejectReason::Domain(DomainViolation::ZeroDivisor { index: 3 });
        assert_eq!(r.kind(), "domain");
        assert_eq!(r.to_string(), "domain violation: zero divisor at sample 3");

        let r = RejectReason::Degenerate { value: 1.0 };
        assert_eq!(r.kind(), "degenerate");
        assert_eq!(r.to_string(), "constant column (every sample is 1)");
    }

    #[test]
    fn constant_columns_are_degenerate() {
        assert!(is_degenerate(&[1.0, 1.0, 1.0]));
        assert!(is_degenerate(&[]));
        assert!(!is_degenerate(&[1.0, 1.0, 1.0000001]));
        assert!(!is_degenerate(&[-1.0, 1.0]));
    }
}
