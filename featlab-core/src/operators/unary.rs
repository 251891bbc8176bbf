//! Unary operators.
//!
//! Each operator maps one parameter vector to one candidate vector. Guards are
//! checked over the whole input before anything is computed, so a candidate is
//! either produced in full or rejected with the first offending sample.

use serde::{Deserialize, Serialize};

use super::DomainViolation;

/// Single-input transformation.
///
/// Variant order is the merge order of unary candidates within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// √x, requires x ≥ 0.
    Sqrt,
    /// Real cube root, defined everywhere.
    CubeRoot,
    /// ln(x), requires x > 0.
    Ln,
    /// 1/x, requires x ≠ 0.
    Reciprocal,
    /// e^x.
    Exp,
    /// x².
    Square,
    /// x³.
    Cube,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 7] = [
        UnaryOp::Sqrt,
        UnaryOp::CubeRoot,
        UnaryOp::Ln,
        UnaryOp::Reciprocal,
        UnaryOp::Exp,
        UnaryOp::Square,
        UnaryOp::Cube,
    ];

    /// Stable identifier used in provenance strings.
    pub fn id(self) -> &'static str {
        match self {
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::CubeRoot => "cube_root",
            UnaryOp::Ln => "ln",
            UnaryOp::Reciprocal => "reciprocal",
            UnaryOp::Exp => "exp",
            UnaryOp::Square => "square",
            UnaryOp::Cube => "cube",
        }
    }

    /// Suffix appended to the parent name.
    pub fn suffix(self) -> &'static str {
        match self {
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::CubeRoot => "cubrt",
            UnaryOp::Ln => "ln",
            UnaryOp::Reciprocal => "1/",
            UnaryOp::Exp => "e^",
            UnaryOp::Square => "^2",
            UnaryOp::Cube => "^3",
        }
    }

    /// `<parent>_<suffix>`, e.g. `x1_^2`.
    pub fn candidate_name(self, parent: &str) -> String {
        format!("{parent}_{}", self.suffix())
    }

    fn guard(self, index: usize, value: f64) -> Result<(), DomainViolation> {
        match self {
            UnaryOp::Sqrt if value < 0.0 => Err(DomainViolation::Negative { index, value }),
            UnaryOp::Ln if value <= 0.0 => Err(DomainViolation::NonPositive { index, value }),
            UnaryOp::Reciprocal if value == 0.0 => Err(DomainViolation::ZeroDivisor { index }),
            _ => Ok(()),
        }
    }

    fn eval(self, x: f64) -> f64 {
        match self {
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::CubeRoot => x.cbrt(),
            UnaryOp::Ln => x.ln(),
            UnaryOp::Reciprocal => 1.0 / x,
            UnaryOp::Exp => x.exp(),
            UnaryOp::Square => x * x,
            UnaryOp::Cube => x * x * x,
        }
    }

    /// Apply the operator to a whole column.
    pub fn apply(self, values: &[f64]) -> Result<Vec<f64>, DomainViolation> {
        for (index, &value) in values.iter().enumerate() {
            self.guard(index, value)?;
        }
        values
            .iter()
            .enumerate()
            .map(|(index, &x)| {
                let y = self.eval(x);
                if y.is_finite() {
                    Ok(y)
                } else {
                    Err(DomainViolation::NonFinite { index })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_rejects_any_negative_sample() {
        let err = UnaryOp::Sqrt.apply(&[4.0, 9.0, -1.0, 16.0]).unwrap_err();
        assert_eq!(
            err,
            DomainViolation::Negative {
                index: 2,
                value: -1.0
            }
        );
    }

    #[test]
    fn sqrt_accepts_zero() {
        assert_eq!(UnaryOp::Sqrt.apply(&[0.0, 4.0]).unwrap(), vec![0.0, 2.0]);
    }

    #[test]
    fn cube_root_preserves_sign() {
        let out = UnaryOp::CubeRoot.apply(&[-8.0, 27.0]).unwrap();
        assert!((out[0] + 2.0).abs() < 1e-12);
        assert!((out[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn ln_rejects_zero() {
        let err = UnaryOp::Ln.apply(&[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, DomainViolation::NonPositive { index: 1, .. }));
    }

    #[test]
    fn reciprocal_rejects_zero_and_negative_zero() {
        assert!(UnaryOp::Reciprocal.apply(&[1.0, 0.0]).is_err());
        assert!(UnaryOp::Reciprocal.apply(&[-0.0, 2.0]).is_err());
        assert_eq!(UnaryOp::Reciprocal.apply(&[2.0, -4.0]).unwrap(), vec![0.5, -0.25]);
    }

    #[test]
    fn exp_overflow_is_rejected() {
        let err = UnaryOp::Exp.apply(&[1.0, 1000.0]).unwrap_err();
        assert_eq!(err, DomainViolation::NonFinite { index: 1 });
    }

    #[test]
    fn powers() {
        assert_eq!(UnaryOp::Square.apply(&[-3.0, 2.0]).unwrap(), vec![9.0, 4.0]);
        assert_eq!(UnaryOp::Cube.apply(&[-2.0, 3.0]).unwrap(), vec![-8.0, 27.0]);
    }

    #[test]
    fn names_follow_suffix_convention() {
        assert_eq!(UnaryOp::Square.candidate_name("x1"), "x1_^2");
        assert_eq!(UnaryOp::Reciprocal.candidate_name("x1"), "x1_1/");
        assert_eq!(UnaryOp::CubeRoot.candidate_name("t"), "t_cubrt");
    }

    #[test]
    fn suffixes_are_distinct() {
        let mut suffixes: Vec<_> = UnaryOp::ALL.iter().map(|op| op.suffix()).collect();
        suffixes.sort_unstable();
        suffixes.dedup();
        assert_eq!(suffixes.len(), UnaryOp::ALL.len());
    }
}
