//! Binary operators over a pair of distinct parameters.

use serde::{Deserialize, Serialize};

use super::DomainViolation;

/// Two-input transformation.
///
/// Variant order is the merge order of bivariate candidates within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Sum,
    Difference,
    Product,
    Quotient,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 4] = [
        BinaryOp::Sum,
        BinaryOp::Difference,
        BinaryOp::Product,
        BinaryOp::Quotient,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BinaryOp::Sum => "sum",
            BinaryOp::Difference => "difference",
            BinaryOp::Product => "product",
            BinaryOp::Quotient => "quotient",
        }
    }

    /// Infix token used in candidate names.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Sum => "+",
            BinaryOp::Difference => "-",
            BinaryOp::Product => "*",
            BinaryOp::Quotient => "/",
        }
    }

    /// `<a>_<op>_<b>`, e.g. `x1_/_x2`.
    pub fn candidate_name(self, a: &str, b: &str) -> String {
        format!("{a}_{}_{b}", self.symbol())
    }

    /// Operand orders generated for the unordered pair `{a, b}` with `a < b`.
    ///
    /// Difference is emitted in both orders. Quotient is emitted as `a / b`
    /// only; `b / a` is reachable as the reciprocal of `a / b` in a later round.
    pub fn orderings<T: Copy>(self, a: T, b: T) -> Vec<(T, T)> {
        match self {
            BinaryOp::Difference => vec![(a, b), (b, a)],
            BinaryOp::Sum | BinaryOp::Product | BinaryOp::Quotient => vec![(a, b)],
        }
    }

    /// Apply the operator sample-wise.
    pub fn apply(self, a: &[f64], b: &[f64]) -> Result<Vec<f64>, DomainViolation> {
        debug_assert_eq!(a.len(), b.len(), "operands must share the sample axis");

        if self == BinaryOp::Quotient {
            if let Some(index) = b.iter().position(|&v| v == 0.0) {
                return Err(DomainViolation::ZeroDivisor { index });
            }
        }

        a.iter()
            .zip(b)
            .enumerate()
            .map(|(index, (&x, &y))| {
                let z = match self {
                    BinaryOp::Sum => x + y,
                    BinaryOp::Difference => x - y,
                    BinaryOp::Product => x * y,
                    BinaryOp::Quotient => x / y,
                };
                if z.is_finite() {
                    Ok(z)
                } else {
                    Err(DomainViolation::NonFinite { index })
                }
            })
            .collect()
    }
}
