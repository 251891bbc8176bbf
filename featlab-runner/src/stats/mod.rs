//! Statistical primitives behind the core's scorer traits.
//!
//! - [`correlation`]: Pearson correlation and the two association scorers
//! - [`linear`]: ordinary least squares of one column on another
//! - [`permutation`]: seeded permutation test producing p-values

pub mod correlation;
pub mod linear;
pub mod permutation;

pub use correlation::{pearson, AbsPearson, SquaredPearson};
pub use linear::LinearFit;
pub use permutation::PermutationTest;
