//! Fatal errors of an expansion run.
//!
//! Operator domain violations are not here: they reject a single candidate
//! and are reported through [`crate::filter::RejectReason`].

use thiserror::Error;

use crate::domain::TableError;

/// Invalid or inconsistent run configuration. Raised before any computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("colinearity_cutoff must be within [0, 1], got {0}")]
    CutoffOutOfRange(f64),

    #[error("significance evaluation requires a target_name")]
    MissingTarget,

    #[error("target column '{0}' not found in input")]
    TargetNotFound(String),

    #[error("significance evaluation enabled but no significance scorer was supplied")]
    MissingSignificanceScorer,

    #[error("threads must be at least 1")]
    ZeroThreads,

    #[error("max_accepted must be at least 1")]
    ZeroCapacity,
}

/// Input columns do not match what the configuration refers to.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataShapeError {
    #[error("{role} column '{name}' not found in input")]
    MissingColumn { name: String, role: &'static str },

    #[error("parameter '{name}' has {found} samples, expected {expected}")]
    SampleCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("data shape error: {0}")]
    DataShape(#[from] DataShapeError),

    #[error("naming collision on '{name}': {detail}")]
    NamingCollision { name: String, detail: String },

    #[error("accepted set has {accepted} parameters before round {round}, above max_accepted = {cap}")]
    CapacityExceeded {
        round: usize,
        accepted: usize,
        cap: usize,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl From<TableError> for ExpansionError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::DuplicateName(name) => ExpansionError::NamingCollision {
                detail: "inserted twice into the accepted set".into(),
                name,
            },
            TableError::LengthMismatch {
                name,
                expected,
                found,
            } => DataShapeError::SampleCountMismatch {
                name,
                expected,
                found,
            }
            .into(),
            TableError::MissingColumn(name) => DataShapeError::MissingColumn {
                name,
                role: "parent",
            }
            .into(),
        }
    }
}
