//! FeatLab Core — descriptor expansion engine, operators, filters, parameter tables.
//!
//! This crate contains the expansion-and-pruning engine:
//! - Operator library (7 unary, 4 binary) with explicit domain guards
//! - Parameter tables with provenance for every derived column
//! - Redundancy screening (global cleaning and per-candidate collinearity)
//! - Significance screening against direct parents
//! - Round-based orchestrator with parallel evaluation and a deterministic merge
//!
//! Statistics are injected through the traits in [`scoring`]; file I/O lives
//! in `featlab-runner`.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod operators;
pub mod scoring;

pub use config::{ExpansionConfig, RECOMMENDED_MAX_ITERATIONS};
pub use domain::{Parameter, ParameterTable, Provenance, TableError};
pub use engine::{
    run_expansion, CleaningSummary, ExpansionEngine, ExpansionOutcome, ExpansionProgress,
    NullProgress, RoundSummary, Stage,
};
pub use error::{ConfigError, DataShapeError, ExpansionError};
pub use filter::{RejectReason, Rejection, SignificanceRecord};
pub use operators::{BinaryOp, CandidateSpec, DomainViolation, Operator, UnaryOp};
pub use scoring::{AssociationScorer, SignificanceOutcome, SignificanceScorer};
