//! Domain types for FeatLab

pub mod parameter;
pub mod table;

pub use parameter::{Parameter, Provenance};
pub use table::{ParameterTable, TableError};
