//! FeatLab Runner — file pipeline, statistical scorers, export and manifests.
//!
//! This crate builds on `featlab-core` to provide:
//! - Pearson/R² association and a seeded permutation test (the core's scorers)
//! - CSV loading with per-cell validation and a dataset hash
//! - CSV export of the final table next to the input
//! - JSON run manifests with provenance and p-values
//! - TOML run configuration
//! - The `run_file()` pipeline used by the CLI

pub mod config;
pub mod data_loader;
pub mod export;
pub mod manifest;
pub mod runner;
pub mod stats;

pub use config::{AssociationKind, ConfigFileError, OutputConfig, RunConfig, ScoringConfig};
pub use data_loader::{load_table, load_table_from_reader, LoadError, LoadedTable};
pub use export::{export_table_csv, output_path_for, write_table};
pub use manifest::{ParameterRecord, RunManifest, SCHEMA_VERSION};
pub use runner::{run_file, RunError, RunOptions, RunReport, StderrProgress};
pub use stats::{pearson, AbsPearson, LinearFit, PermutationTest, SquaredPearson};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn scorers_are_send_sync() {
        assert_send::<SquaredPearson>();
        assert_sync::<SquaredPearson>();
        assert_send::<AbsPearson>();
        assert_sync::<AbsPearson>();
        assert_send::<PermutationTest>();
        assert_sync::<PermutationTest>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<RunOptions>();
        assert_sync::<RunOptions>();
    }

    #[test]
    fn run_report_is_send_sync() {
        assert_send::<RunReport>();
        assert_sync::<RunReport>();
    }

    #[test]
    fn manifest_is_send_sync() {
        assert_send::<RunManifest>();
        assert_sync::<RunManifest>();
    }

    #[test]
    fn progress_reporter_is_send_sync() {
        assert_send::<StderrProgress>();
        assert_sync::<StderrProgress>();
    }
}
