//! File-level run pipeline — wires loading, the expansion engine, and export.
//!
//! `run_file()` is the entry point used by the CLI:
//! load CSV → expand and screen → write the output table → optional manifest.
//! Nothing is written unless the engine finished without a fatal error, and
//! a failed manifest write takes the output table with it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use featlab_core::{
    CleaningSummary, ExpansionEngine, ExpansionError, ExpansionOutcome, ExpansionProgress,
    RoundSummary, Stage,
};
use thiserror::Error;

use crate::config::{ConfigFileError, RunConfig};
use crate::data_loader::{load_table, LoadError};
use crate::export::{output_path_for, write_table};
use crate::manifest::RunManifest;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigFileError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("{0}")]
    Expansion(#[from] ExpansionError),
    #[error(transparent)]
    Output(#[from] anyhow::Error),
}

/// Where to put the results. `None` fields fall back to the defaults.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Output table path. Defaults to the input stem plus the configured suffix.
    pub output: Option<PathBuf>,
    /// Manifest path. No manifest is written when absent.
    pub manifest: Option<PathBuf>,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub output: PathBuf,
    pub manifest: Option<PathBuf>,
    pub rows: usize,
    pub outcome: ExpansionOutcome,
}

/// Run the whole pipeline on one input file.
pub fn run_file(
    input: &Path,
    config: &RunConfig,
    options: &RunOptions,
    progress: &dyn ExpansionProgress,
) -> Result<RunReport, RunError> {
    config.validate()?;
    let expansion = &config.expansion;

    // The target is always loaded, even if it is also listed as ignored.
    let skip: BTreeSet<String> = expansion
        .ignored_names
        .iter()
        .filter(|name| expansion.target_name.as_ref() != Some(*name))
        .cloned()
        .collect();
    let mut loaded = load_table(input, &skip)?;
    log::info!(
        "loaded {} columns x {} rows from {} (dataset {})",
        loaded.table.len(),
        loaded.rows,
        input.display(),
        &loaded.dataset_hash[..12]
    );

    // Skipped columns are already gone; the engine only checks the rest.
    let mut engine_config = expansion.clone();
    engine_config
        .ignored_names
        .retain(|name| !loaded.skipped.contains(name));

    let significance = config.scoring.significance_test();
    let mut engine = ExpansionEngine::new(&engine_config, config.scoring.association.scorer())
        .with_progress(progress);
    if engine_config.evaluate_significance {
        engine = engine.with_significance(&significance);
    }
    let outcome = engine.run(std::mem::take(&mut loaded.table))?;

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(input, &config.output.suffix));
    let manifest = options
        .manifest
        .as_ref()
        .map(|path| -> anyhow::Result<_> {
            let manifest = RunManifest::build(input, &output, &loaded, config, &outcome)?;
            Ok((path, manifest.to_json()?))
        })
        .transpose()?;

    if let Err(err) = write_table(&outcome.table, &output) {
        discard(&output);
        return Err(err.into());
    }
    log::info!(
        "wrote {} parameters to {}",
        outcome.table.len(),
        output.display()
    );

    if let Some((path, json)) = manifest {
        if let Err(err) = std::fs::write(path, json) {
            discard(&output);
            return Err(anyhow::Error::new(err)
                .context(format!("failed to write manifest: {}", path.display()))
                .into());
        }
        log::info!("wrote manifest to {}", path.display());
    }

    Ok(RunReport {
        output,
        manifest: options.manifest.clone(),
        rows: loaded.rows,
        outcome,
    })
}

/// Remove a file this run wrote before a later write failed.
fn discard(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::warn!("removed incomplete output {}", path.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("could not remove {}: {err}", path.display()),
    }
}

/// Progress reporter that prints one line per event to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrProgress;

impl ExpansionProgress for StderrProgress {
    fn on_stage(&self, stage: Stage) {
        if stage == Stage::Finalize {
            eprintln!("finalizing");
        }
    }

    fn on_cleaned(&self, summary: &CleaningSummary) {
        eprintln!(
            "cleaning: kept {} of {} input parameters",
            summary.kept, summary.input
        );
        if !summary.dropped.is_empty() {
            eprintln!("  dropped (collinear or constant): {}", summary.dropped.join(", "));
        }
    }

    fn on_round_start(&self, round: usize, total: usize, accepted: usize) {
        eprintln!("round {round}/{total}: expanding {accepted} parameters");
    }

    fn on_round_complete(&self, summary: &RoundSummary) {
        eprintln!(
            "round {}: {} candidates, {} accepted ({} univariate, {} bivariate), \
             {} domain-rejected, {} constant, {} screened out",
            summary.round,
            summary.generated,
            summary.accepted(),
            summary.univariate_accepted,
            summary.bivariate_accepted,
            summary.domain_rejected,
            summary.degenerate_rejected,
            summary.screened_out
        );
    }

    fn on_no_progress(&self, round: usize) {
        eprintln!("round {round}: no new parameters survived screening");
    }

    fn on_warning(&self, message: &str) {
        eprintln!("WARNING: {message}");
    }
}
