//! FeatLab CLI — expand one CSV parameter table.
//!
//! `featlab data.csv` reads `data.csv`, runs cleaning plus the configured
//! number of expansion rounds, and writes the accepted table to
//! `data_out.csv` next to the input. Options come from an optional TOML file
//! (`--config`); individual flags override it.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use featlab_runner::{run_file, RunConfig, RunOptions, StderrProgress};
use log::LevelFilter;

#[derive(Parser)]
#[command(
    name = "featlab",
    version,
    about = "FeatLab — iterative nonlinear feature expansion with redundancy and significance screening"
)]
struct Cli {
    /// Input CSV: one column per parameter, one row per sample.
    input: PathBuf,

    /// Path to a TOML run configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Association at or above this value marks two columns as redundant.
    #[arg(long)]
    cutoff: Option<f64>,

    /// Number of expansion rounds.
    #[arg(long)]
    iterations: Option<usize>,

    /// Screen candidates by permutation-test significance against the target.
    #[arg(long, default_value_t = false)]
    significance: bool,

    /// Target column (required with --significance).
    #[arg(long)]
    target: Option<String>,

    /// Column to drop before cleaning. Repeat for several columns.
    #[arg(long = "ignore", value_name = "COLUMN")]
    ignore: Vec<String>,

    /// Seed for the permutation test.
    #[arg(long)]
    seed: Option<u64>,

    /// Target shuffles per permutation test.
    #[arg(long)]
    permutations: Option<usize>,

    /// Worker threads for candidate evaluation. Defaults to all cores.
    #[arg(long)]
    threads: Option<usize>,

    /// Abort if more parameters than this are about to be expanded.
    #[arg(long)]
    max_accepted: Option<usize>,

    /// Output CSV path. Defaults to the input stem plus `_out.csv`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write a JSON run manifest to this path.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RunConfig::default(),
        };

        let expansion = &mut config.expansion;
        if let Some(cutoff) = self.cutoff {
            expansion.colinearity_cutoff = cutoff;
        }
        if let Some(iterations) = self.iterations {
            expansion.iterations = iterations;
        }
        if self.significance {
            expansion.evaluate_significance = true;
        }
        if let Some(target) = &self.target {
            expansion.target_name = Some(target.clone());
        }
        expansion.ignored_names.extend(self.ignore.iter().cloned());
        if let Some(seed) = self.seed {
            expansion.seed = seed;
        }
        if self.threads.is_some() {
            expansion.threads = self.threads;
        }
        if self.max_accepted.is_some() {
            expansion.max_accepted = self.max_accepted;
        }
        if let Some(permutations) = self.permutations {
            config.scoring.permutations = permutations;
        }

        config.validate()?;
        Ok(config)
    }
}

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Stderr logging at the `-v` level. `RUST_LOG` refines it per module.
fn init_logging(verbose: u8) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level_filter(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = cli.run_config()?;
    let options = RunOptions {
        output: cli.output.clone(),
        manifest: cli.manifest.clone(),
    };

    let report = run_file(&cli.input, &config, &options, &StderrProgress)
        .with_context(|| format!("run failed for {}", cli.input.display()))?;

    println!(
        "{} parameters ({} derived, {} samples) -> {}",
        report.outcome.table.len(),
        report.outcome.derived_count(),
        report.rows,
        report.output.display()
    );
    if let Some(manifest) = &report.manifest {
        println!("manifest -> {}", manifest.display());
    }
    Ok(())
}
