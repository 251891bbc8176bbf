//! Run manifest — JSON audit record of one expansion run.
//!
//! Records what went in (dataset hash, effective configuration), what
//! happened (cleaning and per-round counters, rejections by kind) and what
//! came out (every output parameter with its provenance and p-value).
//! Manifests carry a `schema_version`; newer versions are rejected on load.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use featlab_core::{CleaningSummary, ExpansionOutcome, Provenance, RoundSummary};
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::data_loader::LoadedTable;

pub const SCHEMA_VERSION: u32 = 1;

/// One output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    pub provenance: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub input: String,
    pub output: String,
    /// BLAKE3 over the loaded columns.
    pub dataset_hash: String,
    pub rows: usize,
    pub config: RunConfig,
    /// BLAKE3 over the JSON form of `config`.
    pub config_hash: String,
    pub cleaning: CleaningSummary,
    pub rounds: Vec<RoundSummary>,
    pub rejections: BTreeMap<String, usize>,
    pub parameters: Vec<ParameterRecord>,
}

impl RunManifest {
    pub fn build(
        input: &Path,
        output: &Path,
        loaded: &LoadedTable,
        config: &RunConfig,
        outcome: &ExpansionOutcome,
    ) -> Result<Self> {
        let config_json =
            serde_json::to_string(config).context("failed to serialize run config")?;
        let parameters = outcome
            .table
            .iter()
            .map(|p| ParameterRecord {
                name: p.name.clone(),
                provenance: p.provenance.clone(),
                p_value: outcome.p_value(&p.name),
            })
            .collect();

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            created_at: Utc::now(),
            input: input.display().to_string(),
            output: output.display().to_string(),
            dataset_hash: loaded.dataset_hash.clone(),
            rows: loaded.rows,
            config: config.clone(),
            config_hash: blake3::hash(config_json.as_bytes()).to_hex().to_string(),
            cleaning: outcome.cleaning.clone(),
            rounds: outcome.rounds.clone(),
            rejections: outcome
                .rejection_counts()
                .into_iter()
                .map(|(kind, n)| (kind.to_string(), n))
                .collect(),
            parameters,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize run manifest")
    }

    /// Parse a manifest, rejecting unknown schema versions.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self =
            serde_json::from_str(json).context("failed to deserialize run manifest")?;
        if manifest.schema_version > SCHEMA_VERSION {
            bail!(
                "unsupported manifest schema version {} (max supported: {})",
                manifest.schema_version,
                SCHEMA_VERSION
            );
        }
        Ok(manifest)
    }
}
