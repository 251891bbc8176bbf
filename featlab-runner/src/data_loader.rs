//! CSV loading into a raw parameter table.
//!
//! The first row names the columns; every further row is one sample. Every
//! cell of a loaded column must parse as a finite float. Columns listed in
//! the skip set are never parsed, so they may hold identifiers or free text.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use featlab_core::{Parameter, ParameterTable, TableError};
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("input has no header row")]
    Empty,

    #[error("column {index} has a blank name")]
    BlankHeader { index: usize },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("input has a header but no data rows")]
    NoRows,

    #[error("row {row}, column '{column}': missing value")]
    MissingValue { row: usize, column: String },

    #[error("row {row}, column '{column}': '{value}' is not a finite number")]
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// A loaded input table.
#[derive(Debug)]
pub struct LoadedTable {
    /// Raw parameters in file column order (skipped columns excluded).
    pub table: ParameterTable,
    /// Header names that were present and skipped.
    pub skipped: Vec<String>,
    /// Number of data rows.
    pub rows: usize,
    /// BLAKE3 over column names and values, for the run manifest.
    pub dataset_hash: String,
}

/// Load a CSV file.
pub fn load_table(path: &Path, skip: &BTreeSet<String>) -> Result<LoadedTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_table_from_reader(file, skip)
}

/// Load CSV from any reader. Row numbers in errors count data rows from 1.
pub fn load_table_from_reader<R: Read>(
    reader: R,
    skip: &BTreeSet<String>,
) -> Result<LoadedTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }
    let mut seen = HashSet::new();
    for (index, name) in headers.iter().enumerate() {
        if name.is_empty() {
            return Err(LoadError::BlankHeader { index });
        }
        if !seen.insert(name) {
            return Err(LoadError::DuplicateColumn(name.to_string()));
        }
    }

    let loaded: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !skip.contains(*name))
        .collect();
    let skipped = headers
        .iter()
        .filter(|name| skip.contains(*name))
        .map(String::from)
        .collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); loaded.len()];
    let mut rows = 0;
    for record in rdr.records() {
        let record = record?;
        rows += 1;
        for (slot, &(index, name)) in loaded.iter().enumerate() {
            let cell = record.get(index).unwrap_or_default();
            columns[slot].push(parse_cell(cell, rows, name)?);
        }
    }
    if rows == 0 {
        return Err(LoadError::NoRows);
    }

    let table = ParameterTable::from_parameters(
        loaded
            .iter()
            .zip(columns)
            .map(|(&(_, name), values)| Parameter::raw(name, values)),
    )?;
    let dataset_hash = dataset_hash(&table);

    Ok(LoadedTable {
        table,
        skipped,
        rows,
        dataset_hash,
    })
}

fn parse_cell(cell: &str, row: usize, column: &str) -> Result<f64, LoadError> {
    if cell.is_empty() {
        return Err(LoadError::MissingValue {
            row,
            column: column.to_string(),
        });
    }
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::NonNumeric {
            row,
            column: column.to_string(),
            value: cell.to_string(),
        })
}

/// Deterministic BLAKE3 hash over column names and values, in column order.
pub fn dataset_hash(table: &ParameterTable) -> String {
    let mut hasher = blake3::Hasher::new();
    for parameter in table {
        hasher.update(parameter.name.as_bytes());
        hasher.update(&[0]);
        for value in &parameter.values {
            hasher.update(&value.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
