//! CSV export of the final parameter table.
//!
//! One column per accepted parameter in table order, one row per sample.
//! Values use Rust's shortest round-trip float formatting, so reloading the
//! file reproduces every value bit for bit.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use featlab_core::ParameterTable;

/// Output path for `input`: same directory, file stem plus `suffix`, `.csv`.
///
/// `data/run.csv` becomes `data/run_out.csv`.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.csv"))
}

/// Render the table as CSV text.
pub fn export_table_csv(table: &ParameterTable) -> Result<String> {
    if table.is_empty() {
        return Ok(String::new());
    }
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(table.names())?;
    for row in 0..table.n_samples() {
        wtr.write_record(table.iter().map(|p| p.values[row].to_string()))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write the table to `path`, replacing any existing file.
pub fn write_table(table: &ParameterTable, path: &Path) -> Result<()> {
    let csv = export_table_csv(table)?;
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write output table: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use featlab_core::Parameter;

    #[test]
    fn output_path_keeps_directory_and_replaces_extension() {
        assert_eq!(
            output_path_for(Path::new("data/run.csv"), "_out"),
            PathBuf::from("data/run_out.csv")
        );
        assert_eq!(
            output_path_for(Path::new("params"), "_out"),
            PathBuf::from("params_out.csv")
        );
        assert_eq!(
            output_path_for(Path::new("/tmp/a.b.csv"), "_x"),
            PathBuf::from("/tmp/a.b_x.csv")
        );
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let table = ParameterTable::from_parameters([
            Parameter::raw("x", vec![1.0, 0.1]),
            Parameter::raw("x_^2", vec![1.0, 0.010000000000000002]),
        ])
        .unwrap();
        let csv = export_table_csv(&table).unwrap();
        assert_eq!(csv, "x,x_^2\n1,1\n0.1,0.010000000000000002\n");
    }

    #[test]
    fn empty_table_is_empty_output() {
        assert_eq!(export_table_csv(&ParameterTable::new()).unwrap(), "");
    }
}
