//! ParameterTable — named columns sharing one sample axis.
//!
//! Column order is insertion order. Every column has the same sample count,
//! fixed by the first insertion. Filters only ever see `&ParameterTable`.

use std::collections::HashMap;

use thiserror::Error;

use super::parameter::Parameter;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("duplicate parameter name '{0}'")]
    DuplicateName(String),

    #[error("parameter '{name}' has {found} samples, table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("no parameter named '{0}'")]
    MissingColumn(String),
}

#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    columns: Vec<Parameter>,
    index: HashMap<String, usize>,
    n_samples: Option<usize>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from parameters, in order.
    pub fn from_parameters(
        parameters: impl IntoIterator<Item = Parameter>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new();
        for p in parameters {
            table.insert(p)?;
        }
        Ok(table)
    }

    /// Append a column. Fails on a duplicate name or a sample-count mismatch.
    pub fn insert(&mut self, parameter: Parameter) -> Result<(), TableError> {
        if self.index.contains_key(&parameter.name) {
            return Err(TableError::DuplicateName(parameter.name));
        }
        let found = parameter.len();
        match self.n_samples {
            Some(expected) if expected != found => {
                return Err(TableError::LengthMismatch {
                    name: parameter.name,
                    expected,
                    found,
                });
            }
            Some(_) => {}
            None => self.n_samples = Some(found),
        }
        self.index.insert(parameter.name.clone(), self.columns.len());
        self.columns.push(parameter);
        Ok(())
    }

    /// Remove and return a column.
    pub fn take(&mut self, name: &str) -> Option<Parameter> {
        let pos = self.index.remove(name)?;
        let parameter = self.columns.remove(pos);
        self.reindex();
        Some(parameter)
    }

    /// Keep only columns for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&Parameter) -> bool) {
        self.columns.retain(|p| keep(p));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn values(&self, name: &str) -> Option<&[f64]> {
        self.get(name).map(|p| p.values.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up several columns at once, in the given order.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<&[f64]>, TableError> {
        names
            .iter()
            .map(|n| {
                self.values(n)
                    .ok_or_else(|| TableError::MissingColumn(n.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Shared sample count (0 for an empty table).
    pub fn n_samples(&self) -> usize {
        self.n_samples.unwrap_or(0)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|p| p.name.as_str())
    }

    /// Names in ascending lexicographic order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.columns.iter()
    }

    pub fn as_slice(&self) -> &[Parameter] {
        &self.columns
    }

    pub fn into_parameters(self) -> Vec<Parameter> {
        self.columns
    }
}

impl PartialEq for ParameterTable {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl<'a> IntoIterator for &'a ParameterTable {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
