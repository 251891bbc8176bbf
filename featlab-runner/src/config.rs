//! Run configuration file.
//!
//! A TOML file whose top-level keys are the expansion options, plus a
//! `[scoring]` and an `[output]` table:
//!
//! ```toml
//! colinearity_cutoff = 0.7
//! iterations = 2
//! evaluate_significance = true
//! target_name = "y"
//! ignored_names = ["id"]
//!
//! [scoring]
//! association = "r2"
//! permutations = 100
//!
//! [output]
//! suffix = "_out"
//! ```

use std::path::{Path, PathBuf};

use featlab_core::{AssociationScorer, ConfigError, ExpansionConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::permutation::DEFAULT_PERMUTATIONS;
use crate::stats::{AbsPearson, PermutationTest, SquaredPearson};

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),

    #[error("scoring.permutations must be at least 1")]
    ZeroPermutations,

    #[error("output.suffix must not be empty")]
    EmptySuffix,
}

/// Association measure used for redundancy screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// Squared Pearson correlation.
    #[default]
    R2,
    /// Absolute Pearson correlation.
    AbsPearson,
}

impl AssociationKind {
    pub fn scorer(self) -> &'static dyn AssociationScorer {
        match self {
            AssociationKind::R2 => &SquaredPearson,
            AssociationKind::AbsPearson => &AbsPearson,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub association: AssociationKind,
    /// Target shuffles per permutation test.
    pub permutations: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            association: AssociationKind::default(),
            permutations: DEFAULT_PERMUTATIONS,
        }
    }
}

impl ScoringConfig {
    pub fn significance_test(&self) -> PermutationTest {
        PermutationTest::new(self.permutations)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the input file stem to name the output table.
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "_out".into(),
        }
    }
}

/// Everything one `featlab` run needs besides the input path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(flatten)]
    pub expansion: ExpansionConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

impl RunConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigFileError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigFileError> {
        self.expansion.validate()?;
        if self.scoring.permutations == 0 {
            return Err(ConfigFileError::ZeroPermutations);
        }
        if self.output.suffix.is_empty() {
            return Err(ConfigFileError::EmptySuffix);
        }
        Ok(())
    }
}
