// ========================================================================================
//                               Run configuration
// ========================================================================================
//
// Everything a scoring run needs to know is carried explicitly in a `ScoringConfig`.
// It can be written to and read from a small TOML file so that a grading setup can be
// pinned and reused; any key left out of the file takes its default.

use crate::types::DEFAULT_EXPECTED_EVENTS;
use crate::validate::RankCheck;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SOLUTION_FILE: &str = "solution.csv";
pub const DEFAULT_SUBMISSION_FILE: &str = "submission.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read or write config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config file '{}': {source}", path.display())]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML format: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("The expected event count must be at least 1.")]
    ZeroExpectedEvents,
}

/// The inputs and policy of one scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Ground truth: `EventId,Label,Weight`.
    pub solution_path: PathBuf,
    /// Candidate: `EventId,RankOrder,Class`.
    pub submission_path: PathBuf,
    /// Size of the scored test set (N). Ranks must cover 1..=N.
    pub expected_events: usize,
    pub rank_check: RankCheck,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            solution_path: PathBuf::from(DEFAULT_SOLUTION_FILE),
            submission_path: PathBuf::from(DEFAULT_SUBMISSION_FILE),
            expected_events: DEFAULT_EXPECTED_EVENTS,
            rank_check: RankCheck::default(),
        }
    }
}

impl ScoringConfig {
    /// Loads a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let toml_string = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&toml_string).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration in a human-readable TOML format.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)?;
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = BufWriter::new(fs::File::create(path).map_err(io_err)?);
        file.write_all(toml_string.as_bytes()).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expected_events == 0 {
            return Err(ConfigError::ZeroExpectedEvents);
        }
        Ok(())
    }
}
