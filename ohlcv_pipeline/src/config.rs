//! Pipeline configuration: defaults, plus an optional TOML file.
//!
//! Every key is optional; a missing key keeps its built-in default, so an
//! empty file (or no file) reproduces the default run:
//!
//! ```toml
//! [simulation]
//! num_records = 1000
//! seed = 44
//! start = "2025-12-10T09:30:00Z"
//!
//! [resample]
//! bucket = "5m"
//!
//! [output]
//! filename = "NQ_5min_processed.csv"
//! header = "pandas"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    io::csv_sink::{DEFAULT_FILENAME, HeaderStyle, project_data_dir},
    models::timeframe::Timeframe,
    providers::simulated::SimulationParams,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub simulation: SimulationParams,
    pub resample: ResampleConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResampleConfig {
    /// Target bucket width.
    pub bucket: Timeframe,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            bucket: Timeframe::minutes(5).unwrap_or(Timeframe::ONE_MINUTE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory; `None` means `<crate root>/data`.
    pub dir: Option<PathBuf>,
    pub filename: String,
    pub header: HeaderStyle,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            filename: DEFAULT_FILENAME.to_string(),
            header: HeaderStyle::Pandas,
        }
    }
}

impl OutputConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(project_data_dir)
    }
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }
}
