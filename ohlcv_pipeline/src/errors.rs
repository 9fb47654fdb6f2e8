use thiserror::Error;

use crate::{
    clean::CleanError, config::ConfigError, io::sink::SinkError, providers::ProviderError,
    resample::ResampleError,
};

/// The unified error type for the `ohlcv_pipeline` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from a data provider (e.g., invalid simulation parameters).
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A raw series could not be cleaned.
    #[error("Cleaning failed: {0}")]
    Clean(#[from] CleanError),

    /// A cleaned series could not be resampled.
    #[error("Resampling failed: {0}")]
    Resample(#[from] ResampleError),

    /// An error originating from a data sink (e.g., file I/O).
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
