use std::path::PathBuf;

use snafu::{Backtrace, Snafu};

use crate::models::bar_series::BarSeries;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// Creating the destination directory failed.
    #[snafu(display("Failed to create directory {}: {source}", path.display()))]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// An I/O error while creating, writing or renaming the output file.
    #[snafu(display("I/O error on {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The CSV encoder rejected a record.
    #[snafu(display("Failed to write CSV record to {}: {source}", path.display()))]
    Csv {
        path: PathBuf,
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// An error occurred while converting the canonical `BarSeries` model into the destination format (e.g. converting to a DataFrame).
    #[snafu(display("Data conversion error: {message}"))]
    Conversion {
        message: String,
        backtrace: Backtrace,
    },
}

pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// This makes the trait flexible. For example:
    /// - A file sink might return `PathBuf`, the path to the created file.
    /// - A database sink might return `usize`, the number of rows inserted.
    type Output;

    /// Writes a `BarSeries` to the destination.
    ///
    /// Either the whole series is persisted or nothing is.
    fn write(&self, series: &BarSeries) -> Result<Self::Output, SinkError>;
}
