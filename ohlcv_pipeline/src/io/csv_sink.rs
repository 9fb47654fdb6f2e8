//! CSV file sink.
//!
//! One row per bar, ascending, timestamps formatted as `%Y-%m-%d %H:%M:%S`
//! in UTC. The file is first written under a temporary name in the target
//! directory and renamed into place once complete, so a failed write never
//! leaves a truncated file behind.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracing::{info, warn};

use crate::{
    io::sink::{CreateDirSnafu, CsvSnafu, DataSink, IoSnafu, SinkError},
    models::bar_series::BarSeries,
};

/// Timestamp layout used for the first column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output file name of the default run.
pub const DEFAULT_FILENAME: &str = "NQ_5min_processed.csv";

/// `<crate root>/data`, the default output directory.
pub fn project_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Header naming for the CSV output.
///
/// [`CsvSink::new`] starts with `Lower`; the binary's default config picks `Pandas`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum HeaderStyle {
    /// `timestamp,open,high,low,close,volume`
    #[default]
    Lower,
    /// `timestamp,Open,High,Low,Close,Volume`
    Pandas,
}

impl HeaderStyle {
    pub fn columns(self) -> [&'static str; 6] {
        match self {
            HeaderStyle::Lower => ["timestamp", "open", "high", "low", "close", "volume"],
            HeaderStyle::Pandas => ["timestamp", "Open", "High", "Low", "Close", "Volume"],
        }
    }
}

#[derive(Serialize)]
struct Row {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Writes a [`BarSeries`] to `<dir>/<filename>`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
    filename: String,
    header: HeaderStyle,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
            header: HeaderStyle::default(),
        }
    }

    pub fn with_header(mut self, header: HeaderStyle) -> Self {
        self.header = header;
        self
    }

    /// Final path of the output file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    fn write_to(&self, file: File, tmp: &Path, series: &BarSeries) -> Result<(), SinkError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.write_record(self.header.columns())
            .context(CsvSnafu { path: tmp })?;
        for bar in series.bars() {
            wtr.serialize(Row {
                timestamp: bar.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            })
            .context(CsvSnafu { path: tmp })?;
        }
        let mut file = wtr
            .into_inner()
            .map_err(|e| e.into_error())
            .context(IoSnafu { path: tmp })?;
        file.flush().context(IoSnafu { path: tmp })?;
        file.sync_all().context(IoSnafu { path: tmp })
    }
}

impl DataSink for CsvSink {
    type Output = PathBuf;

    fn write(&self, series: &BarSeries) -> Result<PathBuf, SinkError> {
        fs::create_dir_all(&self.dir).context(CreateDirSnafu { path: &self.dir })?;

        let target = self.path();
        let tmp = self.dir.join(format!(".{}.tmp", self.filename));
        let file = File::create(&tmp).context(IoSnafu { path: &tmp })?;

        let written = self
            .write_to(file, &tmp, series)
            .and_then(|()| fs::rename(&tmp, &target).context(IoSnafu { path: &target }));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!(path = %tmp.display(), error = %cleanup, "could not remove partial output");
            }
            return Err(e);
        }

        info!(path = %target.display(), rows = series.len(), "wrote csv");
        Ok(target)
    }
}
