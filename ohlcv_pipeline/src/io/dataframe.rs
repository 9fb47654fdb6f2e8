//! Columnar export through polars (`dataframe` feature).

use std::fs::{self, File};
use std::path::PathBuf;

use polars::prelude::*;
use polars_io::SerWriter;
use polars_io::ipc::IpcWriter;
use snafu::ResultExt;
use tracing::info;

use crate::io::sink::{ConversionSnafu, CreateDirSnafu, DataSink, IoSnafu, SinkError};
use crate::models::bar_series::BarSeries;

/// Convert a series into a `DataFrame` with a UTC millisecond `timestamp`
/// column followed by `open, high, low, close, volume`.
pub fn bar_series_to_dataframe(series: &BarSeries) -> PolarsResult<DataFrame> {
    let bars = series.bars();
    let ts: Vec<i64> = bars.iter().map(|b| b.timestamp.timestamp_millis()).collect();
    let mut df = df!(
        "timestamp" => ts,
        "open" => bars.iter().map(|b| b.open).collect::<Vec<_>>(),
        "high" => bars.iter().map(|b| b.high).collect::<Vec<_>>(),
        "low" => bars.iter().map(|b| b.low).collect::<Vec<_>>(),
        "close" => bars.iter().map(|b| b.close).collect::<Vec<_>>(),
        "volume" => bars.iter().map(|b| b.volume).collect::<Vec<_>>(),
    )?;
    let stamped = df.column("timestamp")?.cast(&DataType::Datetime(
        TimeUnit::Milliseconds,
        Some("UTC".into()),
    ))?;
    df.with_column(stamped)?;
    Ok(df)
}

/// Writes a series as an Arrow IPC (Feather) file at `<dir>/<filename>`.
#[derive(Debug, Clone)]
pub struct FeatherSink {
    dir: PathBuf,
    filename: String,
}

impl FeatherSink {
    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
        }
    }
}

impl DataSink for FeatherSink {
    type Output = PathBuf;

    fn write(&self, series: &BarSeries) -> Result<PathBuf, SinkError> {
        let mut df = bar_series_to_dataframe(series).map_err(|e| {
            ConversionSnafu {
                message: e.to_string(),
            }
            .build()
        })?;

        fs::create_dir_all(&self.dir).context(CreateDirSnafu { path: &self.dir })?;
        let output_path = self.dir.join(&self.filename);

        // Polars' IPC writer is compatible with Arrow/Feather readers.
        let mut file = File::create(&output_path).context(IoSnafu { path: &output_path })?;
        IpcWriter::new(&mut file).finish(&mut df).map_err(|e| {
            ConversionSnafu {
                message: e.to_string(),
            }
            .build()
        })?;

        info!(path = %output_path.display(), rows = df.height(), "wrote feather");
        Ok(output_path)
    }
}
