//! The four-stage run: generate → clean → resample → sink.
//!
//! Stages run strictly in order. Each one borrows the previous stage's series
//! and returns a new one; the first error aborts the run and, because the
//! sink writes atomically, no output file is left behind.

use tracing::{info, info_span};

use crate::{
    clean::{CleanReport, clean_with_report},
    config::PipelineConfig,
    errors::Error,
    io::{csv_sink::CsvSink, sink::DataSink},
    models::timeframe::Timeframe,
    providers::{DataProvider, simulated::SimulatedProvider},
    resample::resample,
};

/// What happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport<O> {
    pub raw_bars: usize,
    pub missing_volume: usize,
    pub clean: CleanReport,
    pub resampled_bars: usize,
    /// Whatever the sink returned, e.g. the written path.
    pub output: O,
}

/// Run the pipeline against any provider and sink.
pub fn run_with<P, S>(
    provider: &mut P,
    bucket: Timeframe,
    sink: &S,
) -> Result<PipelineReport<S::Output>, Error>
where
    P: DataProvider + ?Sized,
    S: DataSink + ?Sized,
{
    let span = info_span!("pipeline", %bucket);
    let _enter = span.enter();

    let raw = provider.fetch_bars()?;
    let missing_volume = raw.missing_volume_count();
    info!(bars = raw.len(), missing_volume, "stage 1: raw bars ready");

    let (cleaned, clean) = clean_with_report(&raw)?;
    info!(
        prices_forward_filled = clean.prices_forward_filled,
        volumes_zero_filled = clean.volumes_zero_filled,
        "stage 2: cleaned"
    );

    let resampled = resample(&cleaned, bucket)?;
    info!(
        bars = resampled.len(),
        volume = resampled.total_volume(),
        "stage 3: resampled"
    );

    let output = sink.write(&resampled)?;
    info!("stage 4: written");

    Ok(PipelineReport {
        raw_bars: raw.len(),
        missing_volume,
        clean,
        resampled_bars: resampled.len(),
        output,
    })
}

/// Run the default pipeline described by `config`: simulated bars into a CSV file.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport<std::path::PathBuf>, Error> {
    let mut provider = SimulatedProvider::new(config.simulation.clone())?;
    let sink = CsvSink::new(config.output.resolved_dir(), config.output.filename.clone())
        .with_header(config.output.header);
    run_with(&mut provider, config.resample.bucket, &sink)
}
