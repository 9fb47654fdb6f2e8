use anyhow::Context;
use clap::Parser;
use ohlcv_pipeline::{
    cli::{commands::Cli, params::apply_overrides},
    config::PipelineConfig,
    pipeline,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the output path.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let config = apply_overrides(&cli, config);

    let report = pipeline::run(&config).context("pipeline run failed")?;
    info!(
        raw = report.raw_bars,
        resampled = report.resampled_bars,
        path = %report.output.display(),
        "done"
    );
    println!("{}", report.output.display());
    Ok(())
}
