use chrono::{DateTime, NaiveDateTime, Utc};

use crate::config::PipelineConfig;

use super::commands::Cli;

/// Parse a start timestamp: RFC 3339 with offset, or a naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` taken as UTC.
pub fn parse_start(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid start timestamp: {s}"))
}

/// Layer command-line flags over a loaded config. Flags win.
pub fn apply_overrides(cli: &Cli, mut config: PipelineConfig) -> PipelineConfig {
    let sim = &mut config.simulation;
    if let Some(n) = cli.records {
        sim.num_records = n;
    }
    if cli.no_seed {
        sim.seed = None;
    } else if let Some(seed) = cli.seed {
        sim.seed = Some(seed);
    }
    if let Some(start) = cli.start {
        sim.start = start;
    }
    if let Some(price) = cli.initial_price {
        sim.initial_price = price;
    }
    if let Some(bucket) = cli.bucket {
        config.resample.bucket = bucket;
    }
    if let Some(name) = &cli.output {
        config.output.filename = name.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.dir = Some(dir.clone());
    }
    if let Some(style) = cli.header_style {
        config.output.header = style;
    }
    config
}
