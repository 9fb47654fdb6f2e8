use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

use crate::{io::csv_sink::HeaderStyle, models::timeframe::Timeframe};

use super::params::parse_start;

/// Generate synthetic minute bars, clean them, resample them and write a CSV.
///
/// With no arguments the built-in defaults are used.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional TOML config file; flags given here override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of 1-minute bars to simulate
    #[arg(long)]
    pub records: Option<usize>,

    /// Random seed for the simulator
    #[arg(long, conflicts_with = "no_seed")]
    pub seed: Option<u64>,

    /// Seed the simulator from OS entropy (non-reproducible run)
    #[arg(long)]
    pub no_seed: bool,

    /// First bar timestamp, RFC 3339 or "YYYY-MM-DD HH:MM:SS" (UTC)
    #[arg(long, value_parser = parse_start)]
    pub start: Option<DateTime<Utc>>,

    /// Price of the first open
    #[arg(long)]
    pub initial_price: Option<f64>,

    /// Target bucket, e.g. "5m", "15min", "1h", "1D"
    #[arg(short, long)]
    pub bucket: Option<Timeframe>,

    /// Output file name inside the output directory
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output directory (default: <crate root>/data)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// CSV header naming
    #[arg(long, value_enum)]
    pub header_style: Option<HeaderStyle>,
}
