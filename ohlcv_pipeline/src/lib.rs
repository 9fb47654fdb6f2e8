//! Synthetic OHLCV pipeline: generate raw minute bars, clean missing values,
//! resample into coarser epoch-aligned buckets, and write the result to disk.
//!
//! ```
//! use ohlcv_pipeline::{
//!     clean::clean,
//!     models::timeframe::Timeframe,
//!     providers::{DataProvider, simulated::{SimulatedProvider, SimulationParams}},
//!     resample::resample,
//! };
//!
//! let params = SimulationParams { num_records: 60, ..SimulationParams::default() };
//! let raw = SimulatedProvider::new(params).unwrap().fetch_bars().unwrap();
//! let bars = resample(&clean(&raw).unwrap(), "15m".parse().unwrap()).unwrap();
//! assert_eq!(bars.len(), 4);
//! assert_eq!(bars.timeframe(), Timeframe::minutes(15).unwrap());
//! ```

pub mod bucket;
pub mod clean;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod resample;

pub use errors::Error;
