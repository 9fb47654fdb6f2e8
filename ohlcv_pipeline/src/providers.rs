//! Provider abstraction for raw bar sources.
//!
//! This module defines the [`DataProvider`] trait, the interface the pipeline
//! uses to obtain a [`RawSeries`]. Values in the returned series may be
//! missing; the cleaner repairs them downstream.
//!
//! The only bundled implementation is [`simulated::SimulatedProvider`], a
//! seeded random-walk generator. The trait supports dynamic dispatch
//! (`dyn DataProvider`) so a file- or exchange-backed source can be swapped in.
//!
//! # Example
//!
//! ```rust
//! use ohlcv_pipeline::models::{bar_series::RawSeries, timeframe::Timeframe};
//! use ohlcv_pipeline::providers::{DataProvider, ProviderError};
//!
//! struct Empty;
//!
//! impl DataProvider for Empty {
//!     fn fetch_bars(&mut self) -> Result<RawSeries, ProviderError> {
//!         Ok(RawSeries::try_new("NONE", Timeframe::ONE_MINUTE, vec![]).unwrap())
//!     }
//! }
//! ```

pub mod simulated;

use snafu::{Backtrace, Snafu};

use crate::models::bar_series::{RawSeries, SeriesError};

/// Trait for obtaining a raw time-series from some source.
pub trait DataProvider {
    /// Produce the next raw series.
    ///
    /// Takes `&mut self` because sources such as the simulator advance
    /// internal state (their random generator) on every call.
    fn fetch_bars(&mut self) -> Result<RawSeries, ProviderError>;
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// The provider parameters were invalid.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    InvalidParams {
        message: String,
        backtrace: Backtrace,
    },

    /// The provider produced bars that do not form a valid series.
    #[snafu(display("Provider produced an invalid series: {source}"))]
    InvalidSeries {
        source: SeriesError,
        backtrace: Backtrace,
    },
}
