//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! Two shapes exist: [`RawBar`] is what a [`DataProvider`](crate::providers::DataProvider)
//! hands out, with every value possibly missing; [`Bar`] is the cleaned form
//! consumed by the resampler and the sinks.

use chrono::{DateTime, Utc};

/// A single time-series bar (OHLCV) for a given timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// The timestamp for this bar (UTC). For resampled bars, the bucket start.
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: f64,
}

/// A bar as delivered by a source, before cleaning.
///
/// `None` means the value is unknown, which is distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// Build a raw bar from possibly-NaN floats. NaN is stored as `None`.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open: present(open),
            high: present(high),
            low: present(low),
            close: present(close),
            volume: present(volume),
        }
    }

    /// The same bar with any `Some(NaN)` turned into `None`.
    ///
    /// The fields are public, so a source can skip [`RawBar::new`]; consumers
    /// call this before deciding what is missing.
    pub fn normalized(self) -> Self {
        Self {
            timestamp: self.timestamp,
            open: self.open.and_then(present),
            high: self.high.and_then(present),
            low: self.low.and_then(present),
            close: self.close.and_then(present),
            volume: self.volume.and_then(present),
        }
    }
}

impl From<Bar> for RawBar {
    fn from(bar: Bar) -> Self {
        Self {
            timestamp: bar.timestamp,
            open: Some(bar.open),
            high: Some(bar.high),
            low: Some(bar.low),
            close: Some(bar.close),
            volume: Some(bar.volume),
        }
    }
}

fn present(v: f64) -> Option<f64> {
    (!v.is_nan()).then_some(v)
}
