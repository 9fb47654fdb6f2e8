//! A collection of time-series bars for a specific symbol and timeframe.
//!
//! Both series types keep their bars strictly ascending by timestamp. The
//! invariant is checked once at construction; transforms build new series
//! and never mutate an existing one.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    bar::{Bar, RawBar},
    timeframe::Timeframe,
};

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    /// Bar `index` does not come strictly after the bar before it.
    #[error("bar {index} at {timestamp} is not after the previous bar at {previous}")]
    OutOfOrder {
        index: usize,
        timestamp: DateTime<Utc>,
        previous: DateTime<Utc>,
    },
}

/// Represents a complete set of cleaned time-series data for a single symbol.
///
/// This struct groups a vector of [`Bar`]s with their corresponding symbol
/// and [`Timeframe`], making the data set self-describing.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn try_new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, SeriesError> {
        check_ascending(bars.iter().map(|b| b.timestamp))?;
        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    pub fn empty(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Crate-internal constructor for transforms that preserve ordering by construction.
    pub(crate) fn from_sorted(symbol: String, timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        debug_assert!(check_ascending(bars.iter().map(|b| b.timestamp)).is_ok());
        Self {
            symbol,
            timeframe,
            bars,
        }
    }

    /// The symbol this data represents (e.g., "AAPL", "ESU24").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The base interval between consecutive bars.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn total_volume(&self) -> f64 {
        self.bars.iter().map(|b| b.volume).sum()
    }
}

/// A series straight from a data source, before missing values are repaired.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<RawBar>,
}

impl RawSeries {
    pub fn try_new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<RawBar>,
    ) -> Result<Self, SeriesError> {
        check_ascending(bars.iter().map(|b| b.timestamp))?;
        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[RawBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Number of bars whose volume is unknown (`None` or NaN).
    pub fn missing_volume_count(&self) -> usize {
        self.bars
            .iter()
            .filter(|b| b.normalized().volume.is_none())
            .count()
    }
}

fn check_ascending(
    mut timestamps: impl Iterator<Item = DateTime<Utc>>,
) -> Result<(), SeriesError> {
    let Some(mut previous) = timestamps.next() else {
        return Ok(());
    };
    for (i, ts) in timestamps.enumerate() {
        if ts <= previous {
            return Err(SeriesError::OutOfOrder {
                index: i + 1,
                timestamp: ts,
                previous,
            });
        }
        previous = ts;
    }
    Ok(())
}
