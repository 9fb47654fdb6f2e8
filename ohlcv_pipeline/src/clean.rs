//! Missing-value repair for raw series.
//!
//! Fill policy:
//! - open/high/low/close: forward-fill from the previous bar's value.
//! - volume: a missing value means no trades happened, so it becomes `0.0`.
//!   Volume is never forward-filled.
//!
//! `Some(NaN)` counts as missing, the same as `None`.
//!
//! A leading bar without prices has nothing to fill from and is rejected with
//! [`CleanError::MissingLeadingData`].

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::models::{
    bar::{Bar, RawBar},
    bar_series::{BarSeries, RawSeries},
};

#[derive(Debug, Error, PartialEq)]
pub enum CleanError {
    #[error("first bar at {timestamp} has no {field} to forward-fill from")]
    MissingLeadingData {
        timestamp: DateTime<Utc>,
        field: &'static str,
    },
}

/// Counts of values repaired by [`clean_with_report`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    /// Individual open/high/low/close values taken from the previous bar.
    pub prices_forward_filled: usize,
    /// Volumes set to zero.
    pub volumes_zero_filled: usize,
}

/// Repair missing values; see the module docs for the policy.
pub fn clean(raw: &RawSeries) -> Result<BarSeries, CleanError> {
    clean_with_report(raw).map(|(series, _)| series)
}

/// Like [`clean`], also returning how many values were filled.
pub fn clean_with_report(raw: &RawSeries) -> Result<(BarSeries, CleanReport), CleanError> {
    let mut report = CleanReport::default();
    let mut bars = Vec::with_capacity(raw.len());
    let mut prev: Option<Bar> = None;

    for rb in raw.bars() {
        let rb = rb.normalized();
        let bar = match prev {
            Some(p) => Bar {
                timestamp: rb.timestamp,
                open: fill(rb.open, p.open, &mut report),
                high: fill(rb.high, p.high, &mut report),
                low: fill(rb.low, p.low, &mut report),
                close: fill(rb.close, p.close, &mut report),
                volume: zero_fill(rb.volume, &mut report),
            },
            None => leading(&rb, &mut report)?,
        };
        bars.push(bar);
        prev = Some(bar);
    }

    debug!(
        bars = bars.len(),
        prices_forward_filled = report.prices_forward_filled,
        volumes_zero_filled = report.volumes_zero_filled,
        "cleaned series"
    );

    let series = BarSeries::from_sorted(raw.symbol().to_string(), raw.timeframe(), bars);
    Ok((series, report))
}

fn leading(rb: &RawBar, report: &mut CleanReport) -> Result<Bar, CleanError> {
    let require = |v: Option<f64>, field: &'static str| {
        v.ok_or(CleanError::MissingLeadingData {
            timestamp: rb.timestamp,
            field,
        })
    };
    Ok(Bar {
        timestamp: rb.timestamp,
        open: require(rb.open, "open")?,
        high: require(rb.high, "high")?,
        low: require(rb.low, "low")?,
        close: require(rb.close, "close")?,
        volume: zero_fill(rb.volume, report),
    })
}

fn fill(v: Option<f64>, previous: f64, report: &mut CleanReport) -> f64 {
    v.unwrap_or_else(|| {
        report.prices_forward_filled += 1;
        previous
    })
}

fn zero_fill(v: Option<f64>, report: &mut CleanReport) -> f64 {
    v.unwrap_or_else(|| {
        report.volumes_zero_filled += 1;
        0.0
    })
}
