//! Aggregation of fine-grained bars into coarser, epoch-aligned buckets.
//!
//! Per-bucket reduction rules:
//!
//! | field     | rule                          |
//! |-----------|-------------------------------|
//! | timestamp | bucket start                  |
//! | open      | open of the first bar         |
//! | high      | max of highs                  |
//! | low       | min of lows                   |
//! | close     | close of the last bar         |
//! | volume    | sum of volumes                |
//!
//! Buckets that contain no input bars produce no output bar. Bucket
//! boundaries come from [`crate::bucket`], not from counting input rows, so
//! gaps in the input never shift later buckets.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tracing::debug;

use crate::{
    bucket::{bucket_id, bucket_start_utc},
    models::{
        bar::Bar,
        bar_series::BarSeries,
        timeframe::{SECS_PER_MINUTE, Timeframe},
    },
};

#[derive(Debug, Error, PartialEq)]
pub enum ResampleError {
    #[error("bucket duration {target} is not a positive multiple of the base interval {base}")]
    InvalidBucketDuration { base: String, target: String },

    #[error("the {target} bucket holding {timestamp} starts outside the supported date range")]
    BucketOutOfRange {
        target: String,
        timestamp: DateTime<Utc>,
    },
}

/// Resample `series` into buckets of width `target`.
///
/// `target` must be a whole multiple of the series' base timeframe. An empty
/// input yields an empty output.
pub fn resample(series: &BarSeries, target: Timeframe) -> Result<BarSeries, ResampleError> {
    let base = series.timeframe();
    if !target.is_multiple_of(&base) {
        return Err(ResampleError::InvalidBucketDuration {
            base: base.to_string(),
            target: target.to_string(),
        });
    }

    let mut out: Vec<Bar> = Vec::new();
    let mut current: Option<(i64, Bar)> = None;

    for bar in series.bars() {
        let id = bucket_id(bar.timestamp, target);
        if let Some((cur_id, acc)) = current.as_mut() {
            if *cur_id == id {
                acc.high = acc.high.max(bar.high);
                acc.low = acc.low.min(bar.low);
                acc.close = bar.close;
                acc.volume += bar.volume;
                continue;
            }
        }
        let start =
            bucket_start_utc(id, target).ok_or_else(|| ResampleError::BucketOutOfRange {
                target: target.to_string(),
                timestamp: bar.timestamp,
            })?;
        let opened = Bar {
            timestamp: start,
            ..*bar
        };
        if let Some((_, done)) = current.replace((id, opened)) {
            out.push(done);
        }
    }
    if let Some((_, done)) = current {
        out.push(done);
    }

    debug!(
        input = series.len(),
        output = out.len(),
        from = %base,
        to = %target,
        "resampled series"
    );

    Ok(BarSeries::from_sorted(
        series.symbol().to_string(),
        target,
        out,
    ))
}

/// Resample using a plain duration, which must be a positive whole number of minutes.
pub fn resample_every(series: &BarSeries, every: TimeDelta) -> Result<BarSeries, ResampleError> {
    let invalid = || ResampleError::InvalidBucketDuration {
        base: series.timeframe().to_string(),
        target: format!("{}s", every.num_seconds()),
    };
    if every <= TimeDelta::zero() || every.subsec_nanos() != 0 {
        return Err(invalid());
    }
    let secs = every.num_seconds();
    if secs % SECS_PER_MINUTE != 0 {
        return Err(invalid());
    }
    let minutes = u32::try_from(secs / SECS_PER_MINUTE).map_err(|_| invalid())?;
    let target = Timeframe::minutes(minutes).ok_or_else(invalid)?;
    resample(series, target)
}
