//! UTC bucket mapping utilities.
//!
//! - One stable epoch: Unix (1970-01-01T00:00:00Z). Every fixed-width bucket
//!   starts at a whole multiple of its width since the epoch, so any width
//!   that divides a day is also aligned to midnight UTC.
//! - Fixed-size frames (minute/hour/day): second-based math.
//! - Week: Monday 00:00:00Z aligned using a week epoch of 1969-12-29.
//! - Month: linear (year, month) indexing relative to 1970-01.
//!
//! Bucket ids are signed so timestamps before 1970 map to negative ids
//! instead of wrapping.

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Utc};

use crate::models::timeframe::{
    SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE, SECS_PER_WEEK, Timeframe, TimeframeUnit,
};

/// Unix epoch start (1970-01-01T00:00:00Z).
pub const EPOCH_UNIX: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// shift so Monday 1969-12-29 00:00Z becomes index 0
const WEEK_MONDAY_ANCHOR_OFFSET_SECS: i64 = 3 * SECS_PER_DAY; // +3d

/// Compute the bucket id for a UTC timestamp.
pub fn bucket_id(ts_utc: DateTime<Utc>, tf: Timeframe) -> i64 {
    let amount = i64::from(tf.amount().get());
    match tf.unit() {
        TimeframeUnit::Minute => id_fixed(ts_utc, SECS_PER_MINUTE * amount),
        TimeframeUnit::Hour => id_fixed(ts_utc, SECS_PER_HOUR * amount),
        TimeframeUnit::Day => id_fixed(ts_utc, SECS_PER_DAY * amount),
        TimeframeUnit::Week => id_week(ts_utc, amount),
        TimeframeUnit::Month => id_month(ts_utc, amount),
    }
}

/// Get the UTC start instant for a bucket id.
///
/// Returns `None` when the start falls outside the range `DateTime<Utc>` can
/// represent, which only happens for very wide buckets or far-off timestamps.
pub fn bucket_start_utc(id: i64, tf: Timeframe) -> Option<DateTime<Utc>> {
    let amount = i64::from(tf.amount().get());
    match tf.unit() {
        TimeframeUnit::Minute => start_fixed(id, SECS_PER_MINUTE * amount),
        TimeframeUnit::Hour => start_fixed(id, SECS_PER_HOUR * amount),
        TimeframeUnit::Day => start_fixed(id, SECS_PER_DAY * amount),
        TimeframeUnit::Week => start_week(id, amount),
        TimeframeUnit::Month => start_month(id, amount),
    }
}

fn epoch_plus(secs: i64) -> Option<DateTime<Utc>> {
    EPOCH_UNIX.checked_add_signed(TimeDelta::try_seconds(secs)?)
}

// ----- fixed-size internals (minute/hour/day) -----

fn id_fixed(ts_utc: DateTime<Utc>, bucket_secs: i64) -> i64 {
    ts_utc.timestamp().div_euclid(bucket_secs)
}

fn start_fixed(id: i64, bucket_secs: i64) -> Option<DateTime<Utc>> {
    epoch_plus(id.checked_mul(bucket_secs)?)
}

// ----- week internals (Monday-aligned) -----

fn id_week(ts_utc: DateTime<Utc>, amount: i64) -> i64 {
    let width = SECS_PER_WEEK * amount;
    (ts_utc.timestamp() + WEEK_MONDAY_ANCHOR_OFFSET_SECS).div_euclid(width)
}

fn start_week(id: i64, amount: i64) -> Option<DateTime<Utc>> {
    let since_anchor = id.checked_mul(SECS_PER_WEEK * amount)?;
    // subtract the +3d added on the way in
    epoch_plus(since_anchor.checked_sub(WEEK_MONDAY_ANCHOR_OFFSET_SECS)?)
}

// ----- month internals (calendar-aware) -----

fn id_month(ts_utc: DateTime<Utc>, amount: i64) -> i64 {
    // Linear month index relative to 1970-01 (index 0).
    let y = i64::from(ts_utc.year());
    let m = i64::from(ts_utc.month()); // 1..=12
    let idx = (y - 1970) * 12 + (m - 1);
    idx.div_euclid(amount)
}

fn start_month(id: i64, amount: i64) -> Option<DateTime<Utc>> {
    let start_idx = id.checked_mul(amount)?;
    let y = i32::try_from(1970 + start_idx.div_euclid(12)).ok()?;
    let month = (start_idx.rem_euclid(12) + 1) as u32; // 1..=12
    Utc.with_ymd_and_hms(y, month, 1, 0, 0, 0).single()
}
