use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use ohlcv_pipeline::{
    bucket::bucket_id,
    clean::clean,
    models::{bar::RawBar, bar_series::RawSeries, timeframe::Timeframe},
    resample::resample,
};
use proptest::prelude::*;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 10, 9, 30, 0).unwrap()
}

/// (minute gap to previous bar, open, close, upper wick, lower wick, volume)
type Row = (i64, f64, f64, f64, f64, Option<u32>);

fn rows() -> impl Strategy<Value = Vec<Row>> {
    proptest::collection::vec(
        (
            1i64..4,
            100.0f64..200.0,
            100.0f64..200.0,
            0.0f64..2.0,
            0.0f64..2.0,
            proptest::option::weighted(0.9, 0u32..1000),
        ),
        0..300,
    )
}

fn raw_series(rows: &[Row]) -> RawSeries {
    let mut ts = t0();
    let bars = rows
        .iter()
        .map(|&(gap, open, close, up, down, volume)| {
            ts += Duration::minutes(gap);
            RawBar {
                timestamp: ts,
                open: Some(open),
                high: Some(open.max(close) + up),
                low: Some(open.min(close) - down),
                close: Some(close),
                volume: volume.map(f64::from),
            }
        })
        .collect();
    RawSeries::try_new("SIM", Timeframe::ONE_MINUTE, bars).unwrap()
}

fn bucket() -> impl Strategy<Value = Timeframe> {
    prop::sample::select(vec![1u32, 2, 3, 5, 10, 15, 30, 60, 240])
        .prop_map(|m| Timeframe::minutes(m).unwrap())
}

proptest! {
    #[test]
    fn clean_keeps_shape_and_present_values(rows in rows()) {
        let raw = raw_series(&rows);
        let cleaned = clean(&raw).unwrap();

        prop_assert_eq!(cleaned.len(), raw.len());
        for (r, c) in raw.bars().iter().zip(cleaned.bars()) {
            prop_assert_eq!(r.timestamp, c.timestamp);
            prop_assert_eq!(r.open, Some(c.open));
            prop_assert_eq!(r.high, Some(c.high));
            prop_assert_eq!(r.low, Some(c.low));
            prop_assert_eq!(r.close, Some(c.close));
            prop_assert_eq!(r.volume.unwrap_or(0.0), c.volume);
        }
    }

    #[test]
    fn resample_conserves_volume(rows in rows(), tf in bucket()) {
        let cleaned = clean(&raw_series(&rows)).unwrap();
        let out = resample(&cleaned, tf).unwrap();
        // integer volumes keep float sums exact regardless of grouping
        prop_assert_eq!(out.total_volume(), cleaned.total_volume());
    }

    #[test]
    fn resampled_bars_are_consistent(rows in rows(), tf in bucket()) {
        let cleaned = clean(&raw_series(&rows)).unwrap();
        let out = resample(&cleaned, tf).unwrap();
        for b in out.bars() {
            prop_assert!(b.low <= b.open && b.open <= b.high);
            prop_assert!(b.low <= b.close && b.close <= b.high);
        }
    }

    #[test]
    fn resampled_timestamps_are_ascending_and_aligned(rows in rows(), tf in bucket()) {
        let cleaned = clean(&raw_series(&rows)).unwrap();
        let out = resample(&cleaned, tf).unwrap();
        let width = tf.fixed_seconds().unwrap();

        for pair in out.bars().windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
        for b in out.bars() {
            prop_assert_eq!(b.timestamp.timestamp().rem_euclid(width), 0);
        }

        // one output bar per occupied bucket, none for empty ones
        let occupied: BTreeSet<i64> = cleaned
            .bars()
            .iter()
            .map(|b| bucket_id(b.timestamp, tf))
            .collect();
        prop_assert_eq!(out.len(), occupied.len());
    }

    #[test]
    fn first_and_last_bar_of_each_bucket_give_open_and_close(rows in rows(), tf in bucket()) {
        let cleaned = clean(&raw_series(&rows)).unwrap();
        let out = resample(&cleaned, tf).unwrap();
        for b in out.bars() {
            let end = b.timestamp + Duration::seconds(tf.fixed_seconds().unwrap());
            let members: Vec<_> = cleaned
                .bars()
                .iter()
                .filter(|x| x.timestamp >= b.timestamp && x.timestamp < end)
                .collect();
            prop_assert!(!members.is_empty());
            prop_assert_eq!(b.open, members[0].open);
            prop_assert_eq!(b.close, members[members.len() - 1].close);
        }
    }
}

#[test]
fn resampling_an_empty_series_is_not_an_error() {
    let cleaned = clean(&raw_series(&[])).unwrap();
    let out = resample(&cleaned, Timeframe::minutes(5).unwrap()).unwrap();
    assert!(out.is_empty());
}
