//! Timeframe utilities for expressing uniform bar intervals.
//!
//! A [`Timeframe`] pairs a non-zero amount with a [`TimeframeUnit`], covering
//! minute, hour, day, week (Monday-based), and month buckets in UTC. It is used
//! both as the base interval of a series and as the target of a resample.
//!
//! Typical usage:
//! ```
//! use std::num::NonZeroU32;
//! use ohlcv_pipeline::models::timeframe::{Timeframe, TimeframeUnit};
//!
//! let tf: Timeframe = "5min".parse().unwrap();
//! assert_eq!(tf, Timeframe::new(NonZeroU32::new(5).unwrap(), TimeframeUnit::Minute));
//! assert_eq!(tf.to_string(), "5m");
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of seconds in a minute.
pub const SECS_PER_MINUTE: i64 = 60;
/// Number of seconds in an hour.
pub const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
/// Number of seconds in a day.
pub const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;
/// Number of seconds in a week.
pub const SECS_PER_WEEK: i64 = 7 * SECS_PER_DAY;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeframeError {
    #[error("empty timeframe")]
    Empty,

    #[error("invalid amount in timeframe '{input}'")]
    InvalidAmount { input: String },

    #[error("timeframe amount must be > 0: '{input}'")]
    ZeroAmount { input: String },

    #[error("unknown timeframe unit '{unit}' in '{input}'")]
    UnknownUnit { input: String, unit: String },
}

/// Timeframe granularity (calendar-aware where needed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeframeUnit {
    /// UTC minute
    Minute,
    /// UTC hour
    Hour,
    /// UTC day
    Day,
    /// Monday-based, UTC
    Week,
    /// calendar months, UTC
    Month,
}

impl TimeframeUnit {
    /// Width of one unit in seconds; `None` for calendar months.
    pub const fn seconds(self) -> Option<i64> {
        match self {
            TimeframeUnit::Minute => Some(SECS_PER_MINUTE),
            TimeframeUnit::Hour => Some(SECS_PER_HOUR),
            TimeframeUnit::Day => Some(SECS_PER_DAY),
            TimeframeUnit::Week => Some(SECS_PER_WEEK),
            TimeframeUnit::Month => None,
        }
    }
}

/// A timeframe = amount × unit (e.g., 5-Minute, 3-Hour, 2-Week, 6-Month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeframe {
    amount: NonZeroU32,
    unit: TimeframeUnit,
}

impl Timeframe {
    pub const ONE_MINUTE: Timeframe = Timeframe::new(NonZeroU32::MIN, TimeframeUnit::Minute);

    pub const fn new(amount: NonZeroU32, unit: TimeframeUnit) -> Self {
        Self { amount, unit }
    }

    /// Convenience constructor; returns `None` when `amount` is zero.
    pub fn minutes(amount: u32) -> Option<Self> {
        NonZeroU32::new(amount).map(|a| Self::new(a, TimeframeUnit::Minute))
    }

    pub const fn amount(&self) -> NonZeroU32 {
        self.amount
    }

    pub const fn unit(&self) -> TimeframeUnit {
        self.unit
    }

    /// Total width in seconds for fixed-size frames; `None` for months.
    pub fn fixed_seconds(&self) -> Option<i64> {
        self.unit
            .seconds()
            .map(|secs| secs * i64::from(self.amount.get()))
    }

    /// Whether buckets of `self` are whole unions of buckets of `base`.
    ///
    /// Months are treated as whole days, so any base that divides a day
    /// divides a month.
    pub fn is_multiple_of(&self, base: &Timeframe) -> bool {
        match (self.fixed_seconds(), base.fixed_seconds()) {
            (Some(target), Some(base)) => target % base == 0,
            (None, Some(base)) => SECS_PER_DAY % base == 0,
            (None, None) => self.amount.get() % base.amount.get() == 0,
            (Some(_), None) => false,
        }
    }
}

/// Display/parse for CLI ergonomics (`"5m"`, `"1D"`, `"6M"`)
impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.amount.get();
        let u = match self.unit {
            TimeframeUnit::Minute => "m",
            TimeframeUnit::Hour => "h",
            TimeframeUnit::Day => "D",
            TimeframeUnit::Week => "W",
            TimeframeUnit::Month => "M",
        };
        write!(f, "{a}{u}")
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 5m / 5min / 5T / 3h / 1D / 1W / 6M / 6mo
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeframeError::Empty);
        }
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);
        // a bare unit ("min", "H") means an amount of one
        let amount_num: u32 = if digits.is_empty() {
            1
        } else {
            digits.parse().map_err(|_| TimeframeError::InvalidAmount {
                input: s.to_string(),
            })?
        };
        let amount = NonZeroU32::new(amount_num).ok_or_else(|| TimeframeError::ZeroAmount {
            input: s.to_string(),
        })?;
        let unit = match unit {
            "m" | "min" | "T" => TimeframeUnit::Minute,
            "h" | "H" => TimeframeUnit::Hour,
            "d" | "D" => TimeframeUnit::Day,
            "w" | "W" => TimeframeUnit::Week,
            "M" | "mo" | "MS" => TimeframeUnit::Month,
            other => {
                return Err(TimeframeError::UnknownUnit {
                    input: s.to_string(),
                    unit: other.to_string(),
                });
            }
        };
        Ok(Timeframe::new(amount, unit))
    }
}

impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tf(amount: u32, unit: TimeframeUnit) -> Timeframe {
        Timeframe::new(NonZeroU32::new(amount).unwrap(), unit)
    }

    #[test]
    fn parses_short_and_pandas_style_units() {
        assert_eq!("5m".parse::<Timeframe>().unwrap(), tf(5, TimeframeUnit::Minute));
        assert_eq!("15min".parse::<Timeframe>().unwrap(), tf(15, TimeframeUnit::Minute));
        assert_eq!("1H".parse::<Timeframe>().unwrap(), tf(1, TimeframeUnit::Hour));
        assert_eq!("1D".parse::<Timeframe>().unwrap(), tf(1, TimeframeUnit::Day));
        assert_eq!("2W".parse::<Timeframe>().unwrap(), tf(2, TimeframeUnit::Week));
        assert_eq!("6M".parse::<Timeframe>().unwrap(), tf(6, TimeframeUnit::Month));
        assert_eq!("min".parse::<Timeframe>().unwrap(), Timeframe::ONE_MINUTE);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for s in ["5m", "3h", "1D", "1W", "6M"] {
            assert_eq!(s.parse::<Timeframe>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<Timeframe>(), Err(TimeframeError::Empty));
        assert!(matches!(
            "0m".parse::<Timeframe>(),
            Err(TimeframeError::ZeroAmount { .. })
        ));
        assert!(matches!(
            "5x".parse::<Timeframe>(),
            Err(TimeframeError::UnknownUnit { .. })
        ));
        assert!(matches!(
            "99999999999m".parse::<Timeframe>(),
            Err(TimeframeError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn multiples() {
        let m1 = Timeframe::ONE_MINUTE;
        let m5 = tf(5, TimeframeUnit::Minute);
        let m7 = tf(7, TimeframeUnit::Minute);
        assert!(m5.is_multiple_of(&m1));
        assert!(!m7.is_multiple_of(&m5));
        assert!(!m1.is_multiple_of(&m5));
        assert!(tf(1, TimeframeUnit::Hour).is_multiple_of(&m5));
        assert!(tf(1, TimeframeUnit::Month).is_multiple_of(&m5));
        assert!(!tf(1, TimeframeUnit::Month).is_multiple_of(&m7));
        assert!(tf(6, TimeframeUnit::Month).is_multiple_of(&tf(3, TimeframeUnit::Month)));
        assert!(!m5.is_multiple_of(&tf(1, TimeframeUnit::Month)));
    }
}
