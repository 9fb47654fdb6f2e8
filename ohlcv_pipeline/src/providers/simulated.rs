//! Seeded random-walk bar generator.
//!
//! Produces a [`RawSeries`] of evenly spaced bars:
//! - `close` is a Gaussian random walk scaled by `step_scale` around `initial_price`.
//! - `open` is the previous close (`initial_price` for the first bar).
//! - `high`/`low` widen `max(open, close)`/`min(open, close)` by uniform noise in `[0, wick_noise)`.
//! - `volume` is a uniform integer in `[volume_min, volume_max)`, with exactly
//!   `round(missing_volume_fraction * num_records)` rows left missing.
//!
//! All randomness comes from the [`StdRng`] owned by the provider, so two
//! providers built with the same seed emit identical series.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};
use rand_distr::StandardNormal;
use serde::Deserialize;
use snafu::{ResultExt, ensure};
use tracing::info;

use crate::{
    models::{bar::RawBar, bar_series::RawSeries, timeframe::Timeframe},
    providers::{DataProvider, InvalidParamsSnafu, InvalidSeriesSnafu, ProviderError},
};

/// Knobs for [`SimulatedProvider`]. Every field has a default, so a partial
/// TOML table is enough.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationParams {
    pub symbol: String,
    pub num_records: usize,
    pub start: DateTime<Utc>,
    pub interval: Timeframe,
    pub initial_price: f64,
    /// `None` draws the seed from the OS.
    pub seed: Option<u64>,
    pub step_scale: f64,
    pub wick_noise: f64,
    pub volume_min: u32,
    /// Exclusive upper bound.
    pub volume_max: u32,
    pub missing_volume_fraction: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            symbol: "SIM".to_string(),
            num_records: 1000,
            start: default_start(),
            interval: Timeframe::ONE_MINUTE,
            initial_price: 18000.0,
            seed: Some(44),
            step_scale: 0.5,
            wick_noise: 0.2,
            volume_min: 50,
            volume_max: 200,
            missing_volume_fraction: 0.05,
        }
    }
}

fn default_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 10, 9, 30, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

impl SimulationParams {
    fn validate(&self) -> Result<(), ProviderError> {
        ensure!(
            self.initial_price.is_finite() && self.initial_price > 0.0,
            InvalidParamsSnafu {
                message: format!("initial_price must be > 0, got {}", self.initial_price)
            }
        );
        ensure!(
            self.step_scale.is_finite() && self.step_scale >= 0.0,
            InvalidParamsSnafu {
                message: format!("step_scale must be >= 0, got {}", self.step_scale)
            }
        );
        ensure!(
            self.wick_noise.is_finite() && self.wick_noise >= 0.0,
            InvalidParamsSnafu {
                message: format!("wick_noise must be >= 0, got {}", self.wick_noise)
            }
        );
        ensure!(
            self.volume_min < self.volume_max,
            InvalidParamsSnafu {
                message: format!(
                    "volume range [{}, {}) is empty",
                    self.volume_min, self.volume_max
                )
            }
        );
        ensure!(
            (0.0..=1.0).contains(&self.missing_volume_fraction),
            InvalidParamsSnafu {
                message: format!(
                    "missing_volume_fraction must be within [0, 1], got {}",
                    self.missing_volume_fraction
                )
            }
        );
        let Some(step) = self.interval.fixed_seconds() else {
            return InvalidParamsSnafu {
                message: format!("interval {} has no fixed width", self.interval),
            }
            .fail();
        };
        ensure!(
            self.last_timestamp(step).is_some(),
            InvalidParamsSnafu {
                message: format!(
                    "{} bars of {} from {} run past the supported date range",
                    self.num_records, self.interval, self.start
                )
            }
        );
        Ok(())
    }

    fn last_timestamp(&self, step_secs: i64) -> Option<DateTime<Utc>> {
        let steps = i64::try_from(self.num_records.saturating_sub(1)).ok()?;
        let span = TimeDelta::try_seconds(steps.checked_mul(step_secs)?)?;
        self.start.checked_add_signed(span)
    }
}

/// Random-walk [`DataProvider`].
pub struct SimulatedProvider {
    params: SimulationParams,
    rng: StdRng,
}

impl SimulatedProvider {
    /// Build a provider seeded from `params.seed`, or from OS entropy when unset.
    pub fn new(params: SimulationParams) -> Result<Self, ProviderError> {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(params, rng)
    }

    /// Build a provider around an explicit generator; `params.seed` is ignored.
    pub fn with_rng(params: SimulationParams, rng: StdRng) -> Result<Self, ProviderError> {
        params.validate()?;
        Ok(Self { params, rng })
    }
}

impl DataProvider for SimulatedProvider {
    fn fetch_bars(&mut self) -> Result<RawSeries, ProviderError> {
        let p = &self.params;
        let n = p.num_records;
        let step = TimeDelta::seconds(p.interval.fixed_seconds().unwrap_or_default());

        let mut bars = Vec::with_capacity(n);
        let mut walk = 0.0_f64;
        let mut prev_close = p.initial_price;
        let mut ts = p.start;

        for i in 0..n {
            // validate() bounds the last timestamp, not the one after it
            if i > 0 {
                ts += step;
            }
            let z: f64 = self.rng.sample(StandardNormal);
            walk += z;
            let close = p.initial_price + walk * p.step_scale;
            let open = prev_close;
            let high = open.max(close) + self.rng.random::<f64>() * p.wick_noise;
            let low = open.min(close) - self.rng.random::<f64>() * p.wick_noise;
            let volume = f64::from(self.rng.random_range(p.volume_min..p.volume_max));

            bars.push(RawBar {
                timestamp: ts,
                open: Some(open),
                high: Some(high),
                low: Some(low),
                close: Some(close),
                volume: Some(volume),
            });
            prev_close = close;
        }

        let missing = ((p.missing_volume_fraction * n as f64).round() as usize).min(n);
        for i in index::sample(&mut self.rng, n, missing) {
            bars[i].volume = None;
        }

        info!(
            symbol = %p.symbol,
            records = n,
            missing_volume = missing,
            "simulated raw bars"
        );

        RawSeries::try_new(p.symbol.clone(), p.interval, bars).context(InvalidSeriesSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(n: usize) -> SimulationParams {
        SimulationParams {
            num_records: n,
            ..SimulationParams::default()
        }
    }

    #[test]
    fn generates_requested_shape() {
        let mut provider = SimulatedProvider::new(small(100)).unwrap();
        let raw = provider.fetch_bars().unwrap();

        assert_eq!(raw.len(), 100);
        assert_eq!(raw.missing_volume_count(), 5);
        assert_eq!(raw.bars()[0].timestamp, default_start());
        assert_eq!(
            raw.bars()[99].timestamp - raw.bars()[0].timestamp,
            TimeDelta::minutes(99)
        );
        assert_eq!(raw.bars()[0].open, Some(18000.0));
    }

    #[test]
    fn bars_are_internally_consistent() {
        let mut provider = SimulatedProvider::new(small(500)).unwrap();
        let raw = provider.fetch_bars().unwrap();

        for pair in raw.bars().windows(2) {
            assert_eq!(pair[1].open, pair[0].close);
        }
        for b in raw.bars() {
            let (o, h, l, c) = (
                b.open.unwrap(),
                b.high.unwrap(),
                b.low.unwrap(),
                b.close.unwrap(),
            );
            assert!(l <= o.min(c) && o.max(c) <= h);
            if let Some(v) = b.volume {
                assert!((50.0..200.0).contains(&v));
                assert_eq!(v.fract(), 0.0);
            }
        }
    }

    #[test]
    fn same_seed_same_series() {
        let a = SimulatedProvider::new(small(50)).unwrap().fetch_bars().unwrap();
        let b = SimulatedProvider::new(small(50)).unwrap().fetch_bars().unwrap();
        assert_eq!(a, b);

        let other = SimulationParams {
            seed: Some(7),
            ..small(50)
        };
        let c = SimulatedProvider::new(other).unwrap().fetch_bars().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn injected_rng_overrides_seed() {
        let a = SimulatedProvider::with_rng(small(20), StdRng::seed_from_u64(1))
            .unwrap()
            .fetch_bars()
            .unwrap();
        let b = SimulatedProvider::new(SimulationParams {
            seed: Some(1),
            ..small(20)
        })
        .unwrap()
        .fetch_bars()
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_records_is_empty() {
        let raw = SimulatedProvider::new(small(0)).unwrap().fetch_bars().unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn rejects_bad_params() {
        let bad = [
            SimulationParams {
                missing_volume_fraction: 1.5,
                ..small(10)
            },
            SimulationParams {
                volume_min: 10,
                volume_max: 10,
                ..small(10)
            },
            SimulationParams {
                initial_price: f64::NAN,
                ..small(10)
            },
            SimulationParams {
                initial_price: 0.0,
                ..small(10)
            },
            SimulationParams {
                wick_noise: -1.0,
                ..small(10)
            },
            SimulationParams {
                interval: "1M".parse().unwrap(),
                ..small(10)
            },
        ];
        for params in bad {
            assert!(matches!(
                SimulatedProvider::new(params),
                Err(ProviderError::InvalidParams { .. })
            ));
        }
    }

    #[test]
    fn timestamps_past_the_calendar_are_rejected_up_front() {
        let params = SimulationParams {
            num_records: 1_000_000,
            interval: "4000000D".parse().unwrap(),
            ..SimulationParams::default()
        };
        let err = SimulatedProvider::new(params).err().unwrap();
        assert!(matches!(err, ProviderError::InvalidParams { .. }));
        assert!(err.to_string().contains("supported date range"));
    }

    #[test]
    fn params_deserialize_from_partial_toml() {
        let params: SimulationParams = toml::from_str(
            r#"
            num_records = 10
            seed = 1
            interval = "5m"
            "#,
        )
        .unwrap();
        assert_eq!(params.num_records, 10);
        assert_eq!(params.seed, Some(1));
        assert_eq!(params.interval, Timeframe::minutes(5).unwrap());
        assert_eq!(params.initial_price, 18000.0);
    }
}
