//! Synthetic OHLCV series generator.
//!
//! Each bar's fractional change is the sum of four components:
//! - random: uniform noise in ±volatility/2, damped for sub-daily timeframes
//! - trend: trend_bias ramped linearly over the series
//! - cyclical: a sine wave at a per-series random frequency
//! - momentum: the previous bar's change times a persistence factor
//!
//! The sum is multiplied by a per-series sentiment sign (±1). Closes never fall
//! below `close_floor_ratio * base_value`.
//!
//! Random draws are taken in a fixed order (cyclical frequency, sentiment, then
//! per bar: noise, range, volume) so a seeded source reproduces a series exactly.

use chrono::{DateTime, Utc};
use std::f64::consts::PI;
use tracing::debug;

use crate::domain::error::SimchartError;
use crate::domain::numeric::floor_at;
use crate::domain::ohlcv::Bar;
use crate::domain::timeframe::Timeframe;
use crate::ports::random_port::RandomSource;

pub const DEFAULT_MOMENTUM_PERSISTENCE: f64 = 0.7;
pub const DEFAULT_CYCLICAL_FREQUENCY_MIN: f64 = 0.1;
pub const DEFAULT_CYCLICAL_FREQUENCY_MAX: f64 = 0.4;
pub const DEFAULT_CLOSE_FLOOR_RATIO: f64 = 0.7;

const CYCLICAL_AMPLITUDE: f64 = 0.5;
const HIGH_SHARE: f64 = 0.6;
const LOW_SHARE: f64 = 0.4;
const RANGE_EXTENSION_MAX: f64 = 1.5;
const BASE_VOLUME_RATIO: f64 = 0.01;
const VOLUME_CHANGE_MULT: f64 = 10.0;

/// Upper bound on the bar count of a single request.
pub const MAX_BARS: usize = 1_000_000;

/// What to synthesize.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthRequest {
    pub timeframe: Timeframe,
    pub base_value: f64,
    pub volatility: f64,
    pub trend_bias: f64,
    /// Overrides the timeframe's bar count.
    pub bars: Option<usize>,
    /// Time of the last bar, aligned down to the timeframe increment.
    /// Defaults to the current time.
    pub end: Option<DateTime<Utc>>,
}

impl SynthRequest {
    pub fn new(timeframe: Timeframe, base_value: f64, volatility: f64, trend_bias: f64) -> Self {
        Self {
            timeframe,
            base_value,
            volatility,
            trend_bias,
            bars: None,
            end: None,
        }
    }

    pub fn total_bars(&self) -> usize {
        self.bars.unwrap_or_else(|| self.timeframe.total_bars())
    }

    pub fn validate(&self) -> Result<(), SimchartError> {
        match self.bars {
            Some(0) => {
                return Err(SimchartError::invalid("bars", "bar count must be positive"));
            }
            Some(n) if n > MAX_BARS => {
                return Err(SimchartError::invalid(
                    "bars",
                    format!("at most {MAX_BARS} bars per series, got {n}"),
                ));
            }
            _ => {}
        }
        if !self.base_value.is_finite() || self.base_value <= 0.0 {
            return Err(SimchartError::invalid(
                "base_value",
                format!("must be positive, got {}", self.base_value),
            ));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(SimchartError::invalid(
                "volatility",
                format!("must be non-negative, got {}", self.volatility),
            ));
        }
        if !self.trend_bias.is_finite() {
            return Err(SimchartError::invalid("trend_bias", "must be finite"));
        }
        Ok(())
    }
}

/// Series-level model constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub momentum_persistence: f64,
    pub cyclical_frequency_min: f64,
    pub cyclical_frequency_max: f64,
    pub close_floor_ratio: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            momentum_persistence: DEFAULT_MOMENTUM_PERSISTENCE,
            cyclical_frequency_min: DEFAULT_CYCLICAL_FREQUENCY_MIN,
            cyclical_frequency_max: DEFAULT_CYCLICAL_FREQUENCY_MAX,
            close_floor_ratio: DEFAULT_CLOSE_FLOOR_RATIO,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), SimchartError> {
        let persistence = self.momentum_persistence;
        if !(0.0..1.0).contains(&persistence) {
            return Err(SimchartError::invalid(
                "momentum_persistence",
                format!("must be in [0, 1), got {persistence}"),
            ));
        }
        let (lo, hi) = (self.cyclical_frequency_min, self.cyclical_frequency_max);
        if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || lo > hi {
            return Err(SimchartError::invalid(
                "cyclical_frequency",
                format!("range [{lo}, {hi}] must satisfy 0 <= min <= max"),
            ));
        }
        if !self.close_floor_ratio.is_finite() || self.close_floor_ratio < 0.0 {
            return Err(SimchartError::invalid(
                "close_floor_ratio",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Per-series parameters drawn once per call.
#[derive(Debug, Clone, Copy)]
struct SeriesDraw {
    cyclical_frequency: f64,
    sentiment: f64,
}

impl SeriesDraw {
    fn draw(model: &ModelConfig, rng: &mut dyn RandomSource) -> Self {
        let cyclical_frequency =
            rng.uniform(model.cyclical_frequency_min, model.cyclical_frequency_max);
        let sentiment = if rng.next_f64() < 0.5 { 1.0 } else { -1.0 };
        Self {
            cyclical_frequency,
            sentiment,
        }
    }
}

/// Synthesize an OHLCV series.
pub fn generate(
    request: &SynthRequest,
    model: &ModelConfig,
    rng: &mut dyn RandomSource,
) -> Result<Vec<Bar>, SimchartError> {
    request.validate()?;
    model.validate()?;

    let total = request.total_bars();
    let increment = request.timeframe.increment_secs();
    let end = request.end.unwrap_or_else(Utc::now).timestamp();
    let last_ts = end - end.rem_euclid(increment);
    let first_ts = (total as i64 - 1)
        .checked_mul(increment)
        .and_then(|span| last_ts.checked_sub(span))
        .ok_or_else(|| {
            SimchartError::invalid("bars", format!("{total} bars overflow the timestamp range"))
        })?;

    let draw = SeriesDraw::draw(model, rng);
    debug!(
        timeframe = %request.timeframe,
        total,
        cyclical_frequency = draw.cyclical_frequency,
        sentiment = draw.sentiment,
        "synthesizing series"
    );

    let base = request.base_value;
    let noise_scale = request.timeframe.noise_scale();
    let close_floor = model.close_floor_ratio * base;

    let mut bars = Vec::with_capacity(total);
    let mut previous_close = base;
    let mut previous_change = 0.0;

    for i in 0..total {
        let t = i as f64 / total as f64;
        let cyclical =
            (t * 2.0 * PI * draw.cyclical_frequency).sin() * request.volatility * CYCLICAL_AMPLITUDE;
        let random = rng.uniform(-0.5, 0.5) * request.volatility * noise_scale;
        let trend = request.trend_bias * t;
        let momentum = previous_change * model.momentum_persistence;
        let change = (random + trend + cyclical + momentum) * draw.sentiment;

        let open = previous_close;
        let close = floor_at(previous_close * (1.0 + change), close_floor);

        let range = (close - open).abs() * (1.0 + rng.uniform(0.0, RANGE_EXTENSION_MAX));
        let high = open.max(close) + HIGH_SHARE * range;
        let low = floor_at(open.min(close) - LOW_SHARE * range, 0.0);
        if !close.is_finite() || !high.is_finite() {
            return Err(SimchartError::invalid(
                "series",
                format!("bar {i} diverged to a non-finite price"),
            ));
        }

        let volume = base * BASE_VOLUME_RATIO
            + change.abs() * VOLUME_CHANGE_MULT * base * (0.5 + rng.next_f64());
        let volume = floor_at(volume, 0.0).trunc();

        bars.push(Bar {
            timestamp: first_ts + i as i64 * increment,
            open,
            high,
            low,
            close,
            volume,
        });

        previous_close = close;
        previous_change = change;
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Cycles through a fixed list of values.
    struct FixedSource {
        values: Vec<f64>,
        pos: usize,
    }

    impl FixedSource {
        fn new(values: &[f64]) -> Self {
            Self {
                values: values.to_vec(),
                pos: 0,
            }
        }
    }

    impl RandomSource for FixedSource {
        fn next_f64(&mut self) -> f64 {
            let v = self.values[self.pos % self.values.len()];
            self.pos += 1;
            v
        }
    }

    fn anchored(tf: Timeframe) -> SynthRequest {
        SynthRequest {
            end: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 34, 56).unwrap()),
            ..SynthRequest::new(tf, 10_000.0, 0.01, 0.001)
        }
    }

    #[test]
    fn length_follows_timeframe() {
        let mut rng = FixedSource::new(&[0.3]);
        for tf in Timeframe::ALL {
            let bars = generate(&anchored(tf), &ModelConfig::default(), &mut rng).unwrap();
            assert_eq!(bars.len(), tf.total_bars());
        }
    }

    #[test]
    fn bar_override() {
        let mut rng = FixedSource::new(&[0.3]);
        let request = SynthRequest {
            bars: Some(7),
            ..anchored(Timeframe::OneDay)
        };
        let bars = generate(&request, &ModelConfig::default(), &mut rng).unwrap();
        assert_eq!(bars.len(), 7);
    }

    #[test]
    fn timestamps_aligned_and_evenly_spaced() {
        let mut rng = FixedSource::new(&[0.3, 0.8]);
        let bars = generate(
            &anchored(Timeframe::OneHour),
            &ModelConfig::default(),
            &mut rng,
        )
        .unwrap();

        let last = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap().timestamp();
        assert_eq!(bars.last().unwrap().timestamp, last);
        for pair in bars.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 3_600);
        }
    }

    #[test]
    fn first_open_is_base_value_and_opens_chain() {
        let mut rng = FixedSource::new(&[0.9, 0.1, 0.6]);
        let bars = generate(
            &anchored(Timeframe::OneDay),
            &ModelConfig::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(bars[0].open, 10_000.0);
        for pair in bars.windows(2) {
            assert_eq!(pair[1].open, pair[0].close);
        }
    }

    #[test]
    fn hand_computed_first_bar() {
        // draws: frequency, sentiment, then noise/range/volume per bar
        // frequency = 0.1 + 0.3 * 0.5 = 0.25, sentiment = +1 (0.25 < 0.5)
        // bar 0: t = 0 so cyclical and trend vanish; random = (0.75 - 0.5) * 0.01
        let mut rng = FixedSource::new(&[0.5, 0.25, 0.75, 0.0, 0.5]);
        let request = SynthRequest {
            bars: Some(1),
            ..SynthRequest::new(Timeframe::OneDay, 100.0, 0.01, 0.0)
        };
        let bars = generate(&request, &ModelConfig::default(), &mut rng).unwrap();

        let change = 0.25 * 0.01;
        let close = 100.0 * (1.0 + change);
        let range = (close - 100.0) * 1.0;
        let volume = (100.0 * 0.01 + change * 10.0 * 100.0 * 1.0_f64).trunc();

        let bar = &bars[0];
        assert!((bar.close - close).abs() < 1e-12);
        assert!((bar.high - (close + 0.6 * range)).abs() < 1e-12);
        assert!((bar.low - (100.0 - 0.4 * range)).abs() < 1e-12);
        assert_eq!(bar.volume, volume);
    }

    #[test]
    fn negative_sentiment_flips_change() {
        // sentiment draw 0.75 -> -1; noise 1.0 would be +0.5 before the flip
        let mut rng = FixedSource::new(&[0.0, 0.75, 0.999_999, 0.0, 0.0]);
        let request = SynthRequest {
            bars: Some(1),
            ..SynthRequest::new(Timeframe::OneDay, 100.0, 0.1, 0.0)
        };
        let bars = generate(&request, &ModelConfig::default(), &mut rng).unwrap();
        assert!(bars[0].close < 100.0);
    }

    #[test]
    fn close_never_below_floor() {
        // always-negative draws and a strong downward bias
        let mut rng = FixedSource::new(&[0.0]);
        let request = SynthRequest {
            bars: Some(200),
            ..SynthRequest::new(Timeframe::OneDay, 50.0, 0.5, -2.0)
        };
        let bars = generate(&request, &ModelConfig::default(), &mut rng).unwrap();
        for bar in &bars {
            assert!(bar.close >= 35.0 - 1e-9, "close {} below floor", bar.close);
            assert!(bar.is_consistent());
        }
    }

    #[test]
    fn zero_volatility_flat_series() {
        let mut rng = FixedSource::new(&[0.4, 0.2, 0.7]);
        let request = SynthRequest::new(Timeframe::OneDay, 250.0, 0.0, 0.0);
        let bars = generate(&request, &ModelConfig::default(), &mut rng).unwrap();
        for bar in &bars {
            assert_eq!(bar.open, 250.0);
            assert_eq!(bar.close, 250.0);
            assert_eq!(bar.high, 250.0);
            assert_eq!(bar.low, 250.0);
            assert_eq!(bar.volume, 2.0);
        }
    }

    #[test]
    fn volume_is_integral() {
        let mut rng = FixedSource::new(&[0.13, 0.57, 0.91, 0.33]);
        let bars = generate(
            &anchored(Timeframe::FiveMinutes),
            &ModelConfig::default(),
            &mut rng,
        )
        .unwrap();
        for bar in &bars {
            assert_eq!(bar.volume, bar.volume.trunc());
        }
    }

    #[test]
    fn rejects_zero_bars() {
        let mut rng = FixedSource::new(&[0.5]);
        let request = SynthRequest {
            bars: Some(0),
            ..anchored(Timeframe::OneHour)
        };
        let err = generate(&request, &ModelConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, SimchartError::InvalidParameter { ref name, .. } if name == "bars"));
    }

    #[test]
    fn rejects_non_positive_base_value() {
        let mut rng = FixedSource::new(&[0.5]);
        for base in [0.0, -5.0, f64::NAN] {
            let request = SynthRequest::new(Timeframe::OneHour, base, 0.01, 0.0);
            let err = generate(&request, &ModelConfig::default(), &mut rng).unwrap_err();
            assert!(
                matches!(err, SimchartError::InvalidParameter { ref name, .. } if name == "base_value")
            );
        }
    }

    #[test]
    fn rejects_negative_volatility() {
        let mut rng = FixedSource::new(&[0.5]);
        let request = SynthRequest::new(Timeframe::OneHour, 100.0, -0.01, 0.0);
        assert!(generate(&request, &ModelConfig::default(), &mut rng).is_err());
    }

    #[test]
    fn rejects_inverted_frequency_range() {
        let mut rng = FixedSource::new(&[0.5]);
        let model = ModelConfig {
            cyclical_frequency_min: 0.5,
            cyclical_frequency_max: 0.1,
            ..ModelConfig::default()
        };
        let err = generate(&anchored(Timeframe::OneHour), &model, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimchartError::InvalidParameter { ref name, .. } if name == "cyclical_frequency"
        ));
    }

    #[test]
    fn rejects_bar_count_above_cap() {
        let mut rng = FixedSource::new(&[0.5]);
        for n in [MAX_BARS + 1, usize::MAX / 2] {
            let request = SynthRequest {
                bars: Some(n),
                ..anchored(Timeframe::OneWeek)
            };
            let err = generate(&request, &ModelConfig::default(), &mut rng).unwrap_err();
            assert!(matches!(err, SimchartError::InvalidParameter { ref name, .. } if name == "bars"));
        }
    }

    #[test]
    fn rejects_momentum_persistence_outside_unit_interval() {
        let mut rng = FixedSource::new(&[0.5]);
        for persistence in [1.0, 5.0, -0.1, f64::NAN, f64::INFINITY] {
            let model = ModelConfig {
                momentum_persistence: persistence,
                ..ModelConfig::default()
            };
            let err = generate(&anchored(Timeframe::OneDay), &model, &mut rng).unwrap_err();
            assert!(matches!(
                err,
                SimchartError::InvalidParameter { ref name, .. } if name == "momentum_persistence"
            ));
        }
    }

    #[test]
    fn high_persistence_bars_stay_finite_and_consistent() {
        let model = ModelConfig {
            momentum_persistence: 0.99,
            ..ModelConfig::default()
        };
        for seed in 0..20 {
            let draws: Vec<f64> = (0..7).map(|k| ((seed * 7 + k) as f64 * 0.137) % 1.0).collect();
            let mut rng = FixedSource::new(&draws);
            let request = SynthRequest::new(Timeframe::OneDay, 100.0, 0.05, 0.0);
            let bars = generate(&request, &model, &mut rng).unwrap();
            for bar in &bars {
                assert!(bar.high.is_finite() && bar.low.is_finite());
                assert!(bar.is_consistent());
            }
        }
    }

    #[test]
    fn total_bars_defaults_to_timeframe() {
        let request = SynthRequest::new(Timeframe::OneMinute, 1.0, 0.0, 0.0);
        assert_eq!(request.total_bars(), 60);
    }
}
