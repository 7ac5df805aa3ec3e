#![allow(dead_code)]

use chrono::{TimeZone, Utc};
pub use simchart::domain::ohlcv::Bar;
use simchart::domain::synth::SynthRequest;
use simchart::domain::timeframe::Timeframe;
use simchart::ports::random_port::RandomSource;

/// Linear congruential source; deterministic and independent of `rand`.
pub struct LcgSource {
    state: u64,
}

impl LcgSource {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for LcgSource {
    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Request anchored at a fixed time so timestamps are reproducible.
pub fn anchored_request(
    timeframe: Timeframe,
    base_value: f64,
    volatility: f64,
    trend_bias: f64,
) -> SynthRequest {
    SynthRequest {
        end: Some(Utc.with_ymd_and_hms(2024, 6, 3, 15, 30, 0).unwrap()),
        ..SynthRequest::new(timeframe, base_value, volatility, trend_bias)
    }
}

pub fn make_bar(timestamp: i64, open: f64, close: f64) -> Bar {
    Bar {
        timestamp,
        open,
        high: open.max(close) + 1.0,
        low: open.min(close) - 1.0,
        close,
        volume: 1000.0,
    }
}

/// Bars whose closes follow `closes`, each opening at the previous close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let mut prev = closes.first().copied().unwrap_or(0.0);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let bar = make_bar(1_717_200_000 + i as i64 * 3_600, prev, close);
            prev = close;
            bar
        })
        .collect()
}

pub fn write_temp(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
