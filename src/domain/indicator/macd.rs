//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow), aligned on absolute bar index
//! Signal Line = EMA(signal) of the MACD line, starting at its first valid bar
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: all three outputs appear from bar (slow - 1) + (signal - 1).

use crate::domain::indicator::{ema, DerivedSeries};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: DerivedSeries,
    pub signal: DerivedSeries,
    pub histogram: DerivedSeries,
}

impl MacdSeries {
    fn empty(start: usize) -> Self {
        Self {
            line: DerivedSeries::empty(start),
            signal: DerivedSeries::empty(start),
            histogram: DerivedSeries::empty(start),
        }
    }
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let warmup = (slow + signal_period).saturating_sub(2);
    if values.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return MacdSeries::empty(warmup);
    }

    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let line = fast_ema.zip_with(&slow_ema, |f, s| f - s);
    if line.is_empty() {
        return MacdSeries::empty(warmup);
    }

    let signal = ema(&line.values, signal_period).offset_by(line.start);
    let histogram = line.zip_with(&signal, |l, s| l - s);

    MacdSeries {
        line: line.starting_at(signal.start),
        signal,
        histogram,
    }
}

pub fn macd_default(values: &[f64]) -> MacdSeries {
    macd(values, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
