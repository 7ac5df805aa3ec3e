//! Technical indicator implementations.
//!
//! This module provides the shared types for indicator output:
//! - `DerivedSeries`: an indicator series anchored at an absolute bar index
//! - `IndicatorSet`: the per-bar set of optional indicator values
//! - `IndicatorParams`: configurable RSI/MACD/Bollinger parameters
//! - `Overlay`: a user-selectable group of indicator columns

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger, BollingerSeries};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use sma::sma;

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SimchartError;

/// Fixed SMA periods carried on every `IndicatorSet`.
pub const SMA_PERIODS: [usize; 4] = [7, 21, 50, 200];

/// Indicator values whose first element belongs to bar index `start`.
///
/// Bars before `start` have no value. A series with no values is empty
/// regardless of `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub start: usize,
    pub values: Vec<f64>,
}

impl DerivedSeries {
    pub fn empty(start: usize) -> Self {
        Self {
            start,
            values: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One past the last covered bar index.
    pub fn end(&self) -> usize {
        self.start + self.values.len()
    }

    /// Value at absolute bar index `index`, if computed.
    pub fn get(&self, index: usize) -> Option<f64> {
        index
            .checked_sub(self.start)
            .and_then(|offset| self.values.get(offset))
            .copied()
    }

    /// Combine two series over their common index range.
    ///
    /// The result starts at the later of the two starts and ends at the earlier
    /// of the two ends.
    pub fn zip_with(&self, other: &DerivedSeries, f: impl Fn(f64, f64) -> f64) -> DerivedSeries {
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        if start >= end {
            return DerivedSeries::empty(start);
        }
        let values = (start..end)
            .map(|i| f(self.values[i - self.start], other.values[i - other.start]))
            .collect();
        DerivedSeries { start, values }
    }

    /// Shift a series computed over a sub-slice back to absolute indices.
    pub fn offset_by(mut self, offset: usize) -> DerivedSeries {
        self.start += offset;
        self
    }

    /// Drop values before absolute index `index`.
    pub fn starting_at(&self, index: usize) -> DerivedSeries {
        if index <= self.start {
            return self.clone();
        }
        let skip = (index - self.start).min(self.values.len());
        DerivedSeries {
            start: index,
            values: self.values[skip..].to_vec(),
        }
    }
}

/// Per-bar indicator values. `None` means not yet computable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    pub sma7: Option<f64>,
    pub sma21: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

impl IndicatorSet {
    pub fn sma(&self, period: usize) -> Option<f64> {
        match period {
            7 => self.sma7,
            21 => self.sma21,
            50 => self.sma50,
            200 => self.sma200,
            _ => None,
        }
    }

    fn set_sma(&mut self, period: usize, value: Option<f64>) {
        match period {
            7 => self.sma7 = value,
            21 => self.sma21 = value,
            50 => self.sma50 = value,
            200 => self.sma200 = value,
            _ => {}
        }
    }

    pub(crate) fn with_sma(mut self, period: usize, value: Option<f64>) -> Self {
        self.set_sma(period, value);
        self
    }
}

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_MULT: f64 = 2.0;

/// Configurable indicator parameters. SMA periods are fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: DEFAULT_RSI_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_period: DEFAULT_BOLLINGER_PERIOD,
            bollinger_mult: DEFAULT_BOLLINGER_MULT,
        }
    }
}

/// A display toggle selecting a group of indicator columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Sma(usize),
    Rsi,
    Macd,
    Bollinger,
}

impl Overlay {
    pub const ALL: [Overlay; 7] = [
        Overlay::Sma(7),
        Overlay::Sma(21),
        Overlay::Sma(50),
        Overlay::Sma(200),
        Overlay::Rsi,
        Overlay::Macd,
        Overlay::Bollinger,
    ];

    pub fn columns(&self) -> Vec<String> {
        match self {
            Overlay::Sma(period) => vec![format!("sma{period}")],
            Overlay::Rsi => vec!["rsi".into()],
            Overlay::Macd => vec![
                "macd".into(),
                "macd_signal".into(),
                "macd_histogram".into(),
            ],
            Overlay::Bollinger => vec![
                "bollinger_upper".into(),
                "bollinger_middle".into(),
                "bollinger_lower".into(),
            ],
        }
    }

    /// Values for this overlay's columns, in column order.
    pub fn values(&self, set: &IndicatorSet) -> Vec<Option<f64>> {
        match self {
            Overlay::Sma(period) => vec![set.sma(*period)],
            Overlay::Rsi => vec![set.rsi],
            Overlay::Macd => vec![set.macd, set.macd_signal, set.macd_histogram],
            Overlay::Bollinger => vec![
                set.bollinger_upper,
                set.bollinger_middle,
                set.bollinger_lower,
            ],
        }
    }

    /// Parse a comma separated overlay list such as `sma7,rsi,bollinger`.
    /// `all` selects every overlay. Duplicates are dropped.
    pub fn parse_list(input: &str) -> Result<Vec<Overlay>, SimchartError> {
        let mut overlays = Vec::new();
        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if token.eq_ignore_ascii_case("all") {
                return Ok(Overlay::ALL.to_vec());
            }
            let overlay: Overlay = token.parse()?;
            if !overlays.contains(&overlay) {
                overlays.push(overlay);
            }
        }
        Ok(overlays)
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overlay::Sma(period) => write!(f, "SMA({})", period),
            Overlay::Rsi => write!(f, "RSI"),
            Overlay::Macd => write!(f, "MACD"),
            Overlay::Bollinger => write!(f, "BOLLINGER"),
        }
    }
}

impl FromStr for Overlay {
    type Err = SimchartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "rsi" => return Ok(Overlay::Rsi),
            "macd" => return Ok(Overlay::Macd),
            "bollinger" | "bb" => return Ok(Overlay::Bollinger),
            _ => {}
        }
        lower
            .strip_prefix("sma")
            .or_else(|| lower.strip_prefix("ma"))
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| SMA_PERIODS.contains(p))
            .map(Overlay::Sma)
            .ok_or_else(|| SimchartError::invalid("overlay", format!("unknown overlay '{s}'")))
    }
}
