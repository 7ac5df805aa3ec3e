//! OHLCV bar representation.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// low <= min(open, close) <= max(open, close) <= high, volume >= 0
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close)
            && self.open.max(self.close) <= self.high
            && self.volume >= 0.0
    }

    /// Close minus open. Positive for an up bar.
    pub fn body(&self) -> f64 {
        self.close - self.open
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Closing prices of a bar slice, in order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Opening prices of a bar slice, in order.
pub fn opens(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.open).collect()
}
