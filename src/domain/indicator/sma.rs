//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) bars have no value.

use crate::domain::indicator::DerivedSeries;
use crate::domain::numeric::{mean, trailing_windows};

pub fn sma(values: &[f64], period: usize) -> DerivedSeries {
    let start = period.saturating_sub(1);
    DerivedSeries {
        start,
        values: trailing_windows(values, period).map(|(_, w)| mean(w)).collect(),
    }
}
