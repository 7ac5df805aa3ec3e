//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n values, then
//! EMA[i] = V[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values have no EMA.

use crate::domain::indicator::DerivedSeries;
use crate::domain::numeric::mean;

pub fn ema(values: &[f64], period: usize) -> DerivedSeries {
    let start = period.saturating_sub(1);
    if period == 0 || values.len() < period {
        return DerivedSeries::empty(start);
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len() - start);
    let mut current = mean(&values[..period]);
    out.push(current);

    for value in &values[period..] {
        current = value * k + current * (1.0 - k);
        out.push(current);
    }

    DerivedSeries { start, values: out }
}
