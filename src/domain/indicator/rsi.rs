//! RSI (Relative Strength Index).
//!
//! Gains and losses are measured per bar as close - open (the intrabar body),
//! not close-to-close. For each bar i >= n the trailing window
//! [i-n+1, i] is summed:
//!
//! avg_gain = sum(gains) / n, avg_loss = sum(losses) / n
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), or 100 when avg_loss == 0.
//!
//! Warmup: first n bars have no value.

use crate::domain::indicator::DerivedSeries;

pub fn rsi(opens: &[f64], closes: &[f64], period: usize) -> DerivedSeries {
    let len = opens.len().min(closes.len());
    if period == 0 || len <= period {
        return DerivedSeries::empty(period);
    }

    let deltas: Vec<f64> = closes[..len]
        .iter()
        .zip(&opens[..len])
        .map(|(c, o)| c - o)
        .collect();

    let values = (period..len)
        .map(|i| {
            let window = &deltas[i + 1 - period..=i];
            let gains: f64 = window.iter().filter(|d| **d > 0.0).sum();
            let losses: f64 = window.iter().filter(|d| **d < 0.0).map(|d| -d).sum();
            let avg_gain = gains / period as f64;
            let avg_loss = losses / period as f64;
            if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
            }
        })
        .collect();

    DerivedSeries {
        start: period,
        values,
    }
}
