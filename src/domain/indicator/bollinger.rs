//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation (divides by N, not N-1).
//! Warmup: first (period-1) bars have no value.

use crate::domain::indicator::DerivedSeries;
use crate::domain::numeric::{mean, population_stddev, trailing_windows};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: DerivedSeries,
    pub middle: DerivedSeries,
    pub lower: DerivedSeries,
}

pub fn bollinger(values: &[f64], period: usize, mult: f64) -> BollingerSeries {
    let start = period.saturating_sub(1);
    let mut upper = Vec::new();
    let mut middle = Vec::new();
    let mut lower = Vec::new();

    for (_, window) in trailing_windows(values, period) {
        let m = mean(window);
        let sd = population_stddev(window);
        upper.push(m + mult * sd);
        middle.push(m);
        lower.push(m - mult * sd);
    }

    BollingerSeries {
        upper: DerivedSeries {
            start,
            values: upper,
        },
        middle: DerivedSeries {
            start,
            values: middle,
        },
        lower: DerivedSeries {
            start,
            values: lower,
        },
    }
}
