//! Shared numeric helpers for the synthesizer and indicator calculations.

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N, not N-1).
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Trailing windows of `period` values, paired with the absolute index of each
/// window's last element. Empty when `period` is 0 or exceeds the input.
pub fn trailing_windows(values: &[f64], period: usize) -> impl Iterator<Item = (usize, &[f64])> {
    let windows = if period == 0 { None } else { Some(values.windows(period)) };
    windows
        .into_iter()
        .flatten()
        .enumerate()
        .map(move |(i, w)| (i + period - 1, w))
}

/// `value` raised to `floor` when below it.
pub fn floor_at(value: f64, floor: f64) -> f64 {
    if value < floor { floor } else { value }
}
