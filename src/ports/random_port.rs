//! Random number source port.

/// Uniform random source used by the series synthesizer.
///
/// Each synthesis run takes its own source, so concurrent generations never
/// share momentum or sentiment state.
pub trait RandomSource: Send {
    /// Next value, uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}
