//! Indicator annotation of a bar series.
//!
//! Each indicator is computed once over the whole series as a `DerivedSeries`
//! and then read back per bar. The input series is never modified.

use tracing::debug;

use crate::domain::indicator::{
    bollinger, macd, rsi, sma, IndicatorParams, IndicatorSet, SMA_PERIODS,
};
use crate::domain::ohlcv::{closes, opens, Bar};

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBar {
    pub bar: Bar,
    pub indicators: IndicatorSet,
}

/// Annotate with default indicator parameters.
pub fn annotate(bars: &[Bar]) -> Vec<AnnotatedBar> {
    annotate_with(bars, &IndicatorParams::default())
}

pub fn annotate_with(bars: &[Bar], params: &IndicatorParams) -> Vec<AnnotatedBar> {
    if bars.is_empty() {
        return Vec::new();
    }

    let close = closes(bars);
    let open = opens(bars);

    let smas: Vec<_> = SMA_PERIODS
        .iter()
        .map(|&period| (period, sma(&close, period)))
        .collect();
    let rsi_series = rsi(&open, &close, params.rsi_period);
    let macd_series = macd(&close, params.macd_fast, params.macd_slow, params.macd_signal);
    let bands = bollinger(&close, params.bollinger_period, params.bollinger_mult);

    debug!(bars = bars.len(), ?params, "annotating series");

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let base = IndicatorSet {
                rsi: rsi_series.get(i),
                macd: macd_series.line.get(i),
                macd_signal: macd_series.signal.get(i),
                macd_histogram: macd_series.histogram.get(i),
                bollinger_upper: bands.upper.get(i),
                bollinger_middle: bands.middle.get(i),
                bollinger_lower: bands.lower.get(i),
                ..IndicatorSet::default()
            };
            let indicators = smas
                .iter()
                .fold(base, |set, (period, series)| set.with_sma(*period, series.get(i)));
            AnnotatedBar {
                bar: bar.clone(),
                indicators,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: 1_700_000_000 + i as i64 * 60,
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + if i % 2 == 0 { i as f64 } else { -(i as f64) / 2.0 })
            .collect()
    }

    #[test]
    fn empty_series_yields_empty_output() {
        assert!(annotate(&[]).is_empty());
    }

    #[test]
    fn preserves_bars_and_length() {
        let bars = make_bars(&zigzag(30));
        let annotated = annotate(&bars);
        assert_eq!(annotated.len(), bars.len());
        for (a, b) in annotated.iter().zip(&bars) {
            assert_eq!(&a.bar, b);
        }
    }

    #[test]
    fn cold_start_boundaries() {
        let bars = make_bars(&zigzag(60));
        let annotated = annotate(&bars);

        assert!(annotated[5].indicators.sma7.is_none());
        assert!(annotated[6].indicators.sma7.is_some());
        assert!(annotated[19].indicators.sma21.is_none());
        assert!(annotated[20].indicators.sma21.is_some());
        assert!(annotated[48].indicators.sma50.is_none());
        assert!(annotated[49].indicators.sma50.is_some());
        assert!(annotated[59].indicators.sma200.is_none());

        assert!(annotated[13].indicators.rsi.is_none());
        assert!(annotated[14].indicators.rsi.is_some());

        assert!(annotated[32].indicators.macd.is_none());
        assert!(annotated[32].indicators.macd_signal.is_none());
        assert!(annotated[33].indicators.macd.is_some());
        assert!(annotated[33].indicators.macd_histogram.is_some());

        assert!(annotated[18].indicators.bollinger_middle.is_none());
        assert!(annotated[19].indicators.bollinger_upper.is_some());
        assert!(annotated[19].indicators.bollinger_lower.is_some());
    }

    #[test]
    fn sma_values_match_standalone() {
        let prices = zigzag(25);
        let annotated = annotate(&make_bars(&prices));
        let expected = sma(&prices, 7);
        for (i, a) in annotated.iter().enumerate() {
            assert_eq!(a.indicators.sma7, expected.get(i));
        }
    }

    #[test]
    fn custom_params_shift_warmup() {
        let params = IndicatorParams {
            rsi_period: 5,
            bollinger_period: 4,
            ..IndicatorParams::default()
        };
        let annotated = annotate_with(&make_bars(&zigzag(10)), &params);
        assert!(annotated[4].indicators.rsi.is_none());
        assert!(annotated[5].indicators.rsi.is_some());
        assert!(annotated[3].indicators.bollinger_middle.is_some());
    }

    #[test]
    fn annotate_is_idempotent() {
        let bars = make_bars(&zigzag(40));
        assert_eq!(annotate(&bars), annotate(&bars));
    }
}
