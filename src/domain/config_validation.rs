//! Configuration validation.
//!
//! Builds synthesis and indicator settings from a `ConfigPort`, rejecting
//! malformed or out-of-range values before anything is generated.

use crate::domain::error::SimchartError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::synth::{ModelConfig, SynthRequest, MAX_BARS};
use crate::domain::timeframe::Timeframe;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_BASE_VALUE: f64 = 10_000.0;
pub const DEFAULT_VOLATILITY: f64 = 0.01;
pub const DEFAULT_TREND_BIAS: f64 = 0.0;

/// Synthesis settings read from the `[synth]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthSettings {
    pub request: SynthRequest,
    pub seed: Option<u64>,
}

pub fn build_synth_settings(config: &dyn ConfigPort) -> Result<SynthSettings, SimchartError> {
    let timeframe = match config.get_string("synth", "timeframe") {
        Some(s) if !s.trim().is_empty() => s.parse::<Timeframe>().map_err(|_| {
            invalid("synth", "timeframe", format!("unknown timeframe '{}'", s.trim()))
        })?,
        _ => Timeframe::OneHour,
    };

    let base_value = number(config, "synth", "base_value", DEFAULT_BASE_VALUE)?;
    if base_value <= 0.0 {
        return Err(invalid("synth", "base_value", "base_value must be positive"));
    }
    let volatility = number(config, "synth", "volatility", DEFAULT_VOLATILITY)?;
    if volatility < 0.0 {
        return Err(invalid("synth", "volatility", "volatility must be non-negative"));
    }
    let trend_bias = number(config, "synth", "trend_bias", DEFAULT_TREND_BIAS)?;

    let bars = optional_count(config, "synth", "bars")?;
    match bars {
        Some(0) => return Err(invalid("synth", "bars", "bars must be positive")),
        Some(n) if n > MAX_BARS => {
            return Err(invalid("synth", "bars", format!("bars must be at most {MAX_BARS}")));
        }
        _ => {}
    }

    let seed = match config.get_string("synth", "seed") {
        Some(s) if !s.trim().is_empty() => Some(
            s.trim()
                .parse::<u64>()
                .map_err(|_| invalid("synth", "seed", "seed must be a non-negative integer"))?,
        ),
        _ => None,
    };

    Ok(SynthSettings {
        request: SynthRequest {
            bars,
            ..SynthRequest::new(timeframe, base_value, volatility, trend_bias)
        },
        seed,
    })
}

pub fn build_model_config(config: &dyn ConfigPort) -> Result<ModelConfig, SimchartError> {
    let defaults = ModelConfig::default();
    let model = ModelConfig {
        momentum_persistence: number(
            config,
            "model",
            "momentum_persistence",
            defaults.momentum_persistence,
        )?,
        cyclical_frequency_min: number(
            config,
            "model",
            "cyclical_frequency_min",
            defaults.cyclical_frequency_min,
        )?,
        cyclical_frequency_max: number(
            config,
            "model",
            "cyclical_frequency_max",
            defaults.cyclical_frequency_max,
        )?,
        close_floor_ratio: number(
            config,
            "model",
            "close_floor_ratio",
            defaults.close_floor_ratio,
        )?,
    };
    model.validate().map_err(|e| match e {
        SimchartError::InvalidParameter { name, reason } => invalid("model", &name, reason),
        other => other,
    })?;
    Ok(model)
}

pub fn build_indicator_params(config: &dyn ConfigPort) -> Result<IndicatorParams, SimchartError> {
    let defaults = IndicatorParams::default();
    let params = IndicatorParams {
        rsi_period: period(config, "rsi_period", defaults.rsi_period)?,
        macd_fast: period(config, "macd_fast", defaults.macd_fast)?,
        macd_slow: period(config, "macd_slow", defaults.macd_slow)?,
        macd_signal: period(config, "macd_signal", defaults.macd_signal)?,
        bollinger_period: period(config, "bollinger_period", defaults.bollinger_period)?,
        bollinger_mult: number(config, "indicators", "bollinger_mult", defaults.bollinger_mult)?,
    };
    if params.macd_fast >= params.macd_slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be shorter than macd_slow",
        ));
    }
    if params.bollinger_mult < 0.0 {
        return Err(invalid(
            "indicators",
            "bollinger_mult",
            "bollinger_mult must be non-negative",
        ));
    }
    Ok(params)
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SimchartError {
    SimchartError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// A finite float, or `default` when the key is absent.
fn number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SimchartError> {
    if !config.has_key(section, key) {
        return Ok(default);
    }
    let raw = config.get_string(section, key).unwrap_or_default();
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(section, key, format!("'{}' is not a number", raw.trim()))),
    }
}

fn optional_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<usize>, SimchartError> {
    if !config.has_key(section, key) {
        return Ok(None);
    }
    let value = config.get_int(section, key, -1);
    if value < 0 {
        return Err(invalid(section, key, "must be a non-negative integer"));
    }
    Ok(Some(value as usize))
}

fn period(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, SimchartError> {
    match optional_count(config, "indicators", key)? {
        None => Ok(default),
        Some(0) => Err(invalid("indicators", key, format!("{key} must be positive"))),
        Some(p) => Ok(p),
    }
}
