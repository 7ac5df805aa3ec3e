//! Core domain types and logic.

pub mod ohlcv;
pub mod timeframe;
pub mod numeric;
pub mod synth;
pub mod indicator;
pub mod annotate;
pub mod config_validation;
pub mod error;
