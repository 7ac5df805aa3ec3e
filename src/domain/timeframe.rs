//! Chart timeframes and their fixed lookup table.
//!
//! Each timeframe selects the number of bars in a synthesized view, the spacing
//! between bar timestamps and how strongly per-bar noise is damped.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SimchartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    FourHours,
    OneDay,
    OneWeek,
}

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Timeframe::OneMinute,
        Timeframe::FiveMinutes,
        Timeframe::FifteenMinutes,
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
        Timeframe::OneWeek,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1w",
        }
    }

    pub fn total_bars(self) -> usize {
        match self {
            Timeframe::OneMinute => 60,
            Timeframe::FiveMinutes => 48,
            Timeframe::FifteenMinutes => 48,
            Timeframe::OneHour => 24,
            Timeframe::FourHours => 42,
            Timeframe::OneDay => 60,
            Timeframe::OneWeek => 48,
        }
    }

    /// Spacing between consecutive bar timestamps, in seconds.
    pub fn increment_secs(self) -> i64 {
        match self {
            Timeframe::OneMinute => 60,
            Timeframe::FiveMinutes => 5 * 60,
            Timeframe::FifteenMinutes => 15 * 60,
            Timeframe::OneHour => 3_600,
            Timeframe::FourHours => 4 * 3_600,
            Timeframe::OneDay => 86_400,
            Timeframe::OneWeek => 7 * 86_400,
        }
    }

    pub fn is_intraday(self) -> bool {
        self.increment_secs() < 86_400
    }

    /// Multiplier on the random component; sub-daily bars swing less.
    pub fn noise_scale(self) -> f64 {
        match self {
            Timeframe::OneMinute => 0.25,
            Timeframe::FiveMinutes => 0.35,
            Timeframe::FifteenMinutes => 0.5,
            Timeframe::OneHour => 0.75,
            Timeframe::FourHours => 0.9,
            Timeframe::OneDay | Timeframe::OneWeek => 1.0,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = SimchartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "1min" => Ok(Timeframe::OneMinute),
            "5m" | "5min" => Ok(Timeframe::FiveMinutes),
            "15m" | "15min" => Ok(Timeframe::FifteenMinutes),
            "1h" | "60m" | "hourly" => Ok(Timeframe::OneHour),
            "4h" | "4hr" => Ok(Timeframe::FourHours),
            "1d" | "daily" => Ok(Timeframe::OneDay),
            "1w" | "weekly" => Ok(Timeframe::OneWeek),
            other => Err(SimchartError::invalid(
                "timeframe",
                format!("unknown timeframe '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_labels_round_trip() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.label().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn parse_aliases_case_insensitive() {
        assert_eq!("Hourly".parse::<Timeframe>().unwrap(), Timeframe::OneHour);
        assert_eq!(" 1D ".parse::<Timeframe>().unwrap(), Timeframe::OneDay);
        assert_eq!("15MIN".parse::<Timeframe>().unwrap(), Timeframe::FifteenMinutes);
    }

    #[test]
    fn unknown_timeframe_is_invalid_parameter() {
        let err = "3h".parse::<Timeframe>().unwrap_err();
        assert!(matches!(
            err,
            SimchartError::InvalidParameter { ref name, .. } if name == "timeframe"
        ));
    }

    #[test]
    fn lookup_table() {
        assert_eq!(Timeframe::OneMinute.total_bars(), 60);
        assert_eq!(Timeframe::OneHour.total_bars(), 24);
        assert_eq!(Timeframe::OneHour.increment_secs(), 3_600);
        assert_eq!(Timeframe::OneWeek.increment_secs(), 604_800);
    }

    #[test]
    fn intraday_noise_is_damped() {
        for tf in Timeframe::ALL {
            if tf.is_intraday() {
                assert!(tf.noise_scale() < 1.0, "{tf} should be damped");
            } else {
                assert!((tf.noise_scale() - 1.0).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn display_is_label() {
        assert_eq!(Timeframe::FourHours.to_string(), "4h");
    }
}
