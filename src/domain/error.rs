//! Domain error types.

/// Top-level error type for simchart.
#[derive(Debug, thiserror::Error)]
pub enum SimchartError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("malformed bar data: {reason}")]
    DataFormat { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimchartError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        SimchartError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SimchartError> for std::process::ExitCode {
    fn from(err: &SimchartError) -> Self {
        let code: u8 = match err {
            SimchartError::Io(_) => 1,
            SimchartError::ConfigParse { .. }
            | SimchartError::ConfigMissing { .. }
            | SimchartError::ConfigInvalid { .. } => 2,
            SimchartError::InvalidParameter { .. } => 3,
            SimchartError::DataFormat { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
