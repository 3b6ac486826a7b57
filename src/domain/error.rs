//! Domain error types.

/// Top-level error type for pastperfect.
#[derive(Debug, thiserror::Error)]
pub enum BacktesterError {
    #[error("data format error: {reason}")]
    DataFormat { reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktesterError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BacktesterError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        BacktesterError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&BacktesterError> for std::process::ExitCode {
    fn from(err: &BacktesterError) -> Self {
        let code: u8 = match err {
            BacktesterError::Io(_) => 1,
            BacktesterError::ConfigParse { .. }
            | BacktesterError::ConfigMissing { .. }
            | BacktesterError::ConfigInvalid { .. } => 2,
            BacktesterError::DataFormat { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
