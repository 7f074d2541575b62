//! Domain error types.

/// Top-level error type for tariffscope.
#[derive(Debug, thiserror::Error)]
pub enum TariffscopeError {
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

    #[error("cannot read source {source_name}: {reason}")]
    SourceUnreadable { source_name: String, reason: String },

    #[error("source {source_name} has no column named {column:?}")]
    MissingColumn { source_name: String, column: String },

    #[error("source {source_name} lists {key:?} more than once")]
    DuplicateState { source_name: String, key: String },

    #[error("source {source_name}: value {text:?} for {key:?} is not a number")]
    ValueParse {
        source_name: String,
        key: String,
        text: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TariffscopeError {
    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config_missing(section: &str, key: &str) -> Self {
        Self::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&TariffscopeError> for std::process::ExitCode {
    fn from(err: &TariffscopeError) -> Self {
        let code: u8 = match err {
            TariffscopeError::Io(_) | TariffscopeError::Report { .. } => 1,
            TariffscopeError::ConfigParse { .. }
            | TariffscopeError::ConfigMissing { .. }
            | TariffscopeError::ConfigInvalid { .. } => 2,
            TariffscopeError::SourceUnreadable { .. }
            | TariffscopeError::MissingColumn { .. }
            | TariffscopeError::DuplicateState { .. } => 3,
            TariffscopeError::ValueParse { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
