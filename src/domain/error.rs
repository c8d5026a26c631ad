//! Domain error types.

/// Top-level error type for price-indices.
#[derive(Debug, thiserror::Error)]
pub enum IndicesError {
    #[error("insufficient data for {indicator}: have {have} points, need {need}")]
    InsufficientData {
        indicator: String,
        have: usize,
        need: usize,
    },

    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price source error: {reason}")]
    Source { reason: String },

    #[error("chart rendering failed: {reason}")]
    Chart { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IndicesError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        IndicesError::MalformedInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        IndicesError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&IndicesError> for std::process::ExitCode {
    fn from(err: &IndicesError) -> Self {
        let code: u8 = match err {
            IndicesError::Io(_) | IndicesError::Chart { .. } => 1,
            IndicesError::ConfigParse { .. } | IndicesError::ConfigInvalid { .. } => 2,
            IndicesError::Source { .. } => 3,
            IndicesError::MalformedInput { .. } | IndicesError::InvalidParameter { .. } => 4,
            IndicesError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
