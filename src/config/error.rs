use thiserror::Error;

/// Errors raised while assembling a `CaptureConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable is present but cannot be parsed
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A builder field failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
