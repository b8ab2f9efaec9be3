use thiserror::Error;

/// A required setting was absent from the execution environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
}

#[derive(Debug, Error)]
pub enum RemediError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Request missing body")]
    MissingBody,

    #[error("Failed to decode request body: {0}")]
    DecodeError(String),

    #[error("Failed to parse model output: {0}")]
    ParseError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to access Gemini API: {0}")]
    GeminiError(String),

    #[error("Twilio API error (status {status}): {message}")]
    TwilioError { status: u16, message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to stage image: {0}")]
    IoError(String),
}

impl RemediError {
    /// Status reported by the messaging provider, if this error came from one.
    #[must_use]
    pub const fn provider_status(&self) -> Option<u16> {
        match self {
            RemediError::TwilioError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemediError {
    fn from(error: reqwest::Error) -> Self {
        RemediError::HttpError(error.to_string())
    }
}

impl From<std::io::Error> for RemediError {
    fn from(error: std::io::Error) -> Self {
        RemediError::IoError(error.to_string())
    }
}

impl From<base64::DecodeError> for RemediError {
    fn from(error: base64::DecodeError) -> Self {
        RemediError::DecodeError(error.to_string())
    }
}

impl From<serde_json::Error> for RemediError {
    fn from(error: serde_json::Error) -> Self {
        RemediError::ParseError(error.to_string())
    }
}
