//! Typed errors for the completion API.

/// Errors that can occur while requesting a completion.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LlmError {
    /// No credential was configured.
    #[error("Missing API key: set {var} in the environment or a .env file")]
    MissingApiKey { var: &'static str },

    /// The request never produced an HTTP response.
    #[error("Completion request failed: {message}")]
    Network { message: String },

    /// The API answered with a non-success status.
    #[error("Completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Failed to parse completion response: {message}")]
    Parse { message: String },

    /// The response carried no usable choice.
    #[error("Completion response contained no choices")]
    EmptyResponse,
}

impl LlmError {
    /// Creates a `Network` error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a `Parse` error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Returns true for authentication failures (401/403).
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::MissingApiKey { .. })
            || matches!(self, Self::Api { status, .. } if *status == 401 || *status == 403)
    }
}
