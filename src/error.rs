//! Error types for arrlink.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the secret store or the app APIs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A secret could not be retrieved or parsed.
    #[error("secret {item}/{field}: {message}")]
    Secret {
        item: String,
        field: String,
        message: String,
    },

    /// Transport-level failure (timeout, connection refused, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with an unexpected status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An application this operation depends on has no loaded credential.
    #[error("no credential loaded for {0}")]
    MissingCredential(String),

    /// No entry with the given name exists on the remote side.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },
}

impl Error {
    /// Create a secret retrieval error.
    pub fn secret(
        item: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Secret {
            item: item.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}
