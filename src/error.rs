//! Error types for the subreddit audit library.

use std::fmt;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while auditing a user.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A required configuration value or secret is missing
    Config(String),

    /// Authentication failed, or a request needed a session that was not established
    Auth(String),

    /// Non-success status from the remote service
    Api {
        /// HTTP status code from the service
        status: u16,
        /// Response body or reason text
        message: String,
    },

    /// Listing had an unexpected shape or kind
    InvalidResponse(String),

    /// Parse error when decoding JSON
    Parse(String),

    /// Serialization error when encoding the grouped result
    Serialize(String),

    /// Transport error (when using the runtime integration)
    #[cfg(feature = "tokio-runtime")]
    Http(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "{msg}"),
            Error::Auth(msg) => write!(f, "Authentication error: {msg}"),
            Error::Api { status, message } => write!(f, "API error {status}: {message}"),
            Error::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            Error::Parse(msg) => write!(f, "Parse error: {msg}"),
            Error::Serialize(msg) => write!(f, "Serialize error: {msg}"),
            #[cfg(feature = "tokio-runtime")]
            Error::Http(msg) => write!(f, "HTTP error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::Parse(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

#[cfg(feature = "tokio-runtime")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}
