//! Errors raised at the retrieval boundary.
//!
//! Messages never include API keys.

/// Errors that can occur while retrieving evidence.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A networked provider was selected without its credentials.
    #[error("missing credentials for search provider '{provider}': {hint}")]
    MissingCredentials { provider: String, hint: String },

    /// The HTTP request itself failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// The call did not finish within the retrieval timeout.
    #[error("search timed out after {0}s")]
    Timeout(u64),

    #[error("unknown search provider: {0}")]
    UnknownProvider(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Http(err.to_string())
    }
}
