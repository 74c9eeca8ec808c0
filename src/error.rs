use std::sync::Arc;

use thiserror::Error;

/// Result type of every fallible operation of the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the DataBreakers client.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A caller-supplied value violates a precondition. Raised before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The transport failed or the response could not be parsed.
    #[error("request failed: {message}")]
    RequestFailed {
        /// Message of the server's JSON error body, or of the transport.
        message: String,
        /// HTTP status, if the server answered.
        status: Option<u16>,
    },
    /// The configured host is not a valid URL base.
    #[error("invalid host configuration")]
    InvalidHost(#[source] url::ParseError),
    /// The default HTTP client could not be built.
    // reqwest::Error is not clonable, so we're wrapping it in an Arc.
    #[error("failed to initialize http client")]
    TransportInit(#[source] Arc<reqwest::Error>),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Fail with [`Error::InvalidArgument`] when `value` is empty.
pub(crate) fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::invalid_argument(format!("{name} can't be empty")))
    } else {
        Ok(())
    }
}
