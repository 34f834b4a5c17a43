//! Error types for the HTTP transport.

use http::StatusCode;

/// Errors that can occur while talking to the gateway over HTTP.
///
/// The client reports these as
/// [`TransportError::Http`](wayforpay::TransportError::Http); downcast the
/// boxed source to inspect them.
#[derive(Debug, thiserror::Error)]
pub enum HttpTransportError {
    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// HTTP transport error, including timeouts.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Non-success HTTP status code.
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The response body.
        body: String,
    },
    /// Failed to read response body.
    #[error("Failed to read response body: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}

impl HttpTransportError {
    /// Returns the HTTP status for [`HttpTransportError::HttpStatus`].
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http { source, .. } | Self::ResponseBodyRead { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }
}
