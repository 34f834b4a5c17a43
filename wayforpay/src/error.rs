//! Error types for the WayForPay client.
//!
//! Every failure a caller can observe is one of four kinds:
//!
//! - [`ConfigError`]: the client could not be constructed
//! - [`ValidationError`]: a request is missing a required field; no network call was made
//! - [`TransportError`]: the request did not produce a decodable reply
//! - [`GatewayError`]: the gateway answered with a reason code other than
//!   [`ReasonCode::SUCCESS`]
//!
//! [`Error`] wraps all of them for the request operations on
//! [`Client`](crate::Client).

use std::fmt;

use crate::request::{Field, RequestKind};
use crate::response::ReasonCode;

/// Boxed error produced by a [`Transport`](crate::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required request field is missing or inconsistent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The signed request could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request failed below the gateway protocol level.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The gateway rejected the request.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl Error {
    /// Returns `true` for network, timeout and malformed-body failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` when the gateway answered with a failure reason code.
    #[must_use]
    pub const fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }

    /// Returns the gateway error, if this is one.
    #[must_use]
    pub const fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

/// Missing merchant credentials at client construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The merchant account (login) is empty.
    #[error("merchant account is required")]
    MerchantAccountRequired,

    /// The merchant secret key is empty.
    #[error("merchant secret is required")]
    MerchantSecretRequired,
}

/// A request failed validation before it was signed or sent.
///
/// Each (request kind, field) pair is a distinct error, so callers can match
/// precisely on what is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is empty or unset.
    #[error("{request}: {field} is required")]
    Required {
        /// The request being validated.
        request: RequestKind,
        /// The missing field.
        field: Field,
    },

    /// Product name, price and count sequences have different lengths.
    #[error(
        "{request}: product lines are inconsistent ({names} names, {prices} prices, {counts} counts)"
    )]
    ProductLinesMismatch {
        /// The request being validated.
        request: RequestKind,
        /// Number of product names.
        names: usize,
        /// Number of product prices.
        prices: usize,
        /// Number of product counts.
        counts: usize,
    },
}

impl ValidationError {
    /// Creates a missing-field error.
    #[must_use]
    pub const fn required(request: RequestKind, field: Field) -> Self {
        Self::Required { request, field }
    }

    /// Returns the missing field, if this is a missing-field error.
    #[must_use]
    pub const fn field(&self) -> Option<Field> {
        match self {
            Self::Required { field, .. } => Some(*field),
            Self::ProductLinesMismatch { .. } => None,
        }
    }
}

/// The request never produced a usable gateway reply.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport itself failed (connection, timeout, non-success HTTP status).
    #[error("transport failure: {0}")]
    Http(#[source] BoxError),

    /// The reply body was not valid JSON for the expected response type.
    #[error("malformed gateway response: {0}")]
    MalformedBody(#[source] serde_json::Error),
}

/// The gateway answered, but with a failure reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    /// Gateway reason code.
    pub code: ReasonCode,
    /// Human-readable reason text from the gateway.
    pub reason: String,
}

impl GatewayError {
    /// Creates a new gateway error.
    #[must_use]
    pub fn new(code: ReasonCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error: code: {}, reason: {}", self.code, self.reason)
    }
}

impl std::error::Error for GatewayError {}

/// A signature on an inbound payload could not be verified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The payload carries no signature.
    #[error("signature is missing")]
    Missing,

    /// The signature is not 32 hex characters.
    #[error("signature is malformed: {0}")]
    Malformed(String),

    /// The signature does not match the payload.
    #[error("signature does not match")]
    Mismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display_embeds_code_and_reason() {
        let err = GatewayError::new(ReasonCode::new(1101), "Declined To Card Issuer");
        assert_eq!(
            err.to_string(),
            "api error: code: 1101, reason: Declined To Card Issuer"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::required(RequestKind::CreateInvoice, Field::Currency);
        assert_eq!(err.to_string(), "CREATE_INVOICE: currency is required");
        assert_eq!(err.field(), Some(Field::Currency));
    }

    #[test]
    fn test_error_classification() {
        let gateway: Error = GatewayError::new(ReasonCode::new(1109), "Order Not Found").into();
        assert!(gateway.is_gateway());
        assert!(!gateway.is_transport());
        assert_eq!(gateway.as_gateway().map(|e| e.code.value()), Some(1109));

        let transport: Error = TransportError::Http("connection refused".into()).into();
        assert!(transport.is_transport());
        assert!(transport.as_gateway().is_none());
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::MerchantSecretRequired.to_string(),
            "merchant secret is required"
        );
    }
}
