//! HTTP transport for the WayForPay payment gateway.
//!
//! Provides [`HttpTransport`], a `reqwest`-backed implementation of
//! [`wayforpay::Transport`], together with its configuration and defaults.
//!
//! # Modules
//!
//! - [`constants`] - Default API URL and timeout
//! - [`error`] - HTTP transport error types
//! - [`transport`] - The transport, its config and the [`HttpClient`] alias
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod constants;
pub mod error;
pub mod transport;

pub use error::HttpTransportError;
pub use transport::{HttpClient, HttpTransport, HttpTransportConfig};
