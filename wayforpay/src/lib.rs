#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the WayForPay payment gateway.
//!
//! This crate builds, validates and signs gateway requests, decodes the
//! gateway's replies and verifies the reports it sends back. It is
//! transport-agnostic: requests leave through the [`Transport`] trait, with a
//! `reqwest`-backed implementation provided by the `wayforpay-http` crate.
//!
//! # Overview
//!
//! Every request is authenticated with an HMAC-MD5 signature over a
//! canonical message: selected field values joined with `;`, keyed with the
//! merchant secret. A request starts as a plain draft and becomes sendable
//! only once [`Signable::sign`] has validated it and produced a [`Signed`]
//! value. The gateway answers with a reason code; `1100` is the only
//! success.
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use wayforpay::{Credentials, Refund, Signable};
//!
//! let credentials = Credentials::new("test_merch_n1", "flk3409refn54t54t*FNJRET").unwrap();
//! let refund = Refund::new(credentials.merchant_account())
//!     .with_order_reference("order-1")
//!     .with_amount(Decimal::new(10050, 2))
//!     .with_currency("UAH")
//!     .sign(&credentials)
//!     .unwrap();
//! assert_eq!(refund.signature().to_hex(), "174ca12b01221682331c47181a64e2ec");
//! ```
//!
//! # Modules
//!
//! - [`callback`] - Signed transaction reports and service callbacks
//! - [`client`] - The [`Transport`] seam and the gateway [`Client`]
//! - [`credentials`] - Merchant account and secret key
//! - [`error`] - Error types
//! - [`request`] - Request drafts, the [`Signable`] trait and [`Signed`]
//! - [`response`] - Typed gateway replies and reason codes
//! - [`signature`] - HMAC-MD5 over canonical messages
//! - [`timestamp`] - Unix timestamps
//! - [`validate`] - Required-field validation
//! - [`version`] - Gateway API version
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod callback;
pub mod client;
pub mod credentials;
pub mod error;
pub mod request;
pub mod response;
pub mod signature;
pub mod timestamp;
pub mod validate;
pub mod version;

pub use callback::{ServiceCallback, TransactionReport};
pub use client::{BoxFuture, Client, Transport};
pub use credentials::Credentials;
pub use error::{
    BoxError, ConfigError, Error, GatewayError, SignatureError, TransportError, ValidationError,
};
pub use request::{
    AckStatus, ApiRequest, CallbackAck, CheckStatus, CreateInvoice, Field, Language, NotifyMethod,
    ProductLine, Refund, RemoveInvoice, RequestKind, SignatureMode, Signable, Signed,
    TransactionType,
};
pub use response::{
    CheckStatusResponse, CreateInvoiceResponse, GatewayReply, ReasonCode, RefundResponse,
    RemoveInvoiceResponse,
};
pub use signature::Signature;
pub use timestamp::UnixTimestamp;
pub use version::ApiVersion;
