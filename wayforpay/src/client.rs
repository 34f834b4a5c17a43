//! Transport-agnostic gateway client.
//!
//! [`Client`] owns the merchant [`Credentials`] and a [`Transport`]. It signs
//! drafts, posts them once, decodes the typed reply and maps any reason code
//! other than [`ReasonCode::SUCCESS`](crate::ReasonCode::SUCCESS) to
//! [`Error::Gateway`]. There are no retries.
//!
//! The `wayforpay-http` crate provides a `reqwest`-backed transport; tests
//! and custom stacks can plug in their own.
//!
//! ## Features
//!
//! - Integrates with `tracing` if the `telemetry` feature is enabled

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[cfg(feature = "telemetry")]
use tracing::{Instrument, Span};

use crate::callback::ServiceCallback;
use crate::credentials::Credentials;
use crate::error::{BoxError, ConfigError, Error, SignatureError, TransportError, ValidationError};
use crate::request::{
    ApiRequest, CallbackAck, CheckStatus, CreateInvoice, Refund, RemoveInvoice, Signable, Signed,
};
use crate::response::{
    CheckStatusResponse, CreateInvoiceResponse, GatewayReply, RefundResponse, RemoveInvoiceResponse,
};
use crate::timestamp::UnixTimestamp;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Delivers a serialized request to the gateway and returns the raw reply.
///
/// Implementations POST `body` (a JSON object) to `path` below their base
/// URL and resolve to the reply body. Any failure to obtain a 2xx reply,
/// including timeouts, is reported as an error; the client wraps it in
/// [`TransportError::Http`].
pub trait Transport: Send + Sync {
    /// Posts `body` to `path`.
    fn post<'a>(&'a self, path: &'a str, body: Vec<u8>) -> BoxFuture<'a, Result<Vec<u8>, BoxError>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post<'a>(
        &'a self,
        path: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<Vec<u8>, BoxError>> {
        (**self).post(path, body)
    }
}

/// A WayForPay client over transport `T`.
///
/// Holds immutable credentials and no other state, so it can be shared
/// across tasks whenever `T` can.
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    credentials: Credentials,
}

impl<T> Client<T> {
    /// Creates a client from a transport and validated credentials.
    pub const fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Creates a client from a raw merchant account and secret.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either value is empty.
    pub fn try_new(
        transport: T,
        merchant_account: impl Into<String>,
        merchant_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let credentials = Credentials::new(merchant_account, merchant_secret)?;
        Ok(Self::new(transport, credentials))
    }

    /// Returns the merchant credentials.
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Starts a `CREATE_INVOICE` draft seeded with this merchant's account
    /// and the gateway defaults.
    pub fn create_invoice_request(&self) -> CreateInvoice {
        CreateInvoice::new(self.credentials.merchant_account())
    }

    /// Starts a `REMOVE_INVOICE` draft for `order_reference`.
    pub fn remove_invoice_request(&self, order_reference: impl Into<String>) -> RemoveInvoice {
        RemoveInvoice::new(self.credentials.merchant_account())
            .with_order_reference(order_reference)
    }

    /// Starts a `CHECK_STATUS` draft for `order_reference`.
    pub fn check_status_request(&self, order_reference: impl Into<String>) -> CheckStatus {
        CheckStatus::new(self.credentials.merchant_account(), order_reference)
    }

    /// Starts a `REFUND` draft seeded with this merchant's account.
    pub fn refund_request(&self) -> Refund {
        Refund::new(self.credentials.merchant_account())
    }

    /// Validates and signs `draft` with this client's credentials.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn sign<R: Signable>(&self, draft: R) -> Result<Signed<R>, ValidationError> {
        draft.sign(&self.credentials)
    }

    /// Builds the signed `accept` reply to a service callback.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `order_reference` is empty or `time`
    /// is unset.
    pub fn callback_ack(
        &self,
        order_reference: impl Into<String>,
        time: impl Into<UnixTimestamp>,
    ) -> Result<Signed<CallbackAck>, ValidationError> {
        self.sign(CallbackAck::new(order_reference, time))
    }

    /// Checks the signature of a service callback.
    ///
    /// # Errors
    ///
    /// Returns a [`SignatureError`] if the signature is missing, malformed or
    /// does not match the callback.
    pub fn verify_callback(&self, callback: &ServiceCallback) -> Result<(), SignatureError> {
        callback.verify_signature(&self.credentials)
    }

    /// Builds the signed reply to `callback`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the callback has no order reference.
    pub fn acknowledge(
        &self,
        callback: &ServiceCallback,
    ) -> Result<Signed<CallbackAck>, ValidationError> {
        self.callback_ack(callback.order_reference.as_str(), UnixTimestamp::now())
    }
}

impl<T: Transport> Client<T> {
    /// Signs `draft` and sends it.
    ///
    /// Validation runs first; an invalid draft never reaches the transport.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the draft is incomplete
    /// - [`Error::Transport`] if no decodable reply was received
    /// - [`Error::Gateway`] if the reply's reason code is not `1100`
    pub async fn send<R: ApiRequest>(&self, draft: R) -> Result<R::Response, Error> {
        let signed = self.sign(draft)?;
        self.send_signed(&signed).await
    }

    /// Sends an already signed request.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    #[cfg(feature = "telemetry")]
    pub async fn send_signed<R: ApiRequest>(
        &self,
        signed: &Signed<R>,
    ) -> Result<R::Response, Error> {
        with_span(
            self.round_trip(signed),
            tracing::info_span!(
                "wayforpay.client.send",
                transaction = %R::TRANSACTION,
                order_reference = signed.request().order_reference(),
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            ),
        )
        .await
    }

    /// Sends an already signed request.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    #[cfg(not(feature = "telemetry"))]
    pub async fn send_signed<R: ApiRequest>(
        &self,
        signed: &Signed<R>,
    ) -> Result<R::Response, Error> {
        self.round_trip(signed).await
    }

    /// Issues an invoice.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn create_invoice(
        &self,
        draft: CreateInvoice,
    ) -> Result<CreateInvoiceResponse, Error> {
        self.send(draft).await
    }

    /// Cancels an invoice.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn remove_invoice(
        &self,
        draft: RemoveInvoice,
    ) -> Result<RemoveInvoiceResponse, Error> {
        self.send(draft).await
    }

    /// Queries the state of an order.
    ///
    /// The reply's own signature is not checked here; see
    /// [`CheckStatusResponse::verify_signature`].
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn check_status(&self, draft: CheckStatus) -> Result<CheckStatusResponse, Error> {
        self.send(draft).await
    }

    /// Refunds a payment.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn refund(&self, draft: Refund) -> Result<RefundResponse, Error> {
        self.send(draft).await
    }

    async fn round_trip<R: ApiRequest>(&self, signed: &Signed<R>) -> Result<R::Response, Error> {
        let result = self.exchange(signed).await;
        record_result_on_span(&result);
        result
    }

    async fn exchange<R: ApiRequest>(&self, signed: &Signed<R>) -> Result<R::Response, Error> {
        let body = serde_json::to_vec(signed).map_err(Error::Encode)?;
        let reply = self
            .transport
            .post(R::PATH, body)
            .await
            .map_err(TransportError::Http)?;
        let response: R::Response =
            serde_json::from_slice(&reply).map_err(TransportError::MalformedBody)?;
        Ok(response.into_result()?)
    }
}

/// Records the outcome of a request on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
        }
    }
}

/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}

/// Instruments a future with a given tracing span.
#[cfg(feature = "telemetry")]
fn with_span<F: Future>(fut: F, span: Span) -> impl Future<Output = F::Output> {
    fut.instrument(span)
}
