//! A [`wayforpay::Transport`] that talks to the gateway over HTTPS.
//!
//! [`HttpTransport`] POSTs each signed request body as JSON to
//! `{base_url}{path}` and hands the raw reply body back to the
//! [`wayforpay::Client`], which decodes it. It sends each request exactly
//! once.
//!
//! ## Features
//!
//! - Uses `reqwest` for async HTTP requests
//! - Supports a per-request timeout and extra headers
//! - Integrates with `tracing` if the `telemetry` feature is enabled
//!
//! ## Error Handling
//!
//! Every failure becomes an [`HttpTransportError`] capturing
//! - URL construction
//! - HTTP transport failures and timeouts
//! - Non-success HTTP status responses
//! - Response body read errors

use std::time::Duration;

use http::HeaderMap;
use http::header::{CONTENT_TYPE, HeaderValue};
use url::Url;
use wayforpay::{BoxError, BoxFuture, Client, Credentials, Transport};

use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::error::HttpTransportError;

/// A gateway client backed by [`HttpTransport`].
pub type HttpClient = Client<HttpTransport>;

/// Configuration for [`HttpTransport`].
#[derive(Clone)]
pub struct HttpTransportConfig {
    /// API base URL. Request paths are appended to it.
    pub url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Extra headers sent with every request.
    pub headers: HeaderMap,

    /// Optional pre-configured reqwest client. If `None`, a new client is
    /// created.
    pub http_client: Option<reqwest::Client>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            headers: HeaderMap::new(),
            http_client: None,
        }
    }
}

impl HttpTransportConfig {
    /// Creates a config with the given API base URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Attaches extra headers to every request.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl std::fmt::Debug for HttpTransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportConfig")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("headers", &self.headers.len())
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// HTTP transport for the WayForPay API.
///
/// # Example
///
/// ```no_run
/// use wayforpay::Credentials;
/// use wayforpay_http::{HttpTransport, HttpTransportConfig};
///
/// let transport = HttpTransport::new(HttpTransportConfig::default()).unwrap();
/// let credentials = Credentials::new("test_merch_n1", "flk3409refn54t54t*FNJRET").unwrap();
/// let client = transport.into_client(credentials);
/// ```
#[derive(Clone, Debug)]
pub struct HttpTransport {
    /// Base URL with a single trailing slash (e.g. `https://api.wayforpay.com/api/`)
    base_url: Url,
    /// Shared Reqwest HTTP client
    client: reqwest::Client,
    /// Custom headers sent with each request
    headers: HeaderMap,
    /// Per-request timeout
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportError::UrlParse`] if the base URL is invalid, or
    /// [`HttpTransportError::Http`] if the HTTP client cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self, HttpTransportError> {
        // Normalize: strip trailing slashes and add a single trailing slash
        let mut normalized = config.url.trim_end_matches('/').to_owned();
        normalized.push('/');
        let base_url = Url::parse(&normalized).map_err(|e| HttpTransportError::UrlParse {
            context: "Failed to parse base url",
            source: e,
        })?;

        let client = match config.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .map_err(|e| HttpTransportError::Http {
                    context: "Failed to build HTTP client",
                    source: e,
                })?,
        };

        Ok(Self {
            base_url,
            client,
            headers: config.headers,
            timeout: config.timeout,
        })
    }

    /// Returns the normalized base URL.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wraps this transport in a [`wayforpay::Client`] for `credentials`.
    #[must_use]
    pub const fn into_client(self, credentials: Credentials) -> HttpClient {
        Client::new(self, credentials)
    }

    /// Resolves a request path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportError::UrlParse`] if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, HttpTransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpTransportError::UrlParse {
                context: "Failed to construct endpoint URL",
                source: e,
            })
    }

    /// POSTs a JSON `body` to `path` and returns the reply body.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpTransportError`] if the request cannot be sent, times
    /// out, or the gateway answers with a non-success HTTP status.
    pub async fn post_json(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, HttpTransportError> {
        let context = "POST gateway request";
        let url = self.endpoint(path)?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(%url, "wayforpay.http.request");

        let http_response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| HttpTransportError::Http { context, source: e })?;

        let status = http_response.status();
        #[cfg(feature = "telemetry")]
        tracing::debug!(%status, "wayforpay.http.response");

        if status.is_success() {
            http_response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|e| HttpTransportError::ResponseBodyRead { context, source: e })
        } else {
            let body = http_response
                .text()
                .await
                .map_err(|e| HttpTransportError::ResponseBodyRead { context, source: e })?;
            Err(HttpTransportError::HttpStatus {
                context,
                status,
                body,
            })
        }
    }
}

impl Transport for HttpTransport {
    fn post<'a>(
        &'a self,
        path: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<Vec<u8>, BoxError>> {
        Box::pin(async move {
            self.post_json(path, body)
                .await
                .map_err(|e| -> BoxError { Box::new(e) })
        })
    }
}

/// Converts a string URL into an [`HttpTransport`] with default settings.
impl TryFrom<&str> for HttpTransport {
    type Error = HttpTransportError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(HttpTransportConfig::new(value))
    }
}

/// Converts a String URL into an [`HttpTransport`].
impl TryFrom<String> for HttpTransport {
    type Error = HttpTransportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderName;
    use rust_decimal::Decimal;
    use serde_json::json;
    use wayforpay::{Error, ReasonCode, TransportError, UnixTimestamp};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const MERCHANT: &str = "test_merch_n1";
    const SECRET: &str = "flk3409refn54t54t*FNJRET";

    fn client_for(server: &MockServer) -> HttpClient {
        let transport = HttpTransport::try_from(server.uri()).unwrap();
        transport.into_client(Credentials::new(MERCHANT, SECRET).unwrap())
    }

    fn transport_error(err: &Error) -> &HttpTransportError {
        match err {
            Error::Transport(TransportError::Http(source)) => {
                source.downcast_ref::<HttpTransportError>().unwrap()
            }
            other => panic!("expected an HTTP transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = HttpTransportConfig::default();
        assert_eq!(config.url, "https://api.wayforpay.com/api");
        assert_eq!(config.timeout, Duration::from_secs(30));

        let transport = HttpTransport::new(config).unwrap();
        assert_eq!(transport.base_url().as_str(), "https://api.wayforpay.com/api/");
        assert_eq!(
            transport.endpoint("/pay").unwrap().as_str(),
            "https://api.wayforpay.com/api/pay"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpTransport::try_from("not a url").unwrap_err();
        assert!(matches!(err, HttpTransportError::UrlParse { .. }));
    }

    #[tokio::test]
    async fn test_create_invoice_posts_signed_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pay"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "transactionType": "CREATE_INVOICE",
                "merchantAccount": MERCHANT,
                "merchantSignature": "40997c9ec75258a54f846d24c1be16a3",
                "productName": ["Socks", "Hat"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reason": "Ok",
                "reasonCode": 1100,
                "invoiceUrl": "https://secure.wayforpay.com/invoice/i1",
                "qrCode": "https://secure.wayforpay.com/qr/i1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let draft = client
            .create_invoice_request()
            .with_merchant_domain_name("test.com")
            .with_order_reference("order-1")
            .with_order_date(UnixTimestamp::from_secs(1_700_000_000))
            .with_amount(Decimal::new(100, 0))
            .with_currency("UAH")
            .add_product("Socks", Decimal::new(5025, 2), 2)
            .add_product("Hat", Decimal::new(9950, 2), 1);

        let reply = client.create_invoice(draft).await.unwrap();
        assert_eq!(reply.invoice_url, "https://secure.wayforpay.com/invoice/i1");
    }

    #[tokio::test]
    async fn test_failure_reason_code_is_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pay"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reason": "Declined To Card Issuer",
                "reasonCode": 1101,
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .remove_invoice(client.remove_invoice_request("order-1"))
            .await
            .unwrap_err();
        let gateway = err.as_gateway().unwrap();
        assert_eq!(gateway.code, ReasonCode::new(1101));
        assert_eq!(
            err.to_string(),
            "api error: code: 1101, reason: Declined To Card Issuer"
        );
    }

    #[tokio::test]
    async fn test_http_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pay"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .check_status(client.check_status_request("order-1"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        let source = transport_error(&err);
        assert_eq!(source.status(), Some(http::StatusCode::INTERNAL_SERVER_ERROR));
        assert!(matches!(
            source,
            HttpTransportError::HttpStatus { body, .. } if body == "upstream down"
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pay"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .check_status(client.check_status_request("order-1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::MalformedBody(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"reason": "Ok", "reasonCode": 1100}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(
            HttpTransportConfig::new(server.uri()).with_timeout(Duration::from_millis(50)),
        )
        .unwrap();
        let client = transport.into_client(Credentials::new(MERCHANT, SECRET).unwrap());
        let err = client
            .remove_invoice(client.remove_invoice_request("order-1"))
            .await
            .unwrap_err();
        assert!(transport_error(&err).is_timeout());
    }

    #[tokio::test]
    async fn test_base_path_and_custom_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/pay"))
            .and(header("x-request-source", "shop"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "orderReference": "order-1",
                    "transactionStatus": "Refunded",
                    "reason": "Ok",
                    "reasonCode": 1100,
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-request-source"),
            HeaderValue::from_static("shop"),
        );
        let transport = HttpTransport::new(
            HttpTransportConfig::new(format!("{}/api/", server.uri()))
                .with_headers(headers)
                .with_http_client(reqwest::Client::new()),
        )
        .unwrap();
        let client = transport.into_client(Credentials::new(MERCHANT, SECRET).unwrap());

        let draft = client
            .refund_request()
            .with_order_reference("order-1")
            .with_amount(Decimal::new(10050, 2))
            .with_currency("UAH");
        let reply = client.refund(draft).await.unwrap();
        assert_eq!(reply.transaction_status, "Refunded");
    }
}
