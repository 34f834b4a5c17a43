//! HTTP-specific constants for the WayForPay API.

use std::time::Duration;

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.wayforpay.com/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type of every request body.
pub const CONTENT_TYPE_JSON: &str = "application/json";
