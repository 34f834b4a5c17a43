//! Gateway replies.
//!
//! Every reply carries a [`ReasonCode`] and a human-readable reason. Only
//! [`ReasonCode::SUCCESS`] (`1100`) counts as success; the client turns any
//! other code into a [`GatewayError`].

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{DefaultOnNull, DisplayFromStr, PickFirst, serde_as};

use crate::error::GatewayError;

pub use crate::callback::TransactionReport as CheckStatusResponse;

/// Gateway outcome code.
///
/// Accepted on the wire as a JSON number or a numeric string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasonCode(u32);

impl ReasonCode {
    /// `Ok`: the operation succeeded.
    pub const SUCCESS: Self = Self(1100);

    /// Wraps a raw code.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns `true` for [`ReasonCode::SUCCESS`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == Self::SUCCESS.0
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReasonCode {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Common surface of every gateway reply.
pub trait GatewayReply {
    /// The reply's reason code.
    fn reason_code(&self) -> ReasonCode;

    /// The reply's reason text.
    fn reason(&self) -> &str;

    /// Returns `true` when the reason code is [`ReasonCode::SUCCESS`].
    fn is_success(&self) -> bool {
        self.reason_code().is_success()
    }

    /// Returns the reply on success, or the gateway error it carries.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] with the reply's code and reason when the
    /// code is not [`ReasonCode::SUCCESS`].
    fn into_result(self) -> Result<Self, GatewayError>
    where
        Self: Sized,
    {
        if self.is_success() {
            Ok(self)
        } else {
            Err(GatewayError::new(self.reason_code(), self.reason()))
        }
    }
}

/// Reply to `CREATE_INVOICE`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceResponse {
    /// Reason text.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub reason: String,
    /// Reason code.
    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub reason_code: ReasonCode,
    /// Link to the payment page of the new invoice.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub invoice_url: String,
    /// QR code pointing at the payment page.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub qr_code: String,
}

/// Reply to `REMOVE_INVOICE`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveInvoiceResponse {
    /// Reason text.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub reason: String,
    /// Reason code.
    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub reason_code: ReasonCode,
}

/// Reply to `REFUND`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResponse {
    /// Merchant account the refund was made under.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub merchant_account: String,
    /// Refunded order.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub order_reference: String,
    /// Transaction status after the refund, e.g. `Refunded` or `Voided`.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub transaction_status: String,
    /// Reason text.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub reason: String,
    /// Reason code.
    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub reason_code: ReasonCode,
}

macro_rules! impl_gateway_reply {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl GatewayReply for $ty {
                fn reason_code(&self) -> ReasonCode {
                    self.reason_code
                }

                fn reason(&self) -> &str {
                    &self.reason
                }
            }
        )+
    };
}

impl_gateway_reply!(
    CreateInvoiceResponse,
    RemoveInvoiceResponse,
    RefundResponse,
    CheckStatusResponse,
);

/// Deserializes a JSON string or number into its text; `null` becomes empty.
///
/// Inbound amounts are kept as text so that signature checks see exactly
/// what the gateway sent.
pub(crate) fn text_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}
