//! Inbound transaction reports.
//!
//! The gateway describes a transaction with the same signed report in two
//! places: the reply to `CHECK_STATUS` and the service callback it POSTs to
//! the merchant's `serviceUrl`. Both are verified against the report
//! canonical message:
//!
//! ```text
//! merchantAccount;orderReference;amount;currency;authCode;cardPan;transactionStatus;reasonCode
//! ```
//!
//! A verified service callback is answered with a signed
//! [`CallbackAck`](crate::CallbackAck), otherwise the gateway keeps
//! re-sending it.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, DisplayFromStr, PickFirst, serde_as};

use crate::credentials::Credentials;
use crate::error::SignatureError;
use crate::response::{ReasonCode, text_or_number};
use crate::signature::Signature;
use crate::timestamp::UnixTimestamp;

/// The service callback the gateway POSTs to the merchant.
pub type ServiceCallback = TransactionReport;

/// A signed transaction report.
///
/// Amounts used in the signature are kept as the text the gateway sent.
/// Fields the gateway omits deserialize to their defaults.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReport {
    /// Merchant account the transaction belongs to.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub merchant_account: String,
    /// Order reference.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub order_reference: String,
    /// Report signature as sent, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_signature: Option<String>,
    /// Transaction amount, as sent.
    #[serde(default, deserialize_with = "text_or_number")]
    pub amount: String,
    /// Transaction currency.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub currency: String,
    /// Card issuer authorization code.
    #[serde(default, deserialize_with = "text_or_number")]
    pub auth_code: String,
    /// Masked card number.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub card_pan: String,
    /// Card scheme, e.g. `Visa`.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub card_type: String,
    /// Issuing bank country.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub issuer_bank_country: String,
    /// Issuing bank name.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub issuer_bank_name: String,
    /// Client email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Client phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Token for recurring charges, when issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rec_token: Option<String>,
    /// Payment system used, e.g. `card` or `googlePay`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_system: Option<String>,
    /// When the order was created.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub created_date: UnixTimestamp,
    /// When the payment was processed.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub processing_date: UnixTimestamp,
    /// Transaction status, e.g. `Approved`, `Declined` or `Refunded`.
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
    /// Settlement date, as sent.
    #[serde(default, deserialize_with = "text_or_number")]
    pub settlement_date: String,
    /// Amount settled to the merchant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_amount: Option<Decimal>,
    /// Gateway fee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
}

impl TransactionReport {
    /// Field values of the report canonical message, in signing order.
    #[must_use]
    pub fn canonical_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.merchant_account.as_str()),
            Cow::Borrowed(self.order_reference.as_str()),
            Cow::Borrowed(self.amount.as_str()),
            Cow::Borrowed(self.currency.as_str()),
            Cow::Borrowed(self.auth_code.as_str()),
            Cow::Borrowed(self.card_pan.as_str()),
            Cow::Borrowed(self.transaction_status.as_str()),
            Cow::Owned(self.reason_code.to_string()),
        ]
    }

    /// Parses the report's signature.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Missing`] if the report carries none, or
    /// [`SignatureError::Malformed`] if it is not 32 hex characters.
    pub fn signature(&self) -> Result<Signature, SignatureError> {
        self.merchant_signature
            .as_deref()
            .ok_or(SignatureError::Missing)?
            .parse()
    }

    /// Checks the report's signature against `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Mismatch`] if the signature does not cover
    /// this report under `credentials`, or the error from
    /// [`TransactionReport::signature`].
    pub fn verify_signature(&self, credentials: &Credentials) -> Result<(), SignatureError> {
        let signature = self.signature()?;
        if signature.verify(credentials.secret_bytes(), self.canonical_fields()) {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }
}
