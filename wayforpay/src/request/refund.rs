use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ApiRequest, Field, RequestKind, Signable, TransactionType, is_set};
use crate::response::RefundResponse;
use crate::version::ApiVersion;

/// A `REFUND` request returning all or part of a settled payment.
///
/// Every field of the canonical message is required, along with the API
/// version: a refund with an empty amount or currency would be signed over
/// empty values and rejected by the gateway anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    transaction_type: TransactionType,
    merchant_account: String,
    #[serde(default)]
    order_reference: String,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    api_version: ApiVersion,
}

impl Refund {
    /// Creates a draft for `merchant_account` with API version 1.
    #[must_use]
    pub fn new(merchant_account: impl Into<String>) -> Self {
        Self {
            transaction_type: TransactionType::Refund,
            merchant_account: merchant_account.into(),
            order_reference: String::new(),
            amount: None,
            currency: String::new(),
            comment: None,
            api_version: ApiVersion::V1,
        }
    }

    /// Sets the merchant account.
    #[must_use]
    pub fn with_merchant_account(mut self, merchant_account: impl Into<String>) -> Self {
        self.merchant_account = merchant_account.into();
        self
    }

    /// Sets the reference of the order to refund.
    #[must_use]
    pub fn with_order_reference(mut self, reference: impl Into<String>) -> Self {
        self.order_reference = reference.into();
        self
    }

    /// Sets the amount to refund.
    #[must_use]
    pub const fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the refund currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Sets a free-form comment stored with the refund.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the API version. Default: 1.
    #[must_use]
    pub const fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Returns the refund amount, if set.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        self.amount
    }
}

impl Signable for Refund {
    const KIND: RequestKind = RequestKind::Refund;
    const REQUIRED: &'static [Field] = &[
        Field::MerchantAccount,
        Field::OrderReference,
        Field::Amount,
        Field::Currency,
        Field::ApiVersion,
    ];

    fn canonical_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.merchant_account.as_str()),
            Cow::Borrowed(self.order_reference.as_str()),
            self.amount
                .map_or(Cow::Borrowed(""), |amount| Cow::Owned(amount.to_string())),
            Cow::Borrowed(self.currency.as_str()),
        ]
    }

    fn has_field(&self, field: Field) -> bool {
        match field {
            Field::MerchantAccount => is_set(&self.merchant_account),
            Field::OrderReference => is_set(&self.order_reference),
            Field::Amount => self.amount.is_some(),
            Field::Currency => is_set(&self.currency),
            Field::ApiVersion => !self.api_version.is_unset(),
            _ => true,
        }
    }
}

impl ApiRequest for Refund {
    const TRANSACTION: TransactionType = TransactionType::Refund;
    const PATH: &'static str = "/pay";
    type Response = RefundResponse;

    fn order_reference(&self) -> &str {
        &self.order_reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;
    use crate::error::ValidationError;
    use crate::signature::canonical_message;
    use crate::validate::validate;

    fn credentials() -> Credentials {
        Credentials::new("test_merch_n1", "flk3409refn54t54t*FNJRET").unwrap()
    }

    fn populated() -> Refund {
        Refund::new("test_merch_n1")
            .with_order_reference("order-1")
            .with_amount(Decimal::new(10050, 2))
            .with_currency("UAH")
    }

    #[test]
    fn test_canonical_message_and_signature() {
        let draft = populated().with_comment("damaged in transit");
        assert_eq!(
            canonical_message(draft.canonical_fields()),
            "test_merch_n1;order-1;100.50;UAH"
        );
        let signed = draft.sign(&credentials()).unwrap();
        assert_eq!(
            signed.signature().to_hex(),
            "174ca12b01221682331c47181a64e2ec"
        );

        let json = serde_json::to_value(&signed).unwrap();
        assert_eq!(json["transactionType"], "REFUND");
        assert_eq!(json["amount"], "100.50");
        assert_eq!(json["comment"], "damaged in transit");
    }

    // Refunds are validated like every other request: each signed field
    // must be present before anything reaches the gateway.
    #[test]
    fn test_refund_validation_enforces_signed_fields() {
        assert_eq!(
            validate(&Refund::new("test_merch_n1")),
            Err(ValidationError::required(
                RequestKind::Refund,
                Field::OrderReference
            ))
        );
        assert_eq!(
            validate(&populated().with_currency("")).unwrap_err().field(),
            Some(Field::Currency)
        );

        let mut json = serde_json::to_value(populated()).unwrap();
        json["amount"] = serde_json::Value::Null;
        let without_amount: Refund = serde_json::from_value(json).unwrap();
        assert_eq!(
            validate(&without_amount).unwrap_err().field(),
            Some(Field::Amount)
        );

        assert!(validate(&populated()).is_ok());
    }
}
