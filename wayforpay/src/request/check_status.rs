use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use super::{ApiRequest, Field, RequestKind, Signable, TransactionType, is_set};
use crate::response::CheckStatusResponse;
use crate::version::ApiVersion;

/// A `CHECK_STATUS` request querying the state of an order.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatus {
    transaction_type: TransactionType,
    merchant_account: String,
    #[serde(default)]
    order_reference: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    api_version: ApiVersion,
}

impl CheckStatus {
    /// Creates a request for `order_reference` under `merchant_account`.
    #[must_use]
    pub fn new(merchant_account: impl Into<String>, order_reference: impl Into<String>) -> Self {
        Self {
            transaction_type: TransactionType::CheckStatus,
            merchant_account: merchant_account.into(),
            order_reference: order_reference.into(),
            api_version: ApiVersion::V1,
        }
    }

    /// Sets the merchant account.
    #[must_use]
    pub fn with_merchant_account(mut self, merchant_account: impl Into<String>) -> Self {
        self.merchant_account = merchant_account.into();
        self
    }

    /// Sets the order reference.
    #[must_use]
    pub fn with_order_reference(mut self, reference: impl Into<String>) -> Self {
        self.order_reference = reference.into();
        self
    }

    /// Sets the API version. Default: 1.
    #[must_use]
    pub const fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }
}

impl Signable for CheckStatus {
    const KIND: RequestKind = RequestKind::CheckStatus;
    const REQUIRED: &'static [Field] = &[
        Field::MerchantAccount,
        Field::OrderReference,
        Field::ApiVersion,
    ];

    fn canonical_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.merchant_account.as_str()),
            Cow::Borrowed(self.order_reference.as_str()),
        ]
    }

    fn has_field(&self, field: Field) -> bool {
        match field {
            Field::MerchantAccount => is_set(&self.merchant_account),
            Field::OrderReference => is_set(&self.order_reference),
            Field::ApiVersion => !self.api_version.is_unset(),
            _ => true,
        }
    }
}

impl ApiRequest for CheckStatus {
    const TRANSACTION: TransactionType = TransactionType::CheckStatus;
    const PATH: &'static str = "/pay";
    type Response = CheckStatusResponse;

    fn order_reference(&self) -> &str {
        &self.order_reference
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::credentials::Credentials;
    use crate::error::ValidationError;
    use crate::validate::validate;

    #[test]
    fn test_signs_account_and_reference() {
        let credentials = Credentials::new("test_merch_n1", "flk3409refn54t54t*FNJRET").unwrap();
        let signed = CheckStatus::new("test_merch_n1", "order-1")
            .sign(&credentials)
            .unwrap();
        // Same canonical message as REMOVE_INVOICE for the same order.
        assert_eq!(
            signed.signature().to_hex(),
            "f1e0a5eea68a21843f0de01e5ca089bf"
        );

        let json = serde_json::to_value(&signed).unwrap();
        assert_eq!(json["transactionType"], "CHECK_STATUS");
        assert_eq!(json["merchantSignature"], "f1e0a5eea68a21843f0de01e5ca089bf");
        assert_eq!(json["apiVersion"], "1");

        let decoded: CheckStatus = serde_json::from_value(json!({
            "transactionType": "CHECK_STATUS",
            "merchantAccount": "test_merch_n1",
            "orderReference": "order-1",
            "apiVersion": 1,
        }))
        .unwrap();
        assert_eq!(decoded, CheckStatus::new("test_merch_n1", "order-1"));
    }

    #[test]
    fn test_requires_api_version() {
        let draft =
            CheckStatus::new("test_merch_n1", "order-1").with_api_version(ApiVersion::new(0));
        assert_eq!(
            validate(&draft),
            Err(ValidationError::required(
                RequestKind::CheckStatus,
                Field::ApiVersion
            ))
        );
    }

    #[test]
    fn test_requires_order_reference() {
        let draft = CheckStatus::new("test_merch_n1", "");
        assert_eq!(
            validate(&draft).unwrap_err().field(),
            Some(Field::OrderReference)
        );
    }
}
