use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use super::{
    ApiRequest, Field, Language, NotifyMethod, RequestKind, SignatureMode, Signable,
    TransactionType, is_set,
};
use crate::error::ValidationError;
use crate::response::{CreateInvoiceResponse, RemoveInvoiceResponse};
use crate::timestamp::UnixTimestamp;
use crate::version::ApiVersion;

/// A `CREATE_INVOICE` request.
///
/// Products are stored as three parallel sequences (`productName`,
/// `productPrice`, `productCount`), the shape the gateway expects. They only
/// grow together through [`CreateInvoice::add_product`].
///
/// # Example
///
/// ```rust
/// use rust_decimal::Decimal;
/// use wayforpay::{CreateInvoice, Credentials, Signable, UnixTimestamp};
///
/// let credentials = Credentials::new("test_merch_n1", "flk3409refn54t54t*FNJRET").unwrap();
/// let signed = CreateInvoice::new(credentials.merchant_account())
///     .with_merchant_domain_name("shop.example")
///     .with_order_reference("order-1")
///     .with_order_date(UnixTimestamp::from_secs(1_700_000_000))
///     .with_amount(Decimal::new(100, 0))
///     .with_currency("UAH")
///     .add_product("Socks", Decimal::new(100, 0), 1)
///     .sign(&credentials)
///     .unwrap();
/// assert_eq!(signed.signature().to_hex().len(), 32);
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    transaction_type: TransactionType,
    merchant_account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    merchant_transaction_type: Option<String>,
    #[serde(default)]
    merchant_auth_type: SignatureMode,
    #[serde(default)]
    merchant_domain_name: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    api_version: ApiVersion,
    #[serde(default)]
    language: Language,
    #[serde(default)]
    notify_method: NotifyMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_url: Option<String>,
    #[serde(default)]
    order_reference: String,
    #[serde(default)]
    order_date: UnixTimestamp,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alternative_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alternative_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hold_timeout: Option<u64>,
    #[serde(default)]
    product_name: Vec<String>,
    #[serde(default)]
    product_price: Vec<Decimal>,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    #[serde(default)]
    product_count: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment_systems: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_phone: Option<String>,
}

/// One invoice line: name, unit price and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductLine<'a> {
    /// Product name.
    pub name: &'a str,
    /// Unit price.
    pub price: Decimal,
    /// Quantity.
    pub count: u32,
}

impl CreateInvoice {
    /// Creates a draft for `merchant_account` with the gateway defaults:
    /// API version 1, language `EN`, notify method `all` and
    /// `SimpleSignature` authentication.
    #[must_use]
    pub fn new(merchant_account: impl Into<String>) -> Self {
        Self {
            transaction_type: TransactionType::CreateInvoice,
            merchant_account: merchant_account.into(),
            merchant_transaction_type: None,
            merchant_auth_type: SignatureMode::Simple,
            merchant_domain_name: String::new(),
            api_version: ApiVersion::V1,
            language: Language::En,
            notify_method: NotifyMethod::All,
            service_url: None,
            order_reference: String::new(),
            order_date: UnixTimestamp::default(),
            amount: None,
            currency: String::new(),
            alternative_amount: None,
            alternative_currency: None,
            order_timeout: None,
            hold_timeout: None,
            product_name: Vec::new(),
            product_price: Vec::new(),
            product_count: Vec::new(),
            payment_systems: None,
            client_first_name: None,
            client_last_name: None,
            client_email: None,
            client_phone: None,
        }
    }

    /// Sets the merchant account.
    #[must_use]
    pub fn with_merchant_account(mut self, merchant_account: impl Into<String>) -> Self {
        self.merchant_account = merchant_account.into();
        self
    }

    /// Sets the merchant transaction type (e.g. `AUTO`, `AUTH`, `SALE`).
    #[must_use]
    pub fn with_merchant_transaction_type(mut self, kind: impl Into<String>) -> Self {
        self.merchant_transaction_type = Some(kind.into());
        self
    }

    /// Sets the merchant authentication mode. Default: `SimpleSignature`.
    #[must_use]
    pub const fn with_merchant_auth_type(mut self, mode: SignatureMode) -> Self {
        self.merchant_auth_type = mode;
        self
    }

    /// Sets the merchant site domain.
    #[must_use]
    pub fn with_merchant_domain_name(mut self, domain: impl Into<String>) -> Self {
        self.merchant_domain_name = domain.into();
        self
    }

    /// Sets the API version. Default: 1.
    #[must_use]
    pub const fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Sets the invoice language. Default: `EN`.
    #[must_use]
    pub const fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets how the invoice is delivered. Default: `all`.
    #[must_use]
    pub const fn with_notify_method(mut self, method: NotifyMethod) -> Self {
        self.notify_method = method;
        self
    }

    /// Sets the URL the gateway posts the payment result to.
    #[must_use]
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    /// Sets the merchant's unique order reference.
    #[must_use]
    pub fn with_order_reference(mut self, reference: impl Into<String>) -> Self {
        self.order_reference = reference.into();
        self
    }

    /// Sets the order date.
    #[must_use]
    pub fn with_order_date(mut self, date: impl Into<UnixTimestamp>) -> Self {
        self.order_date = date.into();
        self
    }

    /// Sets the order total.
    #[must_use]
    pub const fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the order currency (ISO 4217 code, e.g. `UAH`).
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Sets an alternative total shown to the client.
    #[must_use]
    pub const fn with_alternative_amount(mut self, amount: Decimal) -> Self {
        self.alternative_amount = Some(amount);
        self
    }

    /// Sets the currency of the alternative total.
    #[must_use]
    pub fn with_alternative_currency(mut self, currency: impl Into<String>) -> Self {
        self.alternative_currency = Some(currency.into());
        self
    }

    /// Sets how long, in seconds, the invoice stays payable.
    #[must_use]
    pub const fn with_order_timeout(mut self, seconds: u64) -> Self {
        self.order_timeout = Some(seconds);
        self
    }

    /// Sets how long, in seconds, funds stay on hold.
    #[must_use]
    pub const fn with_hold_timeout(mut self, seconds: u64) -> Self {
        self.hold_timeout = Some(seconds);
        self
    }

    /// Appends a product line to all three product sequences.
    #[must_use]
    pub fn add_product(mut self, name: impl Into<String>, price: Decimal, count: u32) -> Self {
        self.product_name.push(name.into());
        self.product_price.push(price);
        self.product_count.push(count);
        self
    }

    /// Restricts the payment systems offered (e.g. `card`, `googlePay`).
    #[must_use]
    pub fn with_payment_systems<I, S>(mut self, systems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = systems
            .into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(";");
        self.payment_systems = Some(joined);
        self
    }

    /// Sets the client's first name.
    #[must_use]
    pub fn with_client_first_name(mut self, name: impl Into<String>) -> Self {
        self.client_first_name = Some(name.into());
        self
    }

    /// Sets the client's last name.
    #[must_use]
    pub fn with_client_last_name(mut self, name: impl Into<String>) -> Self {
        self.client_last_name = Some(name.into());
        self
    }

    /// Sets the client's email.
    #[must_use]
    pub fn with_client_email(mut self, email: impl Into<String>) -> Self {
        self.client_email = Some(email.into());
        self
    }

    /// Sets the client's phone number.
    #[must_use]
    pub fn with_client_phone(mut self, phone: impl Into<String>) -> Self {
        self.client_phone = Some(phone.into());
        self
    }

    /// Returns the merchant account.
    #[must_use]
    pub fn merchant_account(&self) -> &str {
        &self.merchant_account
    }

    /// Returns the order total, if set.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// Returns the currency.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the order date.
    #[must_use]
    pub const fn order_date(&self) -> UnixTimestamp {
        self.order_date
    }

    /// Returns the product lines. Trailing entries of longer sequences are
    /// skipped if the sequences disagree in length.
    pub fn products(&self) -> impl Iterator<Item = ProductLine<'_>> {
        self.product_name
            .iter()
            .zip(&self.product_price)
            .zip(&self.product_count)
            .map(|((name, price), count)| ProductLine {
                name,
                price: *price,
                count: *count,
            })
    }
}

impl Signable for CreateInvoice {
    const KIND: RequestKind = RequestKind::CreateInvoice;

    const REQUIRED: &'static [Field] = &[
        Field::MerchantAccount,
        Field::MerchantDomainName,
        Field::ApiVersion,
        Field::OrderReference,
        Field::OrderDate,
        Field::Amount,
        Field::Currency,
        Field::ProductName,
        Field::ProductPrice,
        Field::ProductCount,
    ];

    fn canonical_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = Vec::with_capacity(6 + 3 * self.product_name.len());
        fields.push(Cow::Borrowed(self.merchant_account.as_str()));
        fields.push(Cow::Borrowed(self.merchant_domain_name.as_str()));
        fields.push(Cow::Borrowed(self.order_reference.as_str()));
        fields.push(Cow::Owned(self.order_date.to_string()));
        fields.push(
            self.amount
                .map_or(Cow::Borrowed(""), |amount| Cow::Owned(amount.to_string())),
        );
        fields.push(Cow::Borrowed(self.currency.as_str()));
        fields.extend(self.product_name.iter().map(|n| Cow::Borrowed(n.as_str())));
        fields.extend(self.product_count.iter().map(|c| Cow::Owned(c.to_string())));
        fields.extend(self.product_price.iter().map(|p| Cow::Owned(p.to_string())));
        fields
    }

    fn has_field(&self, field: Field) -> bool {
        match field {
            Field::MerchantAccount => is_set(&self.merchant_account),
            Field::MerchantDomainName => is_set(&self.merchant_domain_name),
            Field::ApiVersion => !self.api_version.is_unset(),
            Field::OrderReference => is_set(&self.order_reference),
            Field::OrderDate => !self.order_date.is_unset(),
            Field::Amount => self.amount.is_some(),
            Field::Currency => is_set(&self.currency),
            Field::ProductName => !self.product_name.is_empty(),
            Field::ProductPrice => !self.product_price.is_empty(),
            Field::ProductCount => !self.product_count.is_empty(),
            Field::Time => true,
        }
    }

    fn check_consistency(&self) -> Result<(), ValidationError> {
        let names = self.product_name.len();
        let prices = self.product_price.len();
        let counts = self.product_count.len();
        if names == prices && prices == counts {
            Ok(())
        } else {
            Err(ValidationError::ProductLinesMismatch {
                request: Self::KIND,
                names,
                prices,
                counts,
            })
        }
    }
}

impl ApiRequest for CreateInvoice {
    const TRANSACTION: TransactionType = TransactionType::CreateInvoice;
    const PATH: &'static str = "/pay";
    type Response = CreateInvoiceResponse;

    fn order_reference(&self) -> &str {
        &self.order_reference
    }
}

/// A `REMOVE_INVOICE` request cancelling an unpaid invoice.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveInvoice {
    transaction_type: TransactionType,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    api_version: ApiVersion,
    merchant_account: String,
    #[serde(default)]
    order_reference: String,
}

impl RemoveInvoice {
    /// Creates a draft for `merchant_account` with API version 1.
    #[must_use]
    pub fn new(merchant_account: impl Into<String>) -> Self {
        Self {
            transaction_type: TransactionType::RemoveInvoice,
            api_version: ApiVersion::V1,
            merchant_account: merchant_account.into(),
            order_reference: String::new(),
        }
    }

    /// Sets the merchant account.
    #[must_use]
    pub fn with_merchant_account(mut self, merchant_account: impl Into<String>) -> Self {
        self.merchant_account = merchant_account.into();
        self
    }

    /// Sets the reference of the invoice to remove.
    #[must_use]
    pub fn with_order_reference(mut self, reference: impl Into<String>) -> Self {
        self.order_reference = reference.into();
        self
    }
}

impl Signable for RemoveInvoice {
    const KIND: RequestKind = RequestKind::RemoveInvoice;
    const REQUIRED: &'static [Field] = &[Field::MerchantAccount, Field::OrderReference];

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
            _ => true,
        }
    }
}

impl ApiRequest for RemoveInvoice {
    const TRANSACTION: TransactionType = TransactionType::RemoveInvoice;
    const PATH: &'static str = "/pay";
    type Response = RemoveInvoiceResponse;

    fn order_reference(&self) -> &str {
        &self.order_reference
    }
}
