//! Gateway request drafts and their signed form.
//!
//! Every request type is a plain *draft*: an owned value built with chained
//! `with_*` setters and carrying no signature. A draft becomes sendable only
//! by [`Signable::sign`], which validates it and pairs it with the HMAC of its
//! canonical message in an immutable [`Signed`] value. Editing a signed
//! request means taking the draft back out with [`Signed::into_inner`] and
//! signing again, so a signature can never go stale.
//!
//! # Request types
//!
//! | Type | Transaction | Canonical fields |
//! |---|---|---|
//! | [`CreateInvoice`] | `CREATE_INVOICE` | account, domain, reference, date, amount, currency, names…, counts…, prices… |
//! | [`RemoveInvoice`] | `REMOVE_INVOICE` | account, reference |
//! | [`CheckStatus`] | `CHECK_STATUS` | account, reference |
//! | [`Refund`] | `REFUND` | account, reference, amount, currency |
//! | [`CallbackAck`] | (reply to a service callback) | reference, status, time |

use std::borrow::Cow;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use crate::credentials::Credentials;
use crate::error::ValidationError;
use crate::response::GatewayReply;
use crate::signature::Signature;
use crate::validate::validate;

mod ack;
mod check_status;
mod invoice;
mod refund;

pub use ack::{AckStatus, CallbackAck};
pub use check_status::CheckStatus;
pub use invoice::{CreateInvoice, ProductLine, RemoveInvoice};
pub use refund::Refund;

/// Identifies a request variant in validation errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// [`CreateInvoice`].
    CreateInvoice,
    /// [`RemoveInvoice`].
    RemoveInvoice,
    /// [`CheckStatus`].
    CheckStatus,
    /// [`Refund`].
    Refund,
    /// [`CallbackAck`].
    CallbackAck,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateInvoice => "CREATE_INVOICE",
            Self::RemoveInvoice => "REMOVE_INVOICE",
            Self::CheckStatus => "CHECK_STATUS",
            Self::Refund => "REFUND",
            Self::CallbackAck => "CALLBACK_ACK",
        })
    }
}

/// A request field that validation can report as missing.
///
/// `Display` renders the field's JSON name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `merchantAccount`
    MerchantAccount,
    /// `merchantDomainName`
    MerchantDomainName,
    /// `apiVersion`
    ApiVersion,
    /// `orderReference`
    OrderReference,
    /// `orderDate`
    OrderDate,
    /// `amount`
    Amount,
    /// `currency`
    Currency,
    /// `productName`
    ProductName,
    /// `productPrice`
    ProductPrice,
    /// `productCount`
    ProductCount,
    /// `time`
    Time,
}

impl Field {
    /// Returns the JSON key of this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MerchantAccount => "merchantAccount",
            Self::MerchantDomainName => "merchantDomainName",
            Self::ApiVersion => "apiVersion",
            Self::OrderReference => "orderReference",
            Self::OrderDate => "orderDate",
            Self::Amount => "amount",
            Self::Currency => "currency",
            Self::ProductName => "productName",
            Self::ProductPrice => "productPrice",
            Self::ProductCount => "productCount",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `transactionType` tag of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Issue an invoice the client pays by following a link.
    CreateInvoice,
    /// Cancel a previously issued invoice.
    RemoveInvoice,
    /// Query the state of an order.
    CheckStatus,
    /// Refund a settled payment, fully or partially.
    Refund,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateInvoice => "CREATE_INVOICE",
            Self::RemoveInvoice => "REMOVE_INVOICE",
            Self::CheckStatus => "CHECK_STATUS",
            Self::Refund => "REFUND",
        })
    }
}

/// How the merchant authenticates an invoice (`merchantAuthType`).
///
/// The two `Siganture` spellings match the gateway's wire values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMode {
    /// HMAC-MD5 request signature.
    #[default]
    #[serde(rename = "SimpleSignature")]
    Simple,
    /// Ticket-based authentication.
    Ticket,
    /// Password-based authentication.
    Password,
    /// Check-string authentication.
    CheckString,
    /// Check-string authentication (PB variant).
    CheckStringPb,
    /// LiqPay v3 signature.
    #[serde(rename = "LiqPay3Siganture")]
    LiqPay3,
    /// Ecwid e-check signature.
    #[serde(rename = "EcwidEcheckSiganture")]
    EcwidEcheck,
}

/// Invoice page language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    /// Russian.
    Ru,
    /// Ukrainian.
    Ua,
    /// English.
    #[default]
    En,
}

/// Channel used to deliver an invoice to the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyMethod {
    /// Text message.
    Sms,
    /// Email.
    Email,
    /// Messenger bot.
    Bot,
    /// Every available channel.
    #[default]
    All,
}

/// A value that can be signed with the merchant secret.
///
/// Implementors describe themselves as data: which fields are required, in
/// what order the canonical message lists field values, and under which JSON
/// key the signature travels. Validation and signing are implemented once on
/// top of that description.
pub trait Signable: Serialize + Sized {
    /// Variant identity reported in validation errors.
    const KIND: RequestKind;

    /// Required fields, checked in order by [`validate`].
    const REQUIRED: &'static [Field];

    /// JSON key under which the signature is serialized.
    const SIGNATURE_FIELD: &'static str = "merchantSignature";

    /// Field values of the canonical message, in signing order.
    fn canonical_fields(&self) -> Vec<Cow<'_, str>>;

    /// Returns `true` if `field` is populated.
    ///
    /// Only called for fields listed in [`Signable::REQUIRED`].
    fn has_field(&self, field: Field) -> bool;

    /// Cross-field checks run after the required-field table.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the inconsistency.
    fn check_consistency(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Computes the signature of the canonical message without validating.
    fn signature(&self, credentials: &Credentials) -> Signature {
        Signature::compute(credentials.secret_bytes(), self.canonical_fields())
    }

    /// Validates the draft and signs it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn sign(self, credentials: &Credentials) -> Result<Signed<Self>, ValidationError> {
        Signed::new(self, credentials)
    }
}

/// A signable request the gateway API accepts directly.
pub trait ApiRequest: Signable + Send + Sync {
    /// The `transactionType` this request carries.
    const TRANSACTION: TransactionType;

    /// Endpoint path appended to the API base URL.
    const PATH: &'static str;

    /// The typed reply to this request.
    type Response: GatewayReply + DeserializeOwned + Send;

    /// The order this request concerns.
    fn order_reference(&self) -> &str;
}

/// A validated request paired with the signature of its canonical message.
///
/// Immutable: the only way to change a field is [`Signed::into_inner`]
/// followed by a fresh [`Signable::sign`].
///
/// Serializes as the request's JSON object with the signature added under
/// [`Signable::SIGNATURE_FIELD`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed<R> {
    request: R,
    signature: Signature,
}

impl<R: Signable> Signed<R> {
    /// Validates `request` and signs it with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found; nothing is signed then.
    pub fn new(request: R, credentials: &Credentials) -> Result<Self, ValidationError> {
        validate(&request)?;
        let signature = request.signature(credentials);
        Ok(Self { request, signature })
    }

    /// Pairs `request` with a signature computed elsewhere.
    ///
    /// The signature is not checked against the request; use
    /// [`Signed::verify`] for that.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn with_signature(request: R, signature: Signature) -> Result<Self, ValidationError> {
        validate(&request)?;
        Ok(Self { request, signature })
    }

    /// Returns the signed draft.
    pub const fn request(&self) -> &R {
        &self.request
    }

    /// Returns the signature.
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Checks that the signature matches the request under `credentials`.
    pub fn verify(&self, credentials: &Credentials) -> bool {
        self.signature
            .verify(credentials.secret_bytes(), self.request.canonical_fields())
    }

    /// Returns the draft, discarding the signature.
    pub fn into_inner(self) -> R {
        self.request
    }
}

impl<R: Signable> Serialize for Signed<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error;

        let mut value = serde_json::to_value(&self.request).map_err(S::Error::custom)?;
        let Some(object) = value.as_object_mut() else {
            return Err(S::Error::custom("signed request must be a JSON object"));
        };
        object.insert(
            R::SIGNATURE_FIELD.to_owned(),
            serde_json::Value::String(self.signature.to_hex()),
        );
        value.serialize(serializer)
    }
}

/// Presence test shared by the string fields of every draft.
fn is_set(value: &str) -> bool {
    !value.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_is_required_by_some_request() {
        let tables = [
            CreateInvoice::REQUIRED,
            RemoveInvoice::REQUIRED,
            CheckStatus::REQUIRED,
            Refund::REQUIRED,
            CallbackAck::REQUIRED,
        ];
        for field in [
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
            Field::Time,
        ] {
            assert!(
                tables.iter().any(|table| table.contains(&field)),
                "{field} is never required"
            );
        }
    }

    #[test]
    fn test_transaction_type_wire_names() {
        for (tx, name) in [
            (TransactionType::CreateInvoice, "CREATE_INVOICE"),
            (TransactionType::RemoveInvoice, "REMOVE_INVOICE"),
            (TransactionType::CheckStatus, "CHECK_STATUS"),
            (TransactionType::Refund, "REFUND"),
        ] {
            assert_eq!(serde_json::to_value(tx).unwrap(), name);
            assert_eq!(tx.to_string(), name);
        }
    }

    #[test]
    fn test_signature_mode_wire_names() {
        assert_eq!(
            serde_json::to_value(SignatureMode::Simple).unwrap(),
            "SimpleSignature"
        );
        assert_eq!(
            serde_json::to_value(SignatureMode::LiqPay3).unwrap(),
            "LiqPay3Siganture"
        );
        assert_eq!(
            serde_json::to_value(SignatureMode::CheckStringPb).unwrap(),
            "CheckStringPb"
        );
    }

    #[test]
    fn test_language_and_notify_method_wire_names() {
        assert_eq!(serde_json::to_value(Language::Ua).unwrap(), "UA");
        assert_eq!(serde_json::to_value(NotifyMethod::All).unwrap(), "all");
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn test_field_display_is_json_key() {
        assert_eq!(Field::MerchantDomainName.to_string(), "merchantDomainName");
        assert_eq!(Field::OrderDate.as_str(), "orderDate");
    }
}
