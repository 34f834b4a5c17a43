use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Field, RequestKind, Signable, is_set};
use crate::timestamp::UnixTimestamp;

/// Status the merchant reports back for a service callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    /// The callback was received and processed.
    #[default]
    Accept,
}

impl AckStatus {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
        }
    }
}

impl fmt::Display for AckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The merchant's reply to a service callback.
///
/// The gateway keeps re-sending a callback until it receives this object,
/// signed with the merchant secret, as the response body. Unlike API
/// requests the signature travels under the `signature` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackAck {
    order_reference: String,
    status: AckStatus,
    time: UnixTimestamp,
}

impl CallbackAck {
    /// Creates an `accept` acknowledgement for `order_reference` at `time`.
    #[must_use]
    pub fn new(order_reference: impl Into<String>, time: impl Into<UnixTimestamp>) -> Self {
        Self {
            order_reference: order_reference.into(),
            status: AckStatus::Accept,
            time: time.into(),
        }
    }

    /// Returns the acknowledged order reference.
    #[must_use]
    pub fn order_reference(&self) -> &str {
        &self.order_reference
    }

    /// Returns the acknowledgement status.
    #[must_use]
    pub const fn status(&self) -> AckStatus {
        self.status
    }

    /// Returns the acknowledgement time.
    #[must_use]
    pub const fn time(&self) -> UnixTimestamp {
        self.time
    }
}

impl Signable for CallbackAck {
    const KIND: RequestKind = RequestKind::CallbackAck;
    const REQUIRED: &'static [Field] = &[Field::OrderReference, Field::Time];
    const SIGNATURE_FIELD: &'static str = "signature";

    fn canonical_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.order_reference.as_str()),
            Cow::Borrowed(self.status.as_str()),
            Cow::Owned(self.time.to_string()),
        ]
    }

    fn has_field(&self, field: Field) -> bool {
        match field {
            Field::OrderReference => is_set(&self.order_reference),
            Field::Time => !self.time.is_unset(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;

    #[test]
    fn test_ack_golden_vector() {
        let credentials = Credentials::new("test_merch_n1", "flk3409refn54t54t*FNJRET").unwrap();
        let signed = CallbackAck::new("AAA", UnixTimestamp::from_secs(123_456_789))
            .sign(&credentials)
            .unwrap();
        assert_eq!(
            signed.signature().to_hex(),
            "7685833061e09025c2d7afab01404f6e"
        );

        let json = serde_json::to_value(&signed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "orderReference": "AAA",
                "status": "accept",
                "time": 123_456_789,
                "signature": "7685833061e09025c2d7afab01404f6e",
            })
        );
    }

    #[test]
    fn test_ack_requires_time() {
        let credentials = Credentials::new("test_merch_n1", "secret").unwrap();
        let err = CallbackAck::new("AAA", UnixTimestamp::default())
            .sign(&credentials)
            .unwrap_err();
        assert_eq!(err.field(), Some(Field::Time));
    }
}
