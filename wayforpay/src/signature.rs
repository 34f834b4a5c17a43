//! HMAC-MD5 request signatures.
//!
//! The gateway authenticates every request by recomputing a keyed hash over
//! an ordered list of field values and comparing it with the signature the
//! merchant sent. The message is the field values joined with `;`, encoded as
//! UTF-8, and the hash is HMAC with MD5 keyed by the merchant secret. The
//! field order for each request type is fixed by the gateway; see the
//! `canonical_fields` implementations in [`crate::request`].

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use md5::Md5;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SignatureError;

type HmacMd5 = Hmac<Md5>;

/// Separator placed between canonical field values.
pub const FIELD_SEPARATOR: &str = ";";

/// Length of a signature in bytes (the MD5 digest size).
pub const SIGNATURE_LEN: usize = 16;

/// Joins canonical field values into the signed message.
///
/// Useful for diagnosing signature mismatches; signing itself streams the
/// fields into the MAC without building this string.
pub fn canonical_message<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut message = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            message.push_str(FIELD_SEPARATOR);
        }
        message.push_str(field.as_ref());
    }
    message
}

/// A 16-byte HMAC-MD5 signature, rendered as 32 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    /// Signs the `;`-joined `fields` with `secret`.
    ///
    /// # Panics
    ///
    /// Never in practice: HMAC accepts keys of any length.
    pub fn compute<I, S>(secret: &[u8], fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let digest = keyed_mac(secret, fields).finalize().into_bytes();
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Checks this signature against `fields` in constant time.
    pub fn verify<I, S>(&self, secret: &[u8], fields: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keyed_mac(secret, fields).verify_slice(&self.0).is_ok()
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Returns the lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

fn keyed_mac<I, S>(secret: &[u8], fields: I) -> HmacMd5
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mac = HmacMd5::new_from_slice(secret).expect("HMAC can take key of any size");
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            mac.update(FIELD_SEPARATOR.as_bytes());
        }
        mac.update(field.as_ref().as_bytes());
    }
    mac
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    /// Parses 32 hex characters, in either letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SignatureError::Missing);
        }
        let mut bytes = [0u8; SIGNATURE_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| SignatureError::Malformed(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
