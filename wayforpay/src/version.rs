//! Gateway API version marker.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The `apiVersion` value carried by every gateway request.
///
/// Serializes as a bare integer, the form `REFUND` uses. The invoice and
/// status drafts send the numeric string form (`"1"`) through its
/// [`FromStr`](std::str::FromStr) and [`Display`](std::fmt::Display) impls.
/// Deserialization accepts either.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ApiVersion(u8);

impl ApiVersion {
    /// Version 1, the only version the gateway currently serves.
    pub const V1: Self = Self(1);

    /// Creates a version marker from its numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns `true` if no version is set (zero).
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::V1
    }
}

impl From<ApiVersion> for u8 {
    fn from(v: ApiVersion) -> Self {
        v.0
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ApiVersion {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self(0));
        }
        s.parse().map(Self)
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u8),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Self(v)),
            Raw::Text(s) => s.parse().map_err(|_| {
                serde::de::Error::custom(format!("invalid apiVersion {s:?}"))
            }),
        }
    }
}
