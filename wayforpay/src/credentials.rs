//! Merchant credentials.
//!
//! A merchant is identified to the gateway by its public account login and
//! authenticates by signing requests with a shared secret key. The secret is
//! never transmitted.

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// Merchant account login and secret key.
///
/// Both parts are required and immutable once constructed. The secret is held
/// in a [`SecretString`], so it never appears in `Debug` output.
///
/// # Example
///
/// ```rust
/// use wayforpay::Credentials;
///
/// let credentials = Credentials::new("test_merch_n1", "flk3409refn54t54t*FNJRET").unwrap();
/// assert_eq!(credentials.merchant_account(), "test_merch_n1");
/// ```
#[derive(Debug)]
pub struct Credentials {
    merchant_account: String,
    merchant_secret: SecretString,
}

impl Credentials {
    /// Creates credentials from a merchant account and secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MerchantAccountRequired`] if `merchant_account`
    /// is empty, or [`ConfigError::MerchantSecretRequired`] if
    /// `merchant_secret` is empty.
    pub fn new(
        merchant_account: impl Into<String>,
        merchant_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let merchant_account = merchant_account.into();
        let merchant_secret = merchant_secret.into();
        if merchant_account.is_empty() {
            return Err(ConfigError::MerchantAccountRequired);
        }
        if merchant_secret.is_empty() {
            return Err(ConfigError::MerchantSecretRequired);
        }
        Ok(Self {
            merchant_account,
            merchant_secret: SecretString::from(merchant_secret),
        })
    }

    /// Returns the public merchant account login.
    #[must_use]
    pub fn merchant_account(&self) -> &str {
        &self.merchant_account
    }

    /// Returns the secret key bytes used as the HMAC key.
    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.merchant_secret.expose_secret().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_account_is_rejected() {
        let err = Credentials::new("", "secret").unwrap_err();
        assert_eq!(err, ConfigError::MerchantAccountRequired);
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let err = Credentials::new("merchant", "").unwrap_err();
        assert_eq!(err, ConfigError::MerchantSecretRequired);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("merchant", "top-secret-key").unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("merchant"));
        assert!(!debug.contains("top-secret-key"));
    }
}
