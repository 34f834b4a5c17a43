//! Required-field validation shared by every request type.

use crate::error::ValidationError;
use crate::request::Signable;

/// Checks `request` against its required-field table, then its cross-field
/// rules.
///
/// Fields are checked in table order and the first missing one is reported,
/// so the same draft always yields the same error.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for the first missing field, or
/// whatever [`Signable::check_consistency`] reports.
pub fn validate<R: Signable>(request: &R) -> Result<(), ValidationError> {
    if let Some(field) = R::REQUIRED
        .iter()
        .copied()
        .find(|field| !request.has_field(*field))
    {
        return Err(ValidationError::required(R::KIND, field));
    }
    request.check_consistency()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::request::{CreateInvoice, Field, RequestKind};

    #[test]
    fn test_reports_first_missing_field_in_table_order() {
        // Domain, reference and currency are all missing; domain comes first.
        let draft = CreateInvoice::new("test_merch_n1")
            .with_amount(Decimal::ONE)
            .add_product("Socks", Decimal::ONE, 1);
        assert_eq!(
            validate(&draft),
            Err(ValidationError::required(
                RequestKind::CreateInvoice,
                Field::MerchantDomainName
            ))
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let draft = CreateInvoice::new("");
        assert_eq!(validate(&draft), validate(&draft));
        assert_eq!(validate(&draft).unwrap_err().field(), Some(Field::MerchantAccount));
    }
}
