// Validation utilities module
// Provides custom validation functions for domain-specific rules

use uuid::Uuid;
use validator::ValidationError;

use crate::error::ApiError;

/// Rejects values that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}

/// Parses a resource id taken from the request path
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidInput(format!("'{}' is not a valid id", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\n\t ").is_err());
    }

    #[test]
    fn padded_values_are_accepted() {
        assert!(validate_not_blank("  First Post  ").is_ok());
    }

    #[test]
    fn parse_id_accepts_uuids_only() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("42"), Err(ApiError::InvalidInput(_))));
    }

    proptest! {
        #[test]
        fn prop_whitespace_only_is_blank(value in "[ \t\n\r]{0,20}") {
            prop_assert!(validate_not_blank(&value).is_err());
        }

        #[test]
        fn prop_any_visible_char_is_enough(prefix in "[ \t]{0,5}", word in "[a-zA-Z0-9]{1,20}", suffix in "[ \t]{0,5}") {
            let value = format!("{}{}{}", prefix, word, suffix);
            prop_assert!(validate_not_blank(&value).is_ok());
        }
    }
}
