//! Custom field checks for `#[validate(custom(function = ...))]`.
//!
//! Length and range limits use the built-in `validator` rules; the checks here
//! cover what those rules cannot express.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

pub const BLANK: &str = "This field may not be blank.";

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// The value must contain something other than whitespace.
///
/// # Errors
///
/// Returns a `blank` error for an empty or whitespace-only value.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", BLANK));
    }
    Ok(())
}

/// Every tag must be [`non_blank`].
///
/// # Errors
///
/// Returns a `blank` error if any tag is empty.
pub fn non_blank_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(error("blank", "Tags may not be blank."));
    }
    Ok(())
}

/// Usernames are a single non-empty token.
///
/// # Errors
///
/// Returns a `blank` error for an empty value and a `whitespace` error if the
/// value contains any whitespace.
pub fn username(value: &str) -> Result<(), ValidationError> {
    non_blank(value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(error("whitespace", "Username may not contain spaces."));
    }
    Ok(())
}

/// Monetary amounts may not go below zero.
///
/// # Errors
///
/// Returns a `range` error for a negative amount.
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(error(
            "range",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert!(non_blank("Red Shirt").is_ok());
        let err = non_blank("  \t").unwrap_err();
        assert_eq!(err.code, "blank");
        assert_eq!(err.message.as_deref(), Some(BLANK));
    }

    #[test]
    fn test_tags() {
        assert!(non_blank_tags(&[]).is_ok());
        assert!(non_blank_tags(&["summer".to_string(), " ".to_string()]).is_err());
    }

    #[test]
    fn test_username() {
        assert!(username("jane_doe").is_ok());
        assert_eq!(username("jane doe").unwrap_err().code, "whitespace");
        assert_eq!(username("").unwrap_err().code, "blank");
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&Decimal::new(1999, 2)).is_ok());
        assert!(non_negative(&Decimal::new(-1, 2)).is_err());
    }
}
