//! Email address value object

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use EmailAddressError::*;

lazy_static! {
    // RFC-light: constrained local part, "@", non-empty domain.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[A-Za-z0-9+_.-]+@.+$").unwrap();
}

/// An error that can occur when creating an email address
#[derive(Debug, Error)]
pub enum EmailAddressError {
    /// The email address is empty
    #[error("email is empty")]
    EmptyEmailAddress,

    /// The email address is invalid
    #[error("email is invalid")]
    InvalidEmailAddress,
}

/// A validated, normalized email address.
///
/// Normalization trims surrounding whitespace and lower-cases the
/// address, so equality and hashing are case-insensitive. Recipient
/// identity everywhere in the crate is keyed by this normalized form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address from raw input
    ///
    /// # Arguments
    /// * `raw` - The raw address, possibly with surrounding whitespace.
    ///
    /// # Returns
    /// A [`Result`] containing the normalized [`EmailAddress`], or an
    /// [`EmailAddressError`] if the input is empty or malformed.
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmptyEmailAddress);
        }

        if !EMAIL_REGEX.is_match(&normalized) {
            return Err(InvalidEmailAddress);
        }

        Ok(Self(normalized))
    }

    /// Create an email address without validation
    ///
    /// Intended for inputs that are already known to be valid, such as
    /// addresses read back from a delivery record.
    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// The normalized address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_email_address_display() -> TestResult {
        let email = EmailAddress::new("email@example.com")?;

        assert_eq!(format!("{}", email), "email@example.com".to_string());

        Ok(())
    }

    #[test]
    fn test_email_address_is_trimmed_and_lowercased() -> TestResult {
        let email = EmailAddress::new("  Ann.Smith@Example.COM ")?;

        assert_eq!(email.as_str(), "ann.smith@example.com");

        Ok(())
    }

    #[test]
    fn test_empty_email_address_is_invalid() {
        let result = EmailAddress::new("   ");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), EmptyEmailAddress));
    }

    #[test]
    fn test_email_address_without_at_symbol_is_invalid() {
        let result = EmailAddress::new("email");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), InvalidEmailAddress));
    }

    #[test]
    fn test_email_address_with_empty_domain_is_invalid() {
        let result = EmailAddress::new("email@");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), InvalidEmailAddress));
    }

    #[test]
    fn test_email_address_with_bad_local_part_is_invalid() {
        let result = EmailAddress::new("an n@example.com");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), InvalidEmailAddress));
    }

    #[test]
    fn test_equality_is_case_insensitive() -> TestResult {
        let lower = EmailAddress::new("bob@x.com")?;
        let upper = EmailAddress::new("BOB@X.COM")?;

        assert_eq!(lower, upper);

        Ok(())
    }

    #[test]
    fn test_valid_email_to_string() -> TestResult {
        let email = EmailAddress::new("email@example.com")?;

        assert_eq!(String::from(email), "email@example.com".to_string());

        Ok(())
    }
}
