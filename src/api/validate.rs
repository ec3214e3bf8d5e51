//! Field validators for the signup form.
//!
//! Pure functions over strings: `None` means the field is acceptable,
//! `Some(message)` carries the human-readable error shown next to the field.
//! Both validators always run so every invalid field is reported in one
//! round trip.

use regex::Regex;

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Normalize an email before validation and before it is sent upstream.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check the email shape: `local@domain.tld` with a dotted domain.
///
/// Deliverability and uniqueness are the auth backend's problem; this only
/// rejects values that cannot be an address.
#[must_use]
pub fn validate_email(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Email is required".to_string());
    }
    let well_formed =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(value));
    if well_formed {
        None
    } else {
        Some("Enter a valid email address".to_string())
    }
}

/// Check the password policy: minimum length plus at least one letter and
/// one digit.
#[must_use]
pub fn validate_password(value: &str) -> Option<String> {
    if value.chars().count() < PASSWORD_MIN_LENGTH {
        return Some(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters"
        ));
    }
    if !value.chars().any(|c| c.is_ascii_alphabetic()) {
        return Some("Password must contain at least one letter".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn validate_email_accepts_basic_format() {
        assert_eq!(validate_email("a@example.com"), None);
        assert_eq!(validate_email("name.surname@example.co"), None);
    }

    #[test]
    fn validate_email_requires_a_value() {
        assert_eq!(validate_email(""), Some("Email is required".to_string()));
    }

    #[test]
    fn validate_email_rejects_missing_parts() {
        assert!(validate_email("not-an-email").is_some());
        assert!(validate_email("missing-at.example.com").is_some());
        assert!(validate_email("missing-domain@").is_some());
        assert!(validate_email("missing-dot@example").is_some());
        assert!(validate_email("spaces in@example.com").is_some());
    }

    #[test]
    fn validate_password_accepts_policy_compliant_values() {
        assert_eq!(validate_password("ValidPass1"), None);
        assert_eq!(validate_password("abcdefg1"), None);
    }

    #[test]
    fn validate_password_rejects_short_values() {
        let message = validate_password("Abc1").expect("short password should fail");
        assert!(message.contains("at least 8"));
        // Empty input fails the same length rule.
        assert!(validate_password("").is_some());
    }

    #[test]
    fn validate_password_requires_character_classes() {
        assert_eq!(
            validate_password("12345678"),
            Some("Password must contain at least one letter".to_string())
        );
        assert_eq!(
            validate_password("abcdefgh"),
            Some("Password must contain at least one number".to_string())
        );
    }
}
