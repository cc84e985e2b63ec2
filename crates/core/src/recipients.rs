//! Email recipient validation for report delivery.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// Loose syntactic check: something@something.tld, no whitespace.
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_RE.is_match(address)
}

/// Trim and validate a recipient list.
///
/// The batch is rejected as a whole: if any address is malformed nothing is
/// sent, and the error names every offending address.
pub fn validate_recipients(recipients: &[String]) -> Result<Vec<String>, CoreError> {
    let cleaned: Vec<String> = recipients
        .iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    if cleaned.is_empty() {
        return Err(CoreError::Validation(
            "At least one recipient email is required".to_string(),
        ));
    }

    let invalid: Vec<&str> = cleaned
        .iter()
        .filter(|r| !is_valid_email(r))
        .map(String::as_str)
        .collect();

    if !invalid.is_empty() {
        return Err(CoreError::Validation(format!(
            "Invalid email addresses: {}",
            invalid.join(", ")
        )));
    }

    Ok(cleaned)
}
