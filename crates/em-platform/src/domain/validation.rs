//! Field validation helpers.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{PlatformError, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*(:\d+)?(/\S*)?$").expect("url regex is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Lowercase the domain part, keep the local part as given
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

pub fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlatformError::invalid_field(field, "This field may not be blank."));
    }
    Ok(())
}

pub fn require_max_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(PlatformError::invalid_field(
            field,
            format!("Ensure this field has no more than {} characters.", max),
        ));
    }
    Ok(())
}

pub fn require_url(field: &str, value: &str, max: usize) -> Result<()> {
    require_max_len(field, value, max)?;
    if !is_valid_url(value) {
        return Err(PlatformError::invalid_field(field, "Enter a valid URL."));
    }
    Ok(())
}

pub fn require_email(field: &str, value: &str) -> Result<()> {
    if !is_valid_email(value) {
        return Err(PlatformError::invalid_field(field, "Enter a valid email address."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane.doe@example.com"));
        assert!(is_valid_email("a+b@sub.example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("x@localhost"));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com:8080/path?q=1"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Jane@Example.COM "), "Jane@example.com");
    }

    #[test]
    fn test_max_len_counts_chars() {
        assert!(require_max_len("name", "ééé", 3).is_ok());
        assert!(require_max_len("name", "abcd", 3).is_err());
    }
}
