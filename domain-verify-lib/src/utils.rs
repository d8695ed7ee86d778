//! Utility functions for domain input handling.
//!
//! Normalization turns whatever the user typed or pasted (URLs included)
//! into a [`DomainQuery`]. Nothing here performs I/O.

use crate::error::DomainVerifyError;
use crate::types::{DomainCategory, DomainQuery};

/// Canonicalize a user-entered domain.
///
/// Steps, in order: trim, lowercase, strip a leading `http://` or `https://`,
/// strip a leading `www.`, drop everything from the first `/`, trim again.
///
/// # Errors
///
/// Returns `InvalidDomain` when the result has no `.` separator, because no
/// suffix could be determined for it.
///
/// # Example
///
/// ```rust
/// use domain_verify_lib::normalize_domain;
///
/// let query = normalize_domain("https://WWW.Example.CO.KE/path").unwrap();
/// assert_eq!(query.as_str(), "example.co.ke");
/// assert!(normalize_domain("noSuffixHere").is_err());
/// ```
pub fn normalize_domain(raw: &str) -> Result<DomainQuery, DomainVerifyError> {
    let lowered = raw.trim().to_lowercase();

    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);

    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);

    let host = match without_www.find('/') {
        Some(idx) => &without_www[..idx],
        None => without_www,
    };

    let host = host.trim();

    if host.is_empty() {
        return Err(DomainVerifyError::invalid_domain(
            raw,
            "Domain name cannot be empty",
        ));
    }

    if !host.contains('.') {
        return Err(DomainVerifyError::invalid_domain(
            raw,
            "Please enter a valid domain, e.g. example.co.ke",
        ));
    }

    Ok(DomainQuery::new_unchecked(host.to_string()))
}

/// Build `<name><extension>` for a category search.
///
/// The name is normalized the same way as a full domain, minus the suffix
/// requirement, and must be a valid base label.
pub fn expand_category_domain(
    name: &str,
    category: DomainCategory,
) -> Result<DomainQuery, DomainVerifyError> {
    let base = name.trim().to_lowercase();

    if !is_valid_base_name(&base) {
        return Err(DomainVerifyError::invalid_domain(
            name,
            "Name must be at least 2 characters of letters, digits or inner hyphens",
        ));
    }

    normalize_domain(&format!("{}{}", base, category.extension()))
}

/// Validate that a base domain name (without suffix) is acceptable.
pub(crate) fn is_valid_base_name(domain: &str) -> bool {
    if domain.len() < 2 || domain.len() > 63 {
        return false;
    }

    // Cannot start or end with hyphen
    if domain.starts_with('-') || domain.ends_with('-') {
        return false;
    }

    domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_scheme_www_and_path() {
        let query = normalize_domain("https://WWW.Example.CO.KE/path").unwrap();
        assert_eq!(query.as_str(), "example.co.ke");

        let query = normalize_domain("http://site.ke/a/b?c=d#e").unwrap();
        assert_eq!(query.as_str(), "site.ke");

        let query = normalize_domain("www.testsite.or.ke/about").unwrap();
        assert_eq!(query.as_str(), "testsite.or.ke");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        let query = normalize_domain("   Example.ke  ").unwrap();
        assert_eq!(query.as_str(), "example.ke");

        let query = normalize_domain("  https://example.ke/ ").unwrap();
        assert_eq!(query.as_str(), "example.ke");
    }

    #[test]
    fn test_normalize_only_strips_leading_www() {
        let query = normalize_domain("mail.www.example.ke").unwrap();
        assert_eq!(query.as_str(), "mail.www.example.ke");
    }

    #[test]
    fn test_normalize_rejects_missing_suffix() {
        let err = normalize_domain("noSuffixHere").unwrap_err();
        assert!(err.is_validation());

        assert!(normalize_domain("").is_err());
        assert!(normalize_domain("https://").is_err());
        assert!(normalize_domain("https://localhost/x.y").is_err());
    }

    #[test]
    fn test_parse_via_from_str() {
        let query: DomainQuery = "HTTPS://www.KeNIC.or.ke".parse().unwrap();
        assert_eq!(query.to_string(), "kenic.or.ke");
        assert_eq!(query.first_dot_suffix(), ".or.ke");
    }

    #[test]
    fn test_expand_category_domain() {
        let query = expand_category_domain("Acme", DomainCategory::Company).unwrap();
        assert_eq!(query.as_str(), "acme.co.ke");

        let query = expand_category_domain("kenic", DomainCategory::General).unwrap();
        assert_eq!(query.as_str(), "kenic.ke");

        assert!(expand_category_domain("a", DomainCategory::Company).is_err());
        assert!(expand_category_domain("-acme", DomainCategory::Company).is_err());
        assert!(expand_category_domain("acme.co", DomainCategory::Company).is_err());
    }

    #[test]
    fn test_is_valid_base_name() {
        assert!(is_valid_base_name("example"));
        assert!(is_valid_base_name("test-domain"));
        assert!(is_valid_base_name("abc123"));

        assert!(!is_valid_base_name(""));
        assert!(!is_valid_base_name("a"));
        assert!(!is_valid_base_name("-example"));
        assert!(!is_valid_base_name("example-"));
        assert!(!is_valid_base_name("test.com"));
    }
}
