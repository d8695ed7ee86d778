//! Error handling for domain verification.
//!
//! Only input validation and configuration problems ever reach the caller as
//! `Err`. Failures inside a source client are folded into
//! [`SourceFailure`](crate::types::SourceFailure) values before they leave
//! the client.

use std::time::Duration;
use thiserror::Error;

/// Main error type for domain verification operations.
#[derive(Debug, Clone, Error)]
pub enum DomainVerifyError {
    /// The input could not be turned into a domain with a suffix.
    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// Connection-level failures (DNS resolution, refused, TLS, ...).
    #[error("Network error: {message}{}", .detail.as_ref().map(|s| format!(" (source: {})", s)).unwrap_or_default())]
    NetworkError {
        message: String,
        detail: Option<String>,
    },

    /// WHOIS provider errors.
    #[error("WHOIS error for '{domain}': {message}")]
    WhoisError { domain: String, message: String },

    /// RDAP aggregator errors, with the HTTP status when there was one.
    #[error("RDAP error for '{domain}'{}: {message}", .status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    RdapError {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    /// DNS-over-HTTPS resolver errors.
    #[error("DNS error for '{domain}' ({record_type}): {message}")]
    DnsError {
        domain: String,
        record_type: String,
        message: String,
    },

    /// Malformed JSON or a response missing the expected shape.
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Invalid settings or missing credentials.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Errors reading config files.
    #[error("File error at '{path}': {message}")]
    FileError { path: String, message: String },

    /// An operation exceeded its bound.
    #[error("Timeout after {duration:?} during: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

impl DomainVerifyError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            detail: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            detail: Some(source.into()),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::WhoisError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new RDAP error.
    pub fn rdap<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new RDAP error with HTTP status code.
    pub fn rdap_with_status<D: Into<String>, M: Into<String>>(
        domain: D,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new DNS error for one record type.
    pub fn dns<D: Into<String>, T: Into<String>, M: Into<String>>(
        domain: D,
        record_type: T,
        message: M,
    ) -> Self {
        Self::DnsError {
            domain: domain.into(),
            record_type: record_type.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether the error was caused by bad input rather than a source.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidDomain { .. })
    }
}

impl From<reqwest::Error> for DomainVerifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", Duration::from_secs(0))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else if err.is_decode() {
            Self::parse(format!("Response body could not be decoded: {}", err))
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for DomainVerifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(format!("JSON parsing failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DomainVerifyError::invalid_domain("nosuffix", "no '.' separator");
        assert_eq!(err.to_string(), "Invalid domain 'nosuffix': no '.' separator");

        let err = DomainVerifyError::rdap_with_status("example.ke", "server error", 503);
        assert_eq!(
            err.to_string(),
            "RDAP error for 'example.ke' (HTTP 503): server error"
        );

        let err = DomainVerifyError::rdap("example.ke", "bad body");
        assert_eq!(err.to_string(), "RDAP error for 'example.ke': bad body");

        let err = DomainVerifyError::network_with_source("Connection failed", "refused");
        assert_eq!(
            err.to_string(),
            "Network error: Connection failed (source: refused)"
        );
    }

    #[test]
    fn test_classification_helpers() {
        assert!(DomainVerifyError::timeout("WHOIS lookup", Duration::from_secs(10)).is_timeout());
        assert!(!DomainVerifyError::network("down").is_timeout());
        assert!(DomainVerifyError::invalid_domain("x", "y").is_validation());
        assert!(!DomainVerifyError::config("missing key").is_validation());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: DomainVerifyError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, DomainVerifyError::ParseError { .. }));
        assert!(err.to_string().starts_with("Parse error: JSON parsing failed"));
        assert!(!err.is_timeout() && !err.is_validation());
    }
}
