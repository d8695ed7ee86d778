//! Source clients used during verification.
//!
//! Each client wraps one external data source and converts every failure
//! into a [`SourceResult::Failed`](crate::types::SourceResult) value.

/// WHOIS lookups and availability checks against a registration-data provider
pub mod whois;

/// RDAP lookups through a public aggregator
pub mod rdap;

/// DNS-over-HTTPS record queries
pub mod dns;

/// HTTPS/HTTP liveness probe
pub mod probe;

pub use dns::{extract_answers, DnsClient};
pub use probe::LivenessProbe;
pub use rdap::{extract_rdap_record, RdapClient};
pub use whois::{extract_whois_record, parse_availability, WhoisClient};

use crate::error::DomainVerifyError;
use std::time::Duration;

const USER_AGENT: &str = concat!("domain-verify/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client whose own timeout sits just past the source bound,
/// so the deadline wrapper is always the one that fires first.
pub(crate) fn build_http_client(
    timeout: Duration,
    purpose: &str,
) -> Result<reqwest::Client, DomainVerifyError> {
    reqwest::Client::builder()
        .timeout(timeout + Duration::from_secs(2))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| {
            DomainVerifyError::network_with_source(
                format!("Failed to create {} HTTP client", purpose),
                e.to_string(),
            )
        })
}

/// Read a field that providers send either as a string or a list of strings.
pub(crate) fn string_or_list(value: Option<&serde_json::Value>) -> Option<Vec<String>> {
    match value? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(vec![s.clone()]),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
        ),
        _ => None,
    }
}
