//! Core data types for domain verification.
//!
//! This module defines the normalized query, the per-source outcome types,
//! the aggregated [`VerificationReport`] and the configuration struct.

use crate::error::DomainVerifyError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Placeholder rendered for any report field no source could fill.
pub const UNKNOWN: &str = "—";

/// A normalized domain name, ready for lookup.
///
/// Always lowercase, without scheme, `www.` or path, and always containing
/// at least one `.`. Build one with [`normalize_domain`](crate::normalize_domain)
/// or `str::parse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DomainQuery(String);

impl DomainQuery {
    pub(crate) fn new_unchecked(domain: String) -> Self {
        Self(domain)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The substring starting at the first `.` (e.g. `.co.ke` for `site.co.ke`).
    pub fn first_dot_suffix(&self) -> &str {
        match self.0.find('.') {
            Some(idx) => &self.0[idx..],
            None => "",
        }
    }
}

impl fmt::Display for DomainQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainQuery {
    type Err = DomainVerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::utils::normalize_domain(s)
    }
}

impl AsRef<str> for DomainQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which data source an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Whois,
    Rdap,
    Dns(DnsRecordType),
    Liveness,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Whois => write!(f, "WHOIS"),
            SourceKind::Rdap => write!(f, "RDAP"),
            SourceKind::Dns(record_type) => write!(f, "DNS {}", record_type),
            SourceKind::Liveness => write!(f, "Live probe"),
        }
    }
}

/// Coarse category of a source failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Timeout,
    Unreachable,
    Http,
    Parse,
    Config,
}

/// Why a source produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SourceFailure {
    pub fn new<M: Into<String>>(kind: FailureKind, message: M) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<DomainVerifyError> for SourceFailure {
    fn from(err: DomainVerifyError) -> Self {
        let kind = match &err {
            DomainVerifyError::Timeout { .. } => FailureKind::Timeout,
            DomainVerifyError::NetworkError { .. } => FailureKind::Unreachable,
            DomainVerifyError::RdapError {
                status_code: Some(_),
                ..
            }
            | DomainVerifyError::WhoisError { .. }
            | DomainVerifyError::DnsError { .. } => FailureKind::Http,
            DomainVerifyError::ParseError { .. } => FailureKind::Parse,
            DomainVerifyError::ConfigError { .. } | DomainVerifyError::InvalidDomain { .. } => {
                FailureKind::Config
            }
            _ => FailureKind::Unreachable,
        };
        Self::new(kind, err.to_string())
    }
}

/// Outcome of a single source lookup.
///
/// Source clients never return `Err`: every transport, timeout or decoding
/// problem ends up as `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "lowercase")]
pub enum SourceResult<T> {
    Success(T),
    Failed(SourceFailure),
}

impl<T> SourceResult<T> {
    pub fn failed<E: Into<SourceFailure>>(err: E) -> Self {
        SourceResult::Failed(err.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SourceResult::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            SourceResult::Success(value) => Some(value),
            SourceResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SourceFailure> {
        match self {
            SourceResult::Success(_) => None,
            SourceResult::Failed(failure) => Some(failure),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SourceResult<U> {
        match self {
            SourceResult::Success(value) => SourceResult::Success(f(value)),
            SourceResult::Failed(failure) => SourceResult::Failed(failure),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            SourceResult::Success(value) => Some(value),
            SourceResult::Failed(_) => None,
        }
    }
}

impl<T> From<Result<T, DomainVerifyError>> for SourceResult<T> {
    fn from(result: Result<T, DomainVerifyError>) -> Self {
        match result {
            Ok(value) => SourceResult::Success(value),
            Err(err) => SourceResult::failed(err),
        }
    }
}

/// Fields extracted from a WHOIS provider record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhoisRecord {
    /// Provider-side error marker, e.g. "MISSING_WHOIS_DATA"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_date: Option<String>,

    pub statuses: Vec<String>,

    pub nameservers: Vec<String>,
}

impl WhoisRecord {
    /// Whether the record describes a registered domain.
    ///
    /// Only an explicit "no data found" marker means unregistered; any other
    /// record, even one carrying a different `dataError`, counts as registered.
    pub fn registered(&self) -> bool {
        match &self.data_error {
            Some(marker) => !is_no_data_marker(marker),
            None => true,
        }
    }
}

fn is_no_data_marker(marker: &str) -> bool {
    let marker = marker.trim().to_lowercase();
    marker == "no whois data found" || marker == "missing_whois_data"
}

/// Fields extracted from an RDAP domain object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RdapRecord {
    /// `false` when the aggregator answered 404
    pub found: bool,

    pub statuses: Vec<String>,

    pub nameservers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_date: Option<String>,
}

/// DNS record types queried during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum DnsRecordType {
    A,
    AAAA,
    MX,
    NS,
}

impl DnsRecordType {
    pub const ALL: [DnsRecordType; 4] = [
        DnsRecordType::A,
        DnsRecordType::AAAA,
        DnsRecordType::MX,
        DnsRecordType::NS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DnsRecordType::A => "A",
            DnsRecordType::AAAA => "AAAA",
            DnsRecordType::MX => "MX",
            DnsRecordType::NS => "NS",
        }
    }

    /// RR type code as it appears in DoH JSON answers.
    pub fn type_code(&self) -> u64 {
        match self {
            DnsRecordType::A => 1,
            DnsRecordType::NS => 2,
            DnsRecordType::MX => 15,
            DnsRecordType::AAAA => 28,
        }
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-record-type outcomes of the DNS batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsResultBundle {
    pub a: SourceResult<Vec<String>>,
    pub aaaa: SourceResult<Vec<String>>,
    pub mx: SourceResult<Vec<String>>,
    pub ns: SourceResult<Vec<String>>,
}

impl DnsResultBundle {
    pub fn get(&self, record_type: DnsRecordType) -> &SourceResult<Vec<String>> {
        match record_type {
            DnsRecordType::A => &self.a,
            DnsRecordType::AAAA => &self.aaaa,
            DnsRecordType::MX => &self.mx,
            DnsRecordType::NS => &self.ns,
        }
    }

    /// Answers for one type; empty when that query failed.
    pub fn records(&self, record_type: DnsRecordType) -> &[String] {
        self.get(record_type)
            .success()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_failed(&self) -> bool {
        DnsRecordType::ALL
            .iter()
            .all(|t| !self.get(*t).is_success())
    }

    pub fn to_records(&self) -> DnsRecords {
        DnsRecords {
            a: self.records(DnsRecordType::A).to_vec(),
            aaaa: self.records(DnsRecordType::AAAA).to_vec(),
            mx: self.records(DnsRecordType::MX).to_vec(),
            ns: self.records(DnsRecordType::NS).to_vec(),
        }
    }
}

/// Flattened DNS answers carried by the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecords {
    pub a: Vec<String>,
    pub aaaa: Vec<String>,
    pub mx: Vec<String>,
    pub ns: Vec<String>,
}

/// Protocol that answered the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Https,
    Http,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Https => write!(f, "HTTPS"),
            Protocol::Http => write!(f, "HTTP"),
        }
    }
}

/// Result of probing the bare domain over HTTPS, then HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessResult {
    pub reachable: bool,
    pub protocol: Option<Protocol>,
    pub status_code: Option<u16>,
}

impl LivenessResult {
    pub fn reachable(protocol: Protocol, status_code: u16) -> Self {
        Self {
            reachable: true,
            protocol: Some(protocol),
            status_code: Some(status_code),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            protocol: None,
            status_code: None,
        }
    }
}

/// Heuristic usage classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Active,
    Passive,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::Active => write!(f, "Active"),
            Activity::Passive => write!(f, "Passive"),
        }
    }
}

/// Retail price for a suffix. `None` prices mean "not known", not zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub tld: String,
    pub register_usd: Option<u32>,
    pub renew_usd: Option<u32>,
}

/// One failed source, kept on the report so callers can explain gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFailureEntry {
    pub source: SourceKind,
    pub failure: SourceFailure,
}

/// Aggregated verification outcome for one domain.
///
/// Built fresh for every request and never mutated afterwards. Fields that
/// no source could fill stay `None` or empty and render as [`UNKNOWN`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub domain: String,

    /// `Some(true)` registered, `Some(false)` explicit no-data marker, `None` unknown
    pub registered: Option<bool>,

    pub registrar: Option<String>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    pub expires_date: Option<String>,

    pub whois_statuses: Vec<String>,
    pub rdap_statuses: Vec<String>,

    /// WHOIS nameservers, or RDAP's when WHOIS had none
    pub nameservers: Vec<String>,

    pub dns: DnsRecords,
    pub liveness: LivenessResult,
    pub activity: Activity,
    pub pricing: PricingEntry,

    pub source_failures: Vec<SourceFailureEntry>,

    /// Non-fatal hint shown when no source answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,
}

impl VerificationReport {
    pub fn display_registered(&self) -> &'static str {
        match self.registered {
            Some(true) => "Yes",
            Some(false) => "No",
            None => UNKNOWN,
        }
    }

    pub fn display_reachable(&self) -> String {
        match (self.liveness.reachable, self.liveness.protocol) {
            (true, Some(protocol)) => format!("Yes ({})", protocol),
            (true, None) => "Yes".to_string(),
            (false, _) => "No".to_string(),
        }
    }

    pub fn display_status_code(&self) -> String {
        self.liveness
            .status_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn display_register_price(&self) -> String {
        display_price(self.pricing.register_usd)
    }

    pub fn display_renew_price(&self) -> String {
        display_price(self.pricing.renew_usd)
    }

    pub fn failure_for(&self, source: SourceKind) -> Option<&SourceFailure> {
        self.source_failures
            .iter()
            .find(|entry| entry.source == source)
            .map(|entry| &entry.failure)
    }
}

/// Render an optional field, falling back to [`UNKNOWN`].
pub fn display_opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNKNOWN)
}

/// Render a list as comma-separated values, falling back to [`UNKNOWN`].
pub fn display_list(values: &[String]) -> String {
    if values.is_empty() {
        UNKNOWN.to_string()
    } else {
        values.join(", ")
    }
}

/// Render a USD price as `$N`, falling back to [`UNKNOWN`].
pub fn display_price(price: Option<u32>) -> String {
    match price {
        Some(usd) => format!("${}", usd),
        None => UNKNOWN.to_string(),
    }
}

/// Availability answer for search and suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Taken,
    Unknown,
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityStatus::Available => write!(f, "AVAILABLE"),
            AvailabilityStatus::Taken => write!(f, "TAKEN"),
            AvailabilityStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub domain: String,
    pub status: AvailabilityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Registration categories under the `.ke` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainCategory {
    Company,
    Government,
    Organization,
    Network,
    Personal,
    Mobile,
    Information,
    School,
    Academic,
    General,
}

impl DomainCategory {
    pub const ALL: [DomainCategory; 10] = [
        DomainCategory::Company,
        DomainCategory::Government,
        DomainCategory::Organization,
        DomainCategory::Network,
        DomainCategory::Personal,
        DomainCategory::Mobile,
        DomainCategory::Information,
        DomainCategory::School,
        DomainCategory::Academic,
        DomainCategory::General,
    ];

    /// The suffix registered under this category.
    pub fn extension(&self) -> &'static str {
        match self {
            DomainCategory::Company => ".co.ke",
            DomainCategory::Government => ".go.ke",
            DomainCategory::Organization => ".or.ke",
            DomainCategory::Network => ".ne.ke",
            DomainCategory::Personal => ".me.ke",
            DomainCategory::Mobile => ".mobi.ke",
            DomainCategory::Information => ".info.ke",
            DomainCategory::School => ".sc.ke",
            DomainCategory::Academic => ".ac.ke",
            DomainCategory::General => ".ke",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomainCategory::Company => "Company",
            DomainCategory::Government => "Government",
            DomainCategory::Organization => "Organization",
            DomainCategory::Network => "Network",
            DomainCategory::Personal => "Personal",
            DomainCategory::Mobile => "Mobile",
            DomainCategory::Information => "Information",
            DomainCategory::School => "School",
            DomainCategory::Academic => "Academic",
            DomainCategory::General => "General",
        }
    }
}

impl fmt::Display for DomainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DomainCategory {
    type Err = DomainVerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DomainCategory::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                DomainVerifyError::config(format!(
                    "Unknown category '{}'. Expected one of: {}",
                    s,
                    DomainCategory::ALL
                        .iter()
                        .map(|c| c.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Configuration for a [`DomainVerifier`](crate::DomainVerifier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Maximum number of domains verified at once by batch operations
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Bound on the WHOIS lookup
    /// Default: 10 seconds
    #[serde(skip)]
    pub whois_timeout: Duration,

    /// Bound on the RDAP lookup
    /// Default: 10 seconds
    #[serde(skip)]
    pub rdap_timeout: Duration,

    /// Bound on each of the four DNS queries
    /// Default: 10 seconds
    #[serde(skip)]
    pub dns_timeout: Duration,

    /// Bound on each liveness attempt (HTTPS, then HTTP)
    /// Default: 6 seconds
    #[serde(skip)]
    pub probe_timeout: Duration,

    /// API key for the WHOIS and availability endpoints
    #[serde(skip_serializing)]
    pub whois_api_key: Option<String>,

    pub whois_url: String,
    pub availability_url: String,
    pub rdap_url: String,
    pub doh_url: String,

    /// URL templates tried in order by the liveness probe; `{domain}` is substituted
    pub probe_targets: Vec<String>,

    /// Suffix price overrides merged over the built-in table
    #[serde(skip)]
    pub pricing_overrides: HashMap<String, (Option<u32>, Option<u32>)>,
}

pub const DEFAULT_WHOIS_URL: &str = "https://www.whoisxmlapi.com/whoisserver/WhoisService";
pub const DEFAULT_AVAILABILITY_URL: &str = "https://domain-availability.whoisxmlapi.com/api/v1";
pub const DEFAULT_RDAP_URL: &str = "https://rdap.org";
pub const DEFAULT_DOH_URL: &str = "https://dns.google/resolve";

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            whois_timeout: Duration::from_secs(10),
            rdap_timeout: Duration::from_secs(10),
            dns_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(6),
            whois_api_key: None,
            whois_url: DEFAULT_WHOIS_URL.to_string(),
            availability_url: DEFAULT_AVAILABILITY_URL.to_string(),
            rdap_url: DEFAULT_RDAP_URL.to_string(),
            doh_url: DEFAULT_DOH_URL.to_string(),
            probe_targets: vec![
                "https://{domain}".to_string(),
                "http://{domain}".to_string(),
            ],
            pricing_overrides: HashMap::new(),
        }
    }
}

impl VerifyConfig {
    /// Set batch concurrency, capped to 1..=100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Apply one bound to WHOIS, RDAP and DNS.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.whois_timeout = timeout;
        self.rdap_timeout = timeout;
        self.dns_timeout = timeout;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_whois_api_key<K: Into<String>>(mut self, key: K) -> Self {
        self.whois_api_key = Some(key.into());
        self
    }

    pub fn with_whois_url<U: Into<String>>(mut self, url: U) -> Self {
        self.whois_url = url.into();
        self
    }

    pub fn with_availability_url<U: Into<String>>(mut self, url: U) -> Self {
        self.availability_url = url.into();
        self
    }

    pub fn with_rdap_url<U: Into<String>>(mut self, url: U) -> Self {
        self.rdap_url = url.into();
        self
    }

    pub fn with_doh_url<U: Into<String>>(mut self, url: U) -> Self {
        self.doh_url = url.into();
        self
    }

    pub fn with_probe_targets(mut self, targets: Vec<String>) -> Self {
        self.probe_targets = targets;
        self
    }

    pub fn with_price(mut self, suffix: &str, register_usd: Option<u32>, renew_usd: Option<u32>) -> Self {
        self.pricing_overrides
            .insert(suffix.to_string(), (register_usd, renew_usd));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whois_registered_marker() {
        let record = WhoisRecord::default();
        assert!(record.registered());

        let record = WhoisRecord {
            data_error: Some("No WHOIS data found".to_string()),
            ..Default::default()
        };
        assert!(!record.registered());

        let record = WhoisRecord {
            data_error: Some("MISSING_WHOIS_DATA".to_string()),
            ..Default::default()
        };
        assert!(!record.registered());

        let record = WhoisRecord {
            data_error: Some("INCOMPLETE_DATA".to_string()),
            ..Default::default()
        };
        assert!(record.registered());
    }

    #[test]
    fn test_dns_bundle_failed_type_is_empty() {
        let bundle = DnsResultBundle {
            a: SourceResult::Success(vec!["1.2.3.4".to_string()]),
            aaaa: SourceResult::Failed(SourceFailure::new(FailureKind::Timeout, "timeout")),
            mx: SourceResult::Success(vec![]),
            ns: SourceResult::Success(vec!["ns1.example.ke.".to_string()]),
        };
        assert_eq!(bundle.records(DnsRecordType::A), ["1.2.3.4".to_string()]);
        assert!(bundle.records(DnsRecordType::AAAA).is_empty());
        assert!(!bundle.all_failed());

        let records = bundle.to_records();
        assert_eq!(records.ns, vec!["ns1.example.ke.".to_string()]);
        assert!(records.aaaa.is_empty());
    }

    #[test]
    fn test_source_failure_from_error() {
        let failure: SourceFailure =
            DomainVerifyError::timeout("RDAP lookup", Duration::from_secs(10)).into();
        assert_eq!(failure.kind, FailureKind::Timeout);

        let failure: SourceFailure =
            DomainVerifyError::rdap_with_status("a.ke", "server error", 502).into();
        assert_eq!(failure.kind, FailureKind::Http);

        let failure: SourceFailure = DomainVerifyError::network("refused").into();
        assert_eq!(failure.kind, FailureKind::Unreachable);
    }

    #[test]
    fn test_category_parse_and_extension() {
        assert_eq!(
            "company".parse::<DomainCategory>().unwrap(),
            DomainCategory::Company
        );
        assert_eq!(
            " SCHOOL ".parse::<DomainCategory>().unwrap().extension(),
            ".sc.ke"
        );
        assert!("shipping".parse::<DomainCategory>().is_err());
    }

    #[test]
    fn test_config_builders() {
        let config = VerifyConfig::default()
            .with_concurrency(500)
            .with_timeout(Duration::from_secs(7));
        assert_eq!(config.concurrency, 100);
        assert_eq!(config.whois_timeout, Duration::from_secs(7));
        assert_eq!(config.dns_timeout, Duration::from_secs(7));
        assert_eq!(config.probe_timeout, Duration::from_secs(6));
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(display_opt(&None), UNKNOWN);
        assert_eq!(display_opt(&Some("Safaricom".to_string())), "Safaricom");
        assert_eq!(display_list(&[]), UNKNOWN);
        assert_eq!(
            display_list(&["a".to_string(), "b".to_string()]),
            "a, b"
        );
        assert_eq!(display_price(Some(0)), "$0");
        assert_eq!(display_price(None), UNKNOWN);
    }
}
