//! WHOIS lookups through a JSON registration-data service.
//!
//! The service wraps raw WHOIS output in a `WhoisRecord` object. Registries
//! disagree on where they put things, so most fields are read from the
//! record first and from its `registryData` mirror second.
//!
//! The same provider exposes a domain-availability endpoint, used by
//! category search and the suggestion generator.

use crate::concurrent::with_deadline;
use crate::error::DomainVerifyError;
use crate::protocols::{build_http_client, string_or_list};
use crate::types::{
    AvailabilityResult, AvailabilityStatus, DomainQuery, SourceResult, VerifyConfig, WhoisRecord,
    DEFAULT_AVAILABILITY_URL, DEFAULT_WHOIS_URL,
};
use serde_json::Value;
use std::time::Duration;

/// Client for the WHOIS and availability endpoints.
#[derive(Clone)]
pub struct WhoisClient {
    http_client: reqwest::Client,
    /// Bound on a single lookup
    timeout: Duration,
    api_key: Option<String>,
    whois_url: String,
    availability_url: String,
}

impl WhoisClient {
    /// Create a client against the default provider with a 10 second bound.
    pub fn new(api_key: Option<String>) -> Result<Self, DomainVerifyError> {
        let timeout = Duration::from_secs(10);
        Ok(Self {
            http_client: build_http_client(timeout, "WHOIS")?,
            timeout,
            api_key,
            whois_url: DEFAULT_WHOIS_URL.to_string(),
            availability_url: DEFAULT_AVAILABILITY_URL.to_string(),
        })
    }

    /// Create a client from a verifier configuration.
    pub fn with_config(config: &VerifyConfig) -> Result<Self, DomainVerifyError> {
        Ok(Self {
            http_client: build_http_client(config.whois_timeout, "WHOIS")?,
            timeout: config.whois_timeout,
            api_key: config.whois_api_key.clone(),
            whois_url: config.whois_url.clone(),
            availability_url: config.availability_url.clone(),
        })
    }

    /// Look up the WHOIS record for a domain.
    ///
    /// Never fails: a missing API key, transport error, bad JSON, a response
    /// without a record, or the bound expiring all come back as `Failed`.
    pub async fn fetch(&self, domain: &DomainQuery) -> SourceResult<WhoisRecord> {
        with_deadline("WHOIS lookup", self.timeout, self.lookup(domain)).await
    }

    async fn lookup(&self, domain: &DomainQuery) -> Result<WhoisRecord, DomainVerifyError> {
        let json = self.get_json(&self.whois_url, domain).await?;

        extract_whois_record(&json)
            .ok_or_else(|| DomainVerifyError::parse("WHOIS response did not contain a WhoisRecord"))
    }

    /// Ask the provider whether a domain can be registered.
    ///
    /// Anything other than an explicit answer maps to `Unknown` with the
    /// reason in `error_message`.
    pub async fn check_availability(&self, domain: &DomainQuery) -> AvailabilityResult {
        let outcome = with_deadline("Availability check", self.timeout, async {
            let json = self.get_json(&self.availability_url, domain).await?;
            parse_availability(&json).ok_or_else(|| {
                DomainVerifyError::parse("Response did not contain DomainInfo.domainAvailability")
            })
        })
        .await;

        match outcome {
            SourceResult::Success(status) => AvailabilityResult {
                domain: domain.to_string(),
                status,
                error_message: None,
            },
            SourceResult::Failed(failure) => AvailabilityResult {
                domain: domain.to_string(),
                status: AvailabilityStatus::Unknown,
                error_message: Some(failure.message),
            },
        }
    }

    async fn get_json(&self, url: &str, domain: &DomainQuery) -> Result<Value, DomainVerifyError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DomainVerifyError::config("No WHOIS API key configured (set DV_WHOIS_API_KEY)")
        })?;

        tracing::debug!(url, domain = %domain, "WHOIS provider request");

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("apiKey", api_key),
                ("domainName", domain.as_str()),
                ("outputFormat", "JSON"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainVerifyError::whois(
                domain.as_str(),
                format!("Provider returned HTTP {}", status.as_u16()),
            ));
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Extract a [`WhoisRecord`] from a provider response.
///
/// Returns `None` when the response has no `WhoisRecord` object at all.
pub fn extract_whois_record(json: &Value) -> Option<WhoisRecord> {
    let record = json.get("WhoisRecord").filter(|r| r.is_object())?;
    let registry = record.get("registryData").filter(|r| r.is_object());

    let text = |name: &str| -> Option<String> {
        non_empty_str(record.get(name))
            .or_else(|| registry.and_then(|r| non_empty_str(r.get(name))))
    };

    let registrar = non_empty_str(record.get("registrarName"))
        .or_else(|| non_empty_str(record.get("registrar")))
        .or_else(|| registry.and_then(|r| non_empty_str(r.get("registrarName"))));

    let statuses = string_or_list(record.get("status"))
        .or_else(|| registry.and_then(|r| string_or_list(r.get("status"))))
        .unwrap_or_default();

    let nameservers = host_names(record)
        .filter(|hosts| !hosts.is_empty())
        .or_else(|| registry.and_then(host_names))
        .unwrap_or_default();

    Some(WhoisRecord {
        data_error: non_empty_str(record.get("dataError")),
        registrar,
        created_date: text("createdDate"),
        updated_date: text("updatedDate"),
        expires_date: text("expiresDate"),
        statuses,
        nameservers,
    })
}

/// Map an availability response to a status; `None` when the answer is missing.
pub fn parse_availability(json: &Value) -> Option<AvailabilityStatus> {
    let answer = json
        .get("DomainInfo")
        .and_then(|info| info.get("domainAvailability"))
        .and_then(Value::as_str)?;

    if answer.eq_ignore_ascii_case("AVAILABLE") {
        Some(AvailabilityStatus::Available)
    } else {
        Some(AvailabilityStatus::Taken)
    }
}

fn host_names(section: &Value) -> Option<Vec<String>> {
    let hosts = section.get("nameServers")?.get("hostNames")?.as_array()?;
    Some(
        hosts
            .iter()
            .filter_map(Value::as_str)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect(),
    )
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
