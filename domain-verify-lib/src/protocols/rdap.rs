//! RDAP (Registration Data Access Protocol) lookups.
//!
//! Queries go through a public aggregator that redirects to the authoritative
//! registry server, so no per-TLD endpoint table is needed here.

use crate::concurrent::with_deadline;
use crate::error::DomainVerifyError;
use crate::protocols::{build_http_client, string_or_list};
use crate::types::{DomainQuery, RdapRecord, SourceResult, VerifyConfig, DEFAULT_RDAP_URL};
use reqwest::StatusCode;
use std::time::Duration;

/// RDAP client for status and nameserver data.
#[derive(Clone)]
pub struct RdapClient {
    http_client: reqwest::Client,
    /// Bound on a single lookup
    timeout: Duration,
    /// Aggregator root; `/domain/<name>` is appended
    base_url: String,
}

impl RdapClient {
    /// Create a new RDAP client against the default aggregator.
    pub fn new() -> Result<Self, DomainVerifyError> {
        let timeout = Duration::from_secs(10);
        Ok(Self {
            http_client: build_http_client(timeout, "RDAP")?,
            timeout,
            base_url: DEFAULT_RDAP_URL.to_string(),
        })
    }

    /// Create a client from a verifier configuration.
    pub fn with_config(config: &VerifyConfig) -> Result<Self, DomainVerifyError> {
        Ok(Self {
            http_client: build_http_client(config.rdap_timeout, "RDAP")?,
            timeout: config.rdap_timeout,
            base_url: config.rdap_url.clone(),
        })
    }

    /// The URL queried for `domain`.
    pub fn domain_url(&self, domain: &DomainQuery) -> String {
        format!("{}/domain/{}", self.base_url.trim_end_matches('/'), domain)
    }

    /// Fetch the RDAP domain object.
    ///
    /// A 404 is a successful answer (`found = false`); any other non-200
    /// status, a transport error or the bound expiring is `Failed`.
    pub async fn fetch(&self, domain: &DomainQuery) -> SourceResult<RdapRecord> {
        with_deadline("RDAP lookup", self.timeout, self.lookup(domain)).await
    }

    async fn lookup(&self, domain: &DomainQuery) -> Result<RdapRecord, DomainVerifyError> {
        let rdap_url = self.domain_url(domain);
        tracing::debug!(url = %rdap_url, "RDAP request");

        let response = self.http_client.get(&rdap_url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let json = response.json::<serde_json::Value>().await.map_err(|e| {
                    DomainVerifyError::parse(format!("Failed to parse RDAP JSON: {}", e))
                })?;
                Ok(extract_rdap_record(&json))
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(domain = %domain, "RDAP has no object for domain");
                Ok(RdapRecord::default())
            }
            code => Err(DomainVerifyError::rdap_with_status(
                domain.as_str(),
                format!("RDAP server returned error: {}", code),
                code.as_u16(),
            )),
        }
    }
}

/// Extract status, nameservers, registrar and key dates from an RDAP object.
pub fn extract_rdap_record(json: &serde_json::Value) -> RdapRecord {
    let mut record = RdapRecord {
        found: true,
        statuses: string_or_list(json.get("status")).unwrap_or_default(),
        ..Default::default()
    };

    if let Some(nameservers) = json.get("nameservers").and_then(|ns| ns.as_array()) {
        record.nameservers = nameservers
            .iter()
            .filter_map(|ns| ns.get("ldhName").and_then(|name| name.as_str()))
            .map(|name| name.to_lowercase())
            .collect();
    }

    if let Some(entities) = json.get("entities").and_then(|e| e.as_array()) {
        record.registrar = entities
            .iter()
            .filter(|entity| has_role(entity, "registrar"))
            .find_map(|entity| extract_vcard_name(entity).or_else(|| extract_entity_identifier(entity)));
    }

    if let Some(events) = json.get("events").and_then(|e| e.as_array()) {
        for event in events {
            if let (Some(action), Some(date)) = (
                event.get("eventAction").and_then(|a| a.as_str()),
                event.get("eventDate").and_then(|d| d.as_str()),
            ) {
                match action {
                    "registration" => record.created_date = Some(date.to_string()),
                    "expiration" => record.expires_date = Some(date.to_string()),
                    "last changed" => record.updated_date = Some(date.to_string()),
                    _ => {}
                }
            }
        }
    }

    record
}

fn has_role(entity: &serde_json::Value, wanted: &str) -> bool {
    entity
        .get("roles")
        .and_then(|r| r.as_array())
        .map(|roles| roles.iter().any(|role| role.as_str() == Some(wanted)))
        .unwrap_or(false)
}

/// Organization name from the `fn` property of an entity's vCard.
fn extract_vcard_name(entity: &serde_json::Value) -> Option<String> {
    entity
        .get("vcardArray")?
        .as_array()?
        .get(1)?
        .as_array()?
        .iter()
        .filter_map(|item| item.as_array())
        .find(|item| item.len() >= 4 && item[0].as_str() == Some("fn"))
        .and_then(|item| item[3].as_str())
        .filter(|name| !name.trim().is_empty())
        .map(String::from)
}

/// Fallback identifier: first publicId, then handle, then name.
fn extract_entity_identifier(entity: &serde_json::Value) -> Option<String> {
    entity
        .get("publicIds")
        .and_then(|p| p.as_array())
        .and_then(|ids| ids.first())
        .and_then(|id| id.get("identifier"))
        .and_then(|i| i.as_str())
        .or_else(|| entity.get("handle").and_then(|h| h.as_str()))
        .or_else(|| entity.get("name").and_then(|n| n.as_str()))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_status_and_nameservers() {
        let json = json!({
            "objectClassName": "domain",
            "ldhName": "kenic.or.ke",
            "status": ["active", "client transfer prohibited"],
            "nameservers": [
                { "objectClassName": "nameserver", "ldhName": "NS1.KENIC.OR.KE" },
                { "objectClassName": "nameserver", "ldhName": "ns2.kenic.or.ke" },
                { "objectClassName": "nameserver" }
            ]
        });

        let record = extract_rdap_record(&json);
        assert!(record.found);
        assert_eq!(record.statuses.len(), 2);
        assert_eq!(
            record.nameservers,
            vec!["ns1.kenic.or.ke".to_string(), "ns2.kenic.or.ke".to_string()]
        );
    }

    #[test]
    fn test_single_string_status() {
        let record = extract_rdap_record(&json!({ "status": "active" }));
        assert_eq!(record.statuses, vec!["active".to_string()]);
        assert!(record.nameservers.is_empty());
    }

    #[test]
    fn test_extract_registrar_and_events() {
        let json = json!({
            "entities": [
                { "roles": ["registrant"], "handle": "REG-1" },
                {
                    "roles": ["registrar"],
                    "vcardArray": ["vcard", [["version", {}, "text", "4.0"], ["fn", {}, "text", "Truehost Cloud"]]]
                }
            ],
            "events": [
                { "eventAction": "registration", "eventDate": "2015-06-01T00:00:00Z" },
                { "eventAction": "expiration", "eventDate": "2026-06-01T00:00:00Z" },
                { "eventAction": "last changed", "eventDate": "2025-05-20T00:00:00Z" }
            ]
        });

        let record = extract_rdap_record(&json);
        assert_eq!(record.registrar.as_deref(), Some("Truehost Cloud"));
        assert_eq!(record.created_date.as_deref(), Some("2015-06-01T00:00:00Z"));
        assert_eq!(record.expires_date.as_deref(), Some("2026-06-01T00:00:00Z"));
        assert_eq!(record.updated_date.as_deref(), Some("2025-05-20T00:00:00Z"));
    }

    #[test]
    fn test_entity_identifier_fallback() {
        let entity = json!({ "roles": ["registrar"], "publicIds": [{ "identifier": "1234" }] });
        assert_eq!(extract_entity_identifier(&entity), Some("1234".to_string()));

        let entity = json!({ "roles": ["registrar"], "handle": "HANDLE-9" });
        assert_eq!(extract_entity_identifier(&entity), Some("HANDLE-9".to_string()));
    }

    #[test]
    fn test_domain_url() {
        let client = RdapClient::new().unwrap();
        let domain = crate::normalize_domain("example.co.ke").unwrap();
        assert_eq!(client.domain_url(&domain), "https://rdap.org/domain/example.co.ke");
    }
}
