//! DNS lookups over a public DNS-over-HTTPS JSON resolver.
//!
//! The four record types are queried at the same time and each carries its
//! own outcome, so a failed MX query does not hide the A answers.

use crate::concurrent::with_deadline;
use crate::error::DomainVerifyError;
use crate::protocols::build_http_client;
use crate::types::{
    DnsRecordType, DnsResultBundle, DomainQuery, SourceResult, VerifyConfig, DEFAULT_DOH_URL,
};
use serde_json::Value;
use std::time::Duration;

/// DoH JSON client.
#[derive(Clone)]
pub struct DnsClient {
    http_client: reqwest::Client,
    timeout: Duration,
    doh_url: String,
}

impl DnsClient {
    pub fn new() -> Result<Self, DomainVerifyError> {
        let timeout = Duration::from_secs(10);
        Ok(Self {
            http_client: build_http_client(timeout, "DNS")?,
            timeout,
            doh_url: DEFAULT_DOH_URL.to_string(),
        })
    }

    pub fn with_config(config: &VerifyConfig) -> Result<Self, DomainVerifyError> {
        Ok(Self {
            http_client: build_http_client(config.dns_timeout, "DNS")?,
            timeout: config.dns_timeout,
            doh_url: config.doh_url.clone(),
        })
    }

    /// Query A, AAAA, MX and NS concurrently.
    pub async fn fetch(&self, domain: &DomainQuery) -> DnsResultBundle {
        let (a, aaaa, mx, ns) = tokio::join!(
            self.query(domain, DnsRecordType::A),
            self.query(domain, DnsRecordType::AAAA),
            self.query(domain, DnsRecordType::MX),
            self.query(domain, DnsRecordType::NS),
        );

        DnsResultBundle { a, aaaa, mx, ns }
    }

    /// Query a single record type. An answer section that is absent
    /// (NXDOMAIN, no data) is a successful empty list.
    pub async fn query(
        &self,
        domain: &DomainQuery,
        record_type: DnsRecordType,
    ) -> SourceResult<Vec<String>> {
        let label = format!("DNS {} query", record_type);
        with_deadline(&label, self.timeout, self.resolve(domain, record_type)).await
    }

    async fn resolve(
        &self,
        domain: &DomainQuery,
        record_type: DnsRecordType,
    ) -> Result<Vec<String>, DomainVerifyError> {
        let response = self
            .http_client
            .get(&self.doh_url)
            .query(&[("name", domain.as_str()), ("type", record_type.as_str())])
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainVerifyError::dns(
                domain.as_str(),
                record_type.as_str(),
                format!("Resolver returned HTTP {}", status.as_u16()),
            ));
        }

        let json = response.json::<Value>().await?;
        Ok(extract_answers(&json, record_type))
    }
}

/// Pull answer data for `record_type` out of a DoH JSON response.
///
/// Answers of another type (CNAME chains, for instance) are skipped. MX data
/// keeps only the exchange host, dropping the preference number.
pub fn extract_answers(json: &Value, record_type: DnsRecordType) -> Vec<String> {
    let Some(answers) = json.get("Answer").and_then(Value::as_array) else {
        return Vec::new();
    };

    answers
        .iter()
        .filter(|answer| {
            answer
                .get("type")
                .and_then(Value::as_u64)
                .map_or(true, |code| code == record_type.type_code())
        })
        .filter_map(|answer| answer.get("data").and_then(Value::as_str))
        .filter_map(|data| match record_type {
            DnsRecordType::MX => data.split_whitespace().last().map(String::from),
            _ => Some(data.trim().to_string()),
        })
        .filter(|data| !data.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_a_answers() {
        let json = json!({
            "Status": 0,
            "Answer": [
                { "name": "example.co.ke.", "type": 5, "TTL": 300, "data": "web.example.co.ke." },
                { "name": "web.example.co.ke.", "type": 1, "TTL": 300, "data": "41.90.1.2" },
                { "name": "web.example.co.ke.", "type": 1, "TTL": 300, "data": "41.90.1.3" }
            ]
        });
        assert_eq!(
            extract_answers(&json, DnsRecordType::A),
            vec!["41.90.1.2".to_string(), "41.90.1.3".to_string()]
        );
    }

    #[test]
    fn test_mx_keeps_exchange_only() {
        let json = json!({
            "Answer": [
                { "type": 15, "data": "10 mail.example.co.ke." },
                { "type": 15, "data": "20 backup.example.co.ke." }
            ]
        });
        assert_eq!(
            extract_answers(&json, DnsRecordType::MX),
            vec!["mail.example.co.ke.".to_string(), "backup.example.co.ke.".to_string()]
        );
    }

    #[test]
    fn test_missing_answer_is_empty() {
        let nxdomain = json!({ "Status": 3, "Authority": [] });
        assert!(extract_answers(&nxdomain, DnsRecordType::NS).is_empty());
    }

    #[test]
    fn test_untyped_answers_are_kept() {
        let json = json!({ "Answer": [{ "data": "ns1.kenic.or.ke." }] });
        assert_eq!(
            extract_answers(&json, DnsRecordType::NS),
            vec!["ns1.kenic.or.ke.".to_string()]
        );
    }
}
