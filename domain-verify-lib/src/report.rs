//! Assembly of the final [`VerificationReport`].
//!
//! Pure: takes whatever each source returned and merges it. WHOIS is the
//! primary source for registration data; RDAP fills the gaps it leaves.

use crate::pricing::PricingTable;
use crate::types::{
    Activity, DnsRecordType, DnsResultBundle, DomainQuery, LivenessResult, RdapRecord,
    SourceFailureEntry, SourceKind, SourceResult, VerificationReport, WhoisRecord,
};

/// Hint attached when not a single source produced data.
pub const TOTAL_FAILURE_ADVISORY: &str =
    "No data source responded. Check your network connection and try again.";

/// Merge the source outcomes for `domain` into a report.
///
/// `registered` is known only when WHOIS answered. Every failed source is
/// listed in `source_failures` in a fixed order: WHOIS, RDAP, DNS (A, AAAA,
/// MX, NS), then the liveness probe.
pub fn build_report(
    domain: &DomainQuery,
    whois: &SourceResult<WhoisRecord>,
    rdap: &SourceResult<RdapRecord>,
    dns: &DnsResultBundle,
    liveness: &SourceResult<LivenessResult>,
    activity: Activity,
    pricing: &PricingTable,
) -> VerificationReport {
    let whois_record = whois.success();
    let rdap_record = rdap.success();

    let pick = |from_whois: Option<&Option<String>>, from_rdap: Option<&Option<String>>| {
        from_whois
            .and_then(Option::clone)
            .or_else(|| from_rdap.and_then(Option::clone))
    };

    let nameservers = match (whois_record, rdap_record) {
        (Some(w), _) if !w.nameservers.is_empty() => w.nameservers.clone(),
        (_, Some(r)) => r.nameservers.clone(),
        _ => Vec::new(),
    };

    let source_failures = collect_failures(whois, rdap, dns, liveness);

    let total_failure = !whois.is_success()
        && !rdap.is_success()
        && dns.all_failed()
        && !liveness.is_success();

    VerificationReport {
        domain: domain.to_string(),
        registered: whois_record.map(WhoisRecord::registered),
        registrar: pick(
            whois_record.map(|w| &w.registrar),
            rdap_record.map(|r| &r.registrar),
        ),
        created_date: pick(
            whois_record.map(|w| &w.created_date),
            rdap_record.map(|r| &r.created_date),
        ),
        updated_date: pick(
            whois_record.map(|w| &w.updated_date),
            rdap_record.map(|r| &r.updated_date),
        ),
        expires_date: pick(
            whois_record.map(|w| &w.expires_date),
            rdap_record.map(|r| &r.expires_date),
        ),
        whois_statuses: whois_record.map(|w| w.statuses.clone()).unwrap_or_default(),
        rdap_statuses: rdap_record.map(|r| r.statuses.clone()).unwrap_or_default(),
        nameservers,
        dns: dns.to_records(),
        liveness: liveness
            .success()
            .copied()
            .unwrap_or_else(LivenessResult::unreachable),
        activity,
        pricing: pricing.price_for(domain),
        source_failures,
        advisory: total_failure.then(|| TOTAL_FAILURE_ADVISORY.to_string()),
        check_duration: None,
    }
}

fn collect_failures(
    whois: &SourceResult<WhoisRecord>,
    rdap: &SourceResult<RdapRecord>,
    dns: &DnsResultBundle,
    liveness: &SourceResult<LivenessResult>,
) -> Vec<SourceFailureEntry> {
    let dns_failures = DnsRecordType::ALL
        .iter()
        .map(|t| (SourceKind::Dns(*t), dns.get(*t).failure()));

    [
        (SourceKind::Whois, whois.failure()),
        (SourceKind::Rdap, rdap.failure()),
    ]
    .into_iter()
    .chain(dns_failures)
    .chain(std::iter::once((SourceKind::Liveness, liveness.failure())))
    .filter_map(|(source, failure)| {
        failure.map(|f| SourceFailureEntry {
            source,
            failure: f.clone(),
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FailureKind, Protocol, SourceFailure};

    fn failed<T>(kind: FailureKind) -> SourceResult<T> {
        SourceResult::Failed(SourceFailure::new(kind, "test failure"))
    }

    fn dns_ok(a: &[&str], mx: &[&str]) -> DnsResultBundle {
        let list = |v: &[&str]| SourceResult::Success(v.iter().map(|s| s.to_string()).collect());
        DnsResultBundle {
            a: list(a),
            aaaa: list(&[]),
            mx: list(mx),
            ns: list(&["ns1.host.ke."]),
        }
    }

    fn dns_failed() -> DnsResultBundle {
        DnsResultBundle {
            a: failed(FailureKind::Timeout),
            aaaa: failed(FailureKind::Timeout),
            mx: failed(FailureKind::Timeout),
            ns: failed(FailureKind::Timeout),
        }
    }

    fn domain(raw: &str) -> DomainQuery {
        crate::normalize_domain(raw).unwrap()
    }

    #[test]
    fn test_whois_failure_keeps_other_sources() {
        let rdap = SourceResult::Success(RdapRecord {
            found: true,
            statuses: vec!["active".to_string()],
            nameservers: vec!["ns1.rdap.ke".to_string()],
            registrar: Some("RDAP Registrar".to_string()),
            ..Default::default()
        });
        let liveness = SourceResult::Success(LivenessResult::reachable(Protocol::Https, 200));

        let report = build_report(
            &domain("example.co.ke"),
            &failed(FailureKind::Timeout),
            &rdap,
            &dns_ok(&["41.1.1.1"], &[]),
            &liveness,
            Activity::Active,
            PricingTable::global(),
        );

        assert_eq!(report.registered, None);
        assert_eq!(report.display_registered(), "—");
        assert_eq!(report.rdap_statuses, vec!["active".to_string()]);
        assert_eq!(report.registrar.as_deref(), Some("RDAP Registrar"));
        assert_eq!(report.nameservers, vec!["ns1.rdap.ke".to_string()]);
        assert_eq!(report.dns.a, vec!["41.1.1.1".to_string()]);
        assert!(report.liveness.reachable);
        assert_eq!(report.pricing.register_usd, Some(15));
        assert_eq!(report.source_failures.len(), 1);
        assert_eq!(report.source_failures[0].source, SourceKind::Whois);
        assert!(report.advisory.is_none());
    }

    #[test]
    fn test_whois_values_win_over_rdap() {
        let whois = SourceResult::Success(WhoisRecord {
            registrar: Some("WHOIS Registrar".to_string()),
            created_date: Some("2010-01-01".to_string()),
            nameservers: vec!["ns1.whois.ke".to_string()],
            statuses: vec!["ok".to_string()],
            ..Default::default()
        });
        let rdap = SourceResult::Success(RdapRecord {
            found: true,
            registrar: Some("RDAP Registrar".to_string()),
            expires_date: Some("2030-01-01".to_string()),
            nameservers: vec!["ns1.rdap.ke".to_string()],
            ..Default::default()
        });

        let report = build_report(
            &domain("example.ke"),
            &whois,
            &rdap,
            &dns_ok(&[], &["mail.example.ke."]),
            &failed(FailureKind::Unreachable),
            Activity::Active,
            PricingTable::global(),
        );

        assert_eq!(report.registered, Some(true));
        assert_eq!(report.registrar.as_deref(), Some("WHOIS Registrar"));
        assert_eq!(report.created_date.as_deref(), Some("2010-01-01"));
        assert_eq!(report.expires_date.as_deref(), Some("2030-01-01"));
        assert_eq!(report.nameservers, vec!["ns1.whois.ke".to_string()]);
        assert_eq!(report.whois_statuses, vec!["ok".to_string()]);
        assert_eq!(report.liveness, LivenessResult::unreachable());
        assert!(report.failure_for(SourceKind::Liveness).is_some());
    }

    #[test]
    fn test_total_failure_sets_advisory() {
        let report = build_report(
            &domain("example.go.ke"),
            &failed(FailureKind::Config),
            &failed(FailureKind::Http),
            &dns_failed(),
            &failed(FailureKind::Unreachable),
            Activity::Passive,
            PricingTable::global(),
        );

        assert_eq!(report.advisory.as_deref(), Some(TOTAL_FAILURE_ADVISORY));
        assert_eq!(report.source_failures.len(), 7);
        assert_eq!(
            report.source_failures[2].source,
            SourceKind::Dns(DnsRecordType::A)
        );
        assert_eq!(report.source_failures[6].source, SourceKind::Liveness);
        assert_eq!(report.pricing.register_usd, Some(0));
        assert_eq!(report.registrar, None);
    }

    #[test]
    fn test_partial_dns_failure_is_not_total() {
        let mut dns = dns_failed();
        dns.ns = SourceResult::Success(Vec::new());

        let report = build_report(
            &domain("example.ke"),
            &failed(FailureKind::Timeout),
            &failed(FailureKind::Timeout),
            &dns,
            &failed(FailureKind::Timeout),
            Activity::Passive,
            PricingTable::global(),
        );

        assert!(report.advisory.is_none());
        assert_eq!(report.source_failures.len(), 6);
    }
}
