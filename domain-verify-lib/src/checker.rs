//! Main domain verifier implementation.
//!
//! This module provides the `DomainVerifier` struct that fans a verification
//! out to WHOIS, RDAP, DNS and the liveness probe, then merges the outcomes
//! into a single report.

use crate::activity::classify;
use crate::error::DomainVerifyError;
use crate::pricing::PricingTable;
use crate::protocols::{DnsClient, LivenessProbe, RdapClient, WhoisClient};
use crate::report::build_report;
#[cfg(feature = "suggest")]
use crate::suggest::{generate_suggestions, SuggestionInput};
use crate::types::{
    AvailabilityResult, DnsRecordType, DnsResultBundle, DomainCategory, DomainQuery,
    LivenessResult, SourceKind, SourceResult, VerificationReport, VerifyConfig,
};
use crate::utils::{expand_category_domain, normalize_domain};
use futures::stream::{Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Emitted once per source as soon as it settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceEvent {
    pub kind: SourceKind,
    pub success: bool,
    pub elapsed: Duration,
}

/// Coordinates verification, availability and suggestion operations.
///
/// One verification runs every source concurrently on the calling task, so
/// the total time is roughly that of the slowest source. A failing source
/// never prevents the others from reporting.
///
/// # Example
///
/// ```rust,no_run
/// use domain_verify_lib::DomainVerifier;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let verifier = DomainVerifier::new()?;
///     let report = verifier.verify("https://www.kenic.or.ke/about").await?;
///     println!("{} registered: {}", report.domain, report.display_registered());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DomainVerifier {
    /// Configuration settings for this verifier instance
    config: VerifyConfig,
    whois_client: WhoisClient,
    rdap_client: RdapClient,
    dns_client: DnsClient,
    probe: LivenessProbe,
    /// Immutable, shared between clones
    pricing: Arc<PricingTable>,
}

impl DomainVerifier {
    /// Create a verifier with default configuration.
    ///
    /// Without an API key the WHOIS source reports a configuration failure on
    /// every lookup; the other sources still work.
    pub fn new() -> Result<Self, DomainVerifyError> {
        Self::with_config(VerifyConfig::default())
    }

    /// Create a verifier with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use domain_verify_lib::{DomainVerifier, VerifyConfig};
    /// use std::time::Duration;
    ///
    /// let config = VerifyConfig::default()
    ///     .with_concurrency(20)
    ///     .with_timeout(Duration::from_secs(8))
    ///     .with_price(".co.ke", Some(14), Some(14));
    ///
    /// let verifier = DomainVerifier::with_config(config).unwrap();
    /// assert_eq!(verifier.config().concurrency, 20);
    /// ```
    pub fn with_config(config: VerifyConfig) -> Result<Self, DomainVerifyError> {
        let pricing = if config.pricing_overrides.is_empty() {
            PricingTable::global().clone()
        } else {
            PricingTable::with_overrides(&config.pricing_overrides)
        };

        Ok(Self {
            whois_client: WhoisClient::with_config(&config)?,
            rdap_client: RdapClient::with_config(&config)?,
            dns_client: DnsClient::with_config(&config)?,
            probe: LivenessProbe::with_config(&config)?,
            pricing: Arc::new(pricing),
            config,
        })
    }

    /// Normalize `raw` and verify it.
    ///
    /// # Errors
    ///
    /// Only input validation fails, and it fails before any network call.
    /// Source failures are recorded inside the report instead.
    pub async fn verify(&self, raw: &str) -> Result<VerificationReport, DomainVerifyError> {
        let domain = normalize_domain(raw)?;
        Ok(self.verify_query(&domain).await)
    }

    /// Verify an already normalized domain.
    pub async fn verify_query(&self, domain: &DomainQuery) -> VerificationReport {
        self.verify_with_progress(domain, &|_| {}).await
    }

    /// Verify a domain, calling `on_event` as each source settles.
    pub async fn verify_with_progress(
        &self,
        domain: &DomainQuery,
        on_event: &(dyn Fn(SourceEvent) + Send + Sync),
    ) -> VerificationReport {
        let start = Instant::now();
        tracing::debug!(domain = %domain, "verification started");

        let (whois, rdap, a, aaaa, mx, ns, liveness) = tokio::join!(
            observe(SourceKind::Whois, self.whois_client.fetch(domain), on_event),
            observe(SourceKind::Rdap, self.rdap_client.fetch(domain), on_event),
            self.observe_dns(domain, DnsRecordType::A, on_event),
            self.observe_dns(domain, DnsRecordType::AAAA, on_event),
            self.observe_dns(domain, DnsRecordType::MX, on_event),
            self.observe_dns(domain, DnsRecordType::NS, on_event),
            observe(SourceKind::Liveness, self.probe.fetch(domain), on_event),
        );
        let dns = DnsResultBundle { a, aaaa, mx, ns };

        let observed_liveness = liveness
            .success()
            .copied()
            .unwrap_or_else(LivenessResult::unreachable);
        let activity = classify(&dns.to_records(), &observed_liveness);

        let mut report = build_report(
            domain,
            &whois,
            &rdap,
            &dns,
            &liveness,
            activity,
            &self.pricing,
        );
        report.check_duration = Some(start.elapsed());

        tracing::debug!(
            domain = %domain,
            failures = report.source_failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "verification finished"
        );
        report
    }

    async fn observe_dns(
        &self,
        domain: &DomainQuery,
        record_type: DnsRecordType,
        on_event: &(dyn Fn(SourceEvent) + Send + Sync),
    ) -> SourceResult<Vec<String>> {
        observe(
            SourceKind::Dns(record_type),
            self.dns_client.query(domain, record_type),
            on_event,
        )
        .await
    }

    /// Verify several domains, at most `concurrency` at a time.
    ///
    /// Returns one result per input in completion order. Invalid inputs
    /// produce an `Err` entry without affecting the rest.
    pub async fn verify_many(
        &self,
        domains: &[String],
    ) -> Vec<Result<VerificationReport, DomainVerifyError>> {
        self.verify_stream(domains).collect().await
    }

    /// Verify domains and yield reports as they complete.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use domain_verify_lib::DomainVerifier;
    /// use futures::StreamExt;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let verifier = DomainVerifier::new()?;
    ///     let domains = vec!["kenic.or.ke".to_string(), "nation.africa".to_string()];
    ///
    ///     let mut stream = verifier.verify_stream(&domains);
    ///     while let Some(result) = stream.next().await {
    ///         match result {
    ///             Ok(report) => println!("{}: {}", report.domain, report.activity),
    ///             Err(e) => println!("Error: {}", e),
    ///         }
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn verify_stream(
        &self,
        domains: &[String],
    ) -> Pin<Box<dyn Stream<Item = Result<VerificationReport, DomainVerifyError>> + Send + '_>>
    {
        let domains = domains.to_vec();
        let stream = futures::stream::iter(domains)
            .map(move |raw| async move { self.verify(&raw).await })
            .buffer_unordered(self.config.concurrency);

        Box::pin(stream)
    }

    /// Check whether a single domain can be registered.
    pub async fn check_availability(&self, domain: &DomainQuery) -> AvailabilityResult {
        self.whois_client.check_availability(domain).await
    }

    /// Attach the category's extension to `name` and check availability.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDomain` when `name` is not a usable label.
    pub async fn search(
        &self,
        name: &str,
        category: DomainCategory,
    ) -> Result<AvailabilityResult, DomainVerifyError> {
        let domain = expand_category_domain(name, category)?;
        Ok(self.check_availability(&domain).await)
    }

    /// Generate up to `count` suggestions without any network access.
    #[cfg(feature = "suggest")]
    pub fn suggest(&self, input: &SuggestionInput, count: usize) -> Vec<String> {
        generate_suggestions(input, count)
    }

    /// Generate suggestions and check each one's availability.
    ///
    /// Checks run concurrently, bounded by `concurrency`; results keep the
    /// suggestion order.
    #[cfg(feature = "suggest")]
    pub async fn suggest_and_check(
        &self,
        input: &SuggestionInput,
        count: usize,
    ) -> Vec<AvailabilityResult> {
        let candidates: Vec<DomainQuery> = self
            .suggest(input, count)
            .iter()
            .filter_map(|name| match normalize_domain(name) {
                Ok(domain) => Some(domain),
                Err(e) => {
                    tracing::warn!(suggestion = %name, error = %e, "skipping unusable suggestion");
                    None
                }
            })
            .collect();

        futures::stream::iter(candidates)
            .map(|domain| async move { self.check_availability(&domain).await })
            .buffered(self.config.concurrency)
            .collect()
            .await
    }

    /// Get the current configuration for this verifier.
    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// The pricing table used for reports.
    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }
}

async fn observe<T, F>(
    kind: SourceKind,
    source: F,
    on_event: &(dyn Fn(SourceEvent) + Send + Sync),
) -> SourceResult<T>
where
    F: Future<Output = SourceResult<T>>,
{
    let start = Instant::now();
    let result = source.await;
    on_event(SourceEvent {
        kind,
        success: result.is_success(),
        elapsed: start.elapsed(),
    });
    result
}
