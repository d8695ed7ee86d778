//! Liveness probe: is anything answering HTTP for the bare domain?
//!
//! HTTPS is tried first, then HTTP. Any response at all (a 404 or a 500
//! included) counts as reachable; only transport failure or an attempt's
//! share of the bound expiring moves on to the next target. The whole probe
//! never outlives `probe_timeout`.

use crate::concurrent::with_deadline;
use crate::error::DomainVerifyError;
use crate::protocols::build_http_client;
use crate::types::{
    DomainQuery, FailureKind, LivenessResult, Protocol, SourceFailure, SourceResult, VerifyConfig,
};
use std::time::{Duration, Instant};

/// Placeholder substituted in probe target templates.
const DOMAIN_PLACEHOLDER: &str = "{domain}";

#[derive(Clone)]
pub struct LivenessProbe {
    http_client: reqwest::Client,
    /// Bound on the whole probe, shared between the targets
    timeout: Duration,
    targets: Vec<String>,
}

impl LivenessProbe {
    pub fn new() -> Result<Self, DomainVerifyError> {
        Self::with_config(&VerifyConfig::default())
    }

    pub fn with_config(config: &VerifyConfig) -> Result<Self, DomainVerifyError> {
        Ok(Self {
            http_client: build_http_client(config.probe_timeout, "liveness")?,
            timeout: config.probe_timeout,
            targets: config.probe_targets.clone(),
        })
    }

    /// Probe each target in order and stop at the first response.
    ///
    /// Each attempt gets an even share of whatever is left of the bound, so
    /// a target that fails fast hands its unused time to the next one.
    /// `Failed` only when every target failed; the last failure is returned.
    pub async fn fetch(&self, domain: &DomainQuery) -> SourceResult<LivenessResult> {
        let started = Instant::now();
        let mut last_failure = None;

        for (index, template) in self.targets.iter().enumerate() {
            let url = template.replace(DOMAIN_PLACEHOLDER, domain.as_str());
            let protocol = protocol_of(&url);
            let label = format!("{} probe", protocol);
            let bound = attempt_bound(
                self.timeout,
                started.elapsed(),
                self.targets.len() - index,
            );

            match with_deadline(&label, bound, self.attempt(&url)).await {
                SourceResult::Success(status_code) => {
                    tracing::debug!(%url, status_code, "probe answered");
                    return SourceResult::Success(LivenessResult::reachable(protocol, status_code));
                }
                SourceResult::Failed(failure) => {
                    tracing::debug!(%url, %failure, "probe attempt failed");
                    last_failure = Some(failure);
                }
            }
        }

        SourceResult::Failed(last_failure.unwrap_or_else(|| {
            SourceFailure::new(FailureKind::Config, "No probe targets configured")
        }))
    }

    async fn attempt(&self, url: &str) -> Result<u16, DomainVerifyError> {
        let response = self.http_client.get(url).send().await?;
        Ok(response.status().as_u16())
    }
}

/// Even share of the unspent bound for the next of `attempts_left` attempts.
fn attempt_bound(total: Duration, spent: Duration, attempts_left: usize) -> Duration {
    let remaining = total.saturating_sub(spent);
    let attempts = u32::try_from(attempts_left.max(1)).unwrap_or(u32::MAX);
    remaining / attempts
}

fn protocol_of(url: &str) -> Protocol {
    if url.get(..8).is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://")) {
        Protocol::Https
    } else {
        Protocol::Http
    }
}
