//! Activity heuristic.
//!
//! Decides whether a domain looks actively used from its DNS answers and the
//! liveness probe. It is a heuristic: a domain that only receives mail is
//! reported as active even when no web server answers.

use crate::types::{Activity, DnsRecords, LivenessResult};

/// Address placeholder some registries publish for parked names.
const NULL_ADDRESS: &str = "0.0.0.0";

/// Classify a domain as `Active` or `Passive`.
///
/// `Active` when it has an address or mail record AND (the probe reached it
/// OR it has mail). An MX record alone satisfies both sides.
pub fn classify(dns: &DnsRecords, liveness: &LivenessResult) -> Activity {
    let has_address = dns.a.iter().any(|addr| addr != NULL_ADDRESS) || !dns.aaaa.is_empty();
    let has_mail = !dns.mx.is_empty();

    if (has_address || has_mail) && (liveness.reachable || has_mail) {
        Activity::Active
    } else {
        Activity::Passive
    }
}
