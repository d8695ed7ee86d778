//! # Domain Verify Library
//!
//! Multi-source verification of a single domain name: WHOIS, RDAP,
//! DNS-over-HTTPS and a live HTTP(S) probe run concurrently, and their
//! answers are merged into one [`VerificationReport`] with an activity
//! heuristic and ccTLD pricing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_verify_lib::{DomainVerifier, VerifyConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VerifyConfig::default().with_whois_api_key("at_...");
//!     let verifier = DomainVerifier::with_config(config)?;
//!     let report = verifier.verify("www.kenic.or.ke").await?;
//!
//!     println!("{} - {} - {}", report.domain, report.display_registered(), report.activity);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Failure isolation**: every source reports success or failure on its own
//! - **Bounded latency**: each source has a deadline; a verification takes
//!   about as long as its slowest source
//! - **Pricing**: longest-suffix lookup over the `.ke` namespace
//! - **Suggestions**: keyword-based name generation per category (`suggest` feature)

// Re-export main public API types and functions
// This makes them available as domain_verify_lib::TypeName
pub use activity::classify;
pub use checker::{DomainVerifier, SourceEvent};
pub use config::{
    load_env_config, load_env_config_from, parse_timeout_string, ApiConfig, ConfigManager,
    DefaultsConfig, EndpointsConfig, EnvConfig, FileConfig, PriceConfig,
};
pub use error::DomainVerifyError;
pub use pricing::PricingTable;
pub use protocols::{
    extract_answers, extract_rdap_record, extract_whois_record, parse_availability, DnsClient,
    LivenessProbe, RdapClient, WhoisClient,
};
pub use report::{build_report, TOTAL_FAILURE_ADVISORY};
pub use types::{
    display_list, display_opt, display_price, Activity, AvailabilityResult, AvailabilityStatus,
    DnsRecordType, DnsRecords, DnsResultBundle, DomainCategory, DomainQuery, FailureKind,
    LivenessResult, PricingEntry, Protocol, RdapRecord, SourceFailure, SourceFailureEntry,
    SourceKind, SourceResult, VerificationReport, VerifyConfig, WhoisRecord, UNKNOWN,
};
pub use utils::{expand_category_domain, normalize_domain};

#[cfg(feature = "suggest")]
pub mod suggest;

#[cfg(feature = "suggest")]
pub use suggest::{
    build_keywords, generate_suggestions, patternize, NameStyle, SuggestionInput,
    DEFAULT_SUGGESTION_COUNT,
};

// Internal modules - these are not part of the public API
mod activity;
mod checker;
mod concurrent;
mod config;
mod error;
mod pricing;
mod protocols;
mod report;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainVerifyError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        features: get_enabled_features(),
    }
}

/// Information about the library build and features
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub features: Vec<&'static str>,
}

/// Get list of enabled features at compile time
#[allow(clippy::vec_init_then_push)]
fn get_enabled_features() -> Vec<&'static str> {
    let mut features = Vec::new();

    #[cfg(feature = "suggest")]
    features.push("suggest");

    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_info() {
        let info = info();
        assert_eq!(info.version, VERSION);
        #[cfg(feature = "suggest")]
        assert!(info.features.contains(&"suggest"));
    }
}
