//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DV_*`
//! environment variables, and merging them with proper precedence rules:
//! CLI arguments > environment > local file > global file > XDG file >
//! built-in defaults.

use crate::error::DomainVerifyError;
use crate::types::VerifyConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// concurrency = 20
/// timeout = "8s"
///
/// [api]
/// whois_api_key = "at_..."
///
/// [pricing.".co.ke"]
/// register_usd = 14
/// renew_usd = 14
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Data source locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<EndpointsConfig>,

    /// Provider credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiConfig>,

    /// Per-suffix price overrides, keyed by suffix (".co.ke")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<HashMap<String, PriceConfig>>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default batch concurrency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Per-source timeout (as string, e.g., "5s", "1m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Per-attempt liveness probe timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_timeout: Option<String>,

    /// Default pretty output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    /// Default JSON output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

/// Endpoint overrides, mostly useful for self-hosted resolvers and tests.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EndpointsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doh_url: Option<String>,

    /// URL templates for the liveness probe, each containing `{domain}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_targets: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_api_key: Option<String>,
}

/// Price override for one suffix. A missing value means "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_usd: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub renew_usd: Option<u32>,
}

impl FileConfig {
    /// Layer this file's values over `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unparseable timeout string.
    pub fn apply_to(&self, mut config: VerifyConfig) -> Result<VerifyConfig, DomainVerifyError> {
        if let Some(defaults) = &self.defaults {
            if let Some(concurrency) = defaults.concurrency {
                config = config.with_concurrency(concurrency);
            }
            if let Some(timeout) = &defaults.timeout {
                config = config.with_timeout(require_timeout(timeout)?);
            }
            if let Some(probe_timeout) = &defaults.probe_timeout {
                config = config.with_probe_timeout(require_timeout(probe_timeout)?);
            }
        }

        if let Some(endpoints) = &self.endpoints {
            if let Some(url) = &endpoints.whois_url {
                config = config.with_whois_url(url.as_str());
            }
            if let Some(url) = &endpoints.availability_url {
                config = config.with_availability_url(url.as_str());
            }
            if let Some(url) = &endpoints.rdap_url {
                config = config.with_rdap_url(url.as_str());
            }
            if let Some(url) = &endpoints.doh_url {
                config = config.with_doh_url(url.as_str());
            }
            if let Some(targets) = &endpoints.probe_targets {
                config = config.with_probe_targets(targets.clone());
            }
        }

        if let Some(key) = self.api.as_ref().and_then(|api| api.whois_api_key.as_ref()) {
            config = config.with_whois_api_key(key.as_str());
        }

        if let Some(pricing) = &self.pricing {
            for (suffix, price) in pricing {
                config = config.with_price(suffix, price.register_usd, price.renew_usd);
            }
        }

        Ok(config)
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log which files were found and used
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed and validated configuration, or an error if the file is
    /// missing, unreadable, not valid TOML, or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainVerifyError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainVerifyError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainVerifyError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainVerifyError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Invalid files are skipped with a warning; later files override
    /// earlier ones field by field.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainVerifyError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                }
            }
        }

        if self.verbose {
            for path in &loaded_files {
                tracing::info!(path = %path.display(), "loaded config file");
            }
            if loaded_files.len() > 1 {
                tracing::info!("multiple config files found; later files take precedence");
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./domain-verify.toml", "./.domain-verify.toml"]
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;

        [".domain-verify.toml", "domain-verify.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-verify").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.probe_timeout.is_some() {
                        lower_defaults.probe_timeout = higher_defaults.probe_timeout;
                    }
                    if higher_defaults.pretty.is_some() {
                        lower_defaults.pretty = higher_defaults.pretty;
                    }
                    if higher_defaults.json.is_some() {
                        lower_defaults.json = higher_defaults.json;
                    }
                    Some(lower_defaults)
                }
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            endpoints: match (lower.endpoints, higher.endpoints) {
                (Some(mut lower_endpoints), Some(higher_endpoints)) => {
                    if higher_endpoints.whois_url.is_some() {
                        lower_endpoints.whois_url = higher_endpoints.whois_url;
                    }
                    if higher_endpoints.availability_url.is_some() {
                        lower_endpoints.availability_url = higher_endpoints.availability_url;
                    }
                    if higher_endpoints.rdap_url.is_some() {
                        lower_endpoints.rdap_url = higher_endpoints.rdap_url;
                    }
                    if higher_endpoints.doh_url.is_some() {
                        lower_endpoints.doh_url = higher_endpoints.doh_url;
                    }
                    if higher_endpoints.probe_targets.is_some() {
                        lower_endpoints.probe_targets = higher_endpoints.probe_targets;
                    }
                    Some(lower_endpoints)
                }
                (lower_endpoints, higher_endpoints) => higher_endpoints.or(lower_endpoints),
            },
            api: match (lower.api, higher.api) {
                (Some(lower_api), Some(higher_api)) => Some(ApiConfig {
                    whois_api_key: higher_api.whois_api_key.or(lower_api.whois_api_key),
                }),
                (lower_api, higher_api) => higher_api.or(lower_api),
            },
            pricing: match (lower.pricing, higher.pricing) {
                (Some(mut lower_prices), Some(higher_prices)) => {
                    // Whole-suffix replacement; higher wins for conflicts
                    lower_prices.extend(higher_prices);
                    Some(lower_prices)
                }
                (lower_prices, higher_prices) => higher_prices.or(lower_prices),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainVerifyError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(DomainVerifyError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            for timeout_str in [&defaults.timeout, &defaults.probe_timeout]
                .into_iter()
                .flatten()
            {
                require_timeout(timeout_str)?;
            }

            if defaults.json == Some(true) && defaults.pretty == Some(true) {
                return Err(DomainVerifyError::config(
                    "Cannot enable both 'json' and 'pretty' in defaults",
                ));
            }
        }

        if let Some(endpoints) = &config.endpoints {
            let urls = [
                &endpoints.whois_url,
                &endpoints.availability_url,
                &endpoints.rdap_url,
                &endpoints.doh_url,
            ];
            for url in urls.into_iter().flatten() {
                if !is_http_url(url) {
                    return Err(DomainVerifyError::config(format!(
                        "Endpoint '{}' must start with http:// or https://",
                        url
                    )));
                }
            }

            if let Some(targets) = &endpoints.probe_targets {
                if targets.is_empty() {
                    return Err(DomainVerifyError::config(
                        "probe_targets cannot be an empty list",
                    ));
                }
                for target in targets {
                    if !target.contains("{domain}") || !is_http_url(target) {
                        return Err(DomainVerifyError::config(format!(
                            "Probe target '{}' must be an http(s) URL containing {{domain}}",
                            target
                        )));
                    }
                }
            }
        }

        if let Some(pricing) = &config.pricing {
            for suffix in pricing.keys() {
                if !suffix.starts_with('.') || suffix.len() < 2 || suffix.contains(' ') {
                    return Err(DomainVerifyError::config(format!(
                        "Invalid pricing suffix '{}'. Use a form like \".co.ke\"",
                        suffix
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via DV_* environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub probe_timeout: Option<String>,
    pub whois_api_key: Option<String>,
    pub whois_url: Option<String>,
    pub availability_url: Option<String>,
    pub rdap_url: Option<String>,
    pub doh_url: Option<String>,
    pub json: Option<bool>,
    pub pretty: Option<bool>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Layer environment values over `config`. Values were validated on load.
    pub fn apply_to(&self, mut config: VerifyConfig) -> VerifyConfig {
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(secs) = self.timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.probe_timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_probe_timeout(Duration::from_secs(secs));
        }
        if let Some(key) = &self.whois_api_key {
            config = config.with_whois_api_key(key.as_str());
        }
        if let Some(url) = &self.whois_url {
            config = config.with_whois_url(url.as_str());
        }
        if let Some(url) = &self.availability_url {
            config = config.with_availability_url(url.as_str());
        }
        if let Some(url) = &self.rdap_url {
            config = config.with_rdap_url(url.as_str());
        }
        if let Some(url) = &self.doh_url {
            config = config.with_doh_url(url.as_str());
        }
        config
    }

    /// Check if output format conflicts exist (JSON and pretty both set).
    pub fn has_output_format_conflict(&self) -> bool {
        matches!((self.json, self.pretty), (Some(true), Some(true)))
    }
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    load_env_config_from(|name| env::var(name).ok(), verbose)
}

/// Load `DV_*` configuration through an arbitrary variable lookup.
pub fn load_env_config_from<F>(lookup: F, verbose: bool) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();
    let used = |name: &str, shown: &str| {
        if verbose {
            tracing::info!("using {}={}", name, shown);
        }
    };

    // DV_CONCURRENCY - concurrent batch verifications
    if let Some(val) = lookup("DV_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(concurrency) if (1..=100).contains(&concurrency) => {
                env_config.concurrency = Some(concurrency);
                used("DV_CONCURRENCY", &val);
            }
            _ => tracing::warn!("invalid DV_CONCURRENCY='{}', must be 1-100", val),
        }
    }

    for (name, slot) in [
        ("DV_TIMEOUT", &mut env_config.timeout),
        ("DV_PROBE_TIMEOUT", &mut env_config.probe_timeout),
    ] {
        if let Some(val) = lookup(name) {
            if parse_timeout_string(&val).is_some_and(|secs| secs > 0) {
                used(name, &val);
                *slot = Some(val);
            } else {
                tracing::warn!("invalid {}='{}', use format like '5s', '30s', '2m'", name, val);
            }
        }
    }

    // DV_WHOIS_API_KEY - never echoed back
    if let Some(key) = lookup("DV_WHOIS_API_KEY").filter(|k| !k.trim().is_empty()) {
        env_config.whois_api_key = Some(key.trim().to_string());
        used("DV_WHOIS_API_KEY", "<redacted>");
    }

    for (name, slot) in [
        ("DV_WHOIS_URL", &mut env_config.whois_url),
        ("DV_AVAILABILITY_URL", &mut env_config.availability_url),
        ("DV_RDAP_URL", &mut env_config.rdap_url),
        ("DV_DOH_URL", &mut env_config.doh_url),
    ] {
        if let Some(url) = lookup(name) {
            if is_http_url(&url) {
                used(name, &url);
                *slot = Some(url);
            } else {
                tracing::warn!("invalid {}='{}', must be an http(s) URL", name, url);
            }
        }
    }

    for (name, slot) in [
        ("DV_JSON", &mut env_config.json),
        ("DV_PRETTY", &mut env_config.pretty),
    ] {
        if let Some(val) = lookup(name) {
            match parse_bool(&val) {
                Some(flag) => {
                    used(name, &val);
                    *slot = Some(flag);
                }
                None => tracing::warn!("invalid {}='{}', use true/false", name, val),
            }
        }
    }

    // DV_CONFIG - explicit config file
    if let Some(path) = lookup("DV_CONFIG").filter(|p| !p.trim().is_empty()) {
        used("DV_CONFIG", &path);
        env_config.config = Some(path);
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// A bare number is taken as seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| m * 60)
    } else {
        timeout_str.parse::<u64>().ok()
    }
}

fn require_timeout(timeout_str: &str) -> Result<Duration, DomainVerifyError> {
    match parse_timeout_string(timeout_str) {
        Some(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(DomainVerifyError::config(format!(
            "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
            timeout_str
        ))),
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
