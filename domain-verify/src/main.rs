//! Domain Verify CLI Application
//!
//! Command-line front end for domain-verify-lib: verifies domains against
//! WHOIS, RDAP, DNS-over-HTTPS and a live probe, checks availability,
//! generates name suggestions and shows `.ke` pricing.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use console::Term;
use domain_verify_lib::{
    load_env_config, normalize_domain, parse_timeout_string, Activity, AvailabilityResult,
    ConfigManager, DomainCategory, DomainQuery, DomainVerifier, EnvConfig, FileConfig, NameStyle,
    SourceEvent, SuggestionInput, VerificationReport, VerifyConfig, DEFAULT_SUGGESTION_COUNT,
};
use futures::StreamExt;
use serde::Serialize;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-verify
#[derive(Parser, Debug)]
#[command(name = "domain-verify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify .ke domains against WHOIS, RDAP, DNS and a live probe")]
#[command(
    long_about = "Verify domains against WHOIS, RDAP, DNS-over-HTTPS and a live HTTP(S) probe.\n\nEvery source is queried concurrently and reported on its own; a slow or failing source never hides the others. Also searches availability, suggests names per .ke category and shows registration pricing."
)]
#[command(styles = STYLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", global = true, help_heading = "Configuration")]
    pub config: Option<String>,

    /// Per-source timeout (e.g. 8s, 1m)
    #[arg(long = "timeout", value_name = "DURATION", global = true, help_heading = "Configuration")]
    pub timeout: Option<String>,

    /// API key for the WHOIS and availability provider
    #[arg(long = "whois-api-key", value_name = "KEY", global = true, help_heading = "Configuration")]
    pub whois_api_key: Option<String>,

    /// Show config sources and per-source progress
    #[arg(short = 'v', long = "verbose", global = true, help_heading = "Debugging")]
    pub verbose: bool,

    /// Show detailed debug information and failure messages
    #[arg(short = 'd', long = "debug", global = true, help_heading = "Debugging")]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify one or more domains against every source
    Verify(VerifyArgs),
    /// Check whether a name is free under a category's extension
    Search(SearchArgs),
    /// Generate name suggestions for a category
    Suggest(SuggestArgs),
    /// Show the pricing table, or the price for one domain
    Pricing(PricingArgs),
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Domains to verify (URLs and www. prefixes are accepted)
    #[arg(value_name = "DOMAINS", required = true)]
    pub domains: Vec<String>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Sectioned, colored output
    #[arg(long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Max domains verified at once (1-100)
    #[arg(short = 'c', long = "concurrency", value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Base name to look up, without extension
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Category whose extension is attached (Company, School, ...)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub category: DomainCategory,

    /// Output result in JSON format
    #[arg(short = 'j', long = "json")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Category to suggest names for (Company, School, Personal, ...)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub category: DomainCategory,

    /// Registered or legal name
    #[arg(long, value_name = "TEXT", help_heading = "About You")]
    pub name: Option<String>,

    /// Short description of what you do
    #[arg(long, value_name = "TEXT", help_heading = "About You")]
    pub description: Option<String>,

    #[arg(long, value_name = "TEXT", help_heading = "About You")]
    pub location: Option<String>,

    /// Company: kind of business
    #[arg(long = "business-type", value_name = "TEXT", help_heading = "Company")]
    pub business_type: Option<String>,

    /// Company: naming style
    #[arg(long, value_name = "TEXT", help_heading = "Company")]
    pub style: Option<String>,

    /// School: level (primary, secondary, ...)
    #[arg(long, value_name = "TEXT", help_heading = "School")]
    pub level: Option<String>,

    /// School: faith-based institution
    #[arg(long = "faith-based", help_heading = "School")]
    pub faith_based: bool,

    /// Personal: your full name
    #[arg(long = "full-name", value_name = "TEXT", help_heading = "Personal")]
    pub full_name: Option<String>,

    /// Personal: your initials
    #[arg(long, value_name = "TEXT", help_heading = "Personal")]
    pub initials: Option<String>,

    /// Personal: what the site is about
    #[arg(long, value_name = "TEXT", help_heading = "Personal")]
    pub focus: Option<String>,

    /// Personal: name the site after a brand instead of your real name
    #[arg(long = "brand-name", help_heading = "Personal")]
    pub brand_name: bool,

    /// Organization: kind of organization (NGO, trust, ...)
    #[arg(long = "org-type", value_name = "TEXT", help_heading = "Organization")]
    pub org_type: Option<String>,

    /// Allow names up to 15 characters instead of 12
    #[arg(long = "long", help_heading = "Output")]
    pub long: bool,

    /// Number of suggestions
    #[arg(long = "count", value_name = "N", default_value_t = DEFAULT_SUGGESTION_COUNT, help_heading = "Output")]
    pub count: usize,

    /// Only generate names, skip availability checks
    #[arg(long = "dry-run", help_heading = "Output")]
    pub dry_run: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PricingArgs {
    /// Domain to price; lists the full table when omitted
    #[arg(value_name = "DOMAIN")]
    pub domain: Option<String>,
}

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Text,
    Pretty,
    Json,
}

/// Configuration after file, environment and CLI layers are merged.
#[derive(Debug, Clone)]
struct ResolvedConfig {
    verify: VerifyConfig,
    json: bool,
    pretty: bool,
}

#[derive(Serialize)]
struct SuggestionOutput<'a> {
    category: DomainCategory,
    extension: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    names: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a [AvailabilityResult]>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = validate_args(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(cli.verbose, cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins when set.
fn init_logging(verbose: bool, debug: bool) {
    let default_filter = if debug {
        "domain_verify=debug"
    } else if verbose {
        "domain_verify=info"
    } else {
        "domain_verify=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// Validate command line arguments
fn validate_args(cli: &Cli) -> Result<(), String> {
    if let Some(timeout) = &cli.timeout {
        match parse_timeout_string(timeout) {
            Some(0) => return Err("Timeout must be greater than zero".to_string()),
            Some(_) => {}
            None => {
                return Err(format!(
                    "Invalid timeout '{}'. Use a value like 10s or 1m",
                    timeout
                ))
            }
        }
    }

    if let Some(key) = &cli.whois_api_key {
        if key.trim().is_empty() {
            return Err("WHOIS API key cannot be empty".to_string());
        }
    }

    match &cli.command {
        Command::Verify(args) => {
            if args.json && args.pretty {
                return Err("Cannot specify both --json and --pretty".to_string());
            }
            if let Some(concurrency) = args.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err("Concurrency must be between 1 and 100".to_string());
                }
            }
        }
        Command::Suggest(args) => {
            if args.count == 0 || args.count > 50 {
                return Err("Count must be between 1 and 50".to_string());
            }
        }
        Command::Search(_) | Command::Pricing(_) => {}
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let resolved = build_config(&cli)?;

    match &cli.command {
        Command::Verify(args) => {
            let mode = output_mode(args, &resolved);
            let config = match args.concurrency {
                Some(concurrency) => resolved.verify.with_concurrency(concurrency),
                None => resolved.verify,
            };
            run_verify(args, config, mode, cli.verbose, cli.debug).await
        }
        Command::Search(args) => run_search(args, resolved.verify).await,
        Command::Suggest(args) => run_suggest(args, resolved.verify).await,
        Command::Pricing(args) => run_pricing(args, resolved.verify),
    }
}

/// Build configuration by merging file, environment and CLI sources.
///
/// Precedence, highest first:
/// 1. CLI arguments
/// 2. Environment variables (DV_*)
/// 3. Explicit config file (--config, then DV_CONFIG)
/// 4. Discovered config files (local, then global, then XDG)
/// 5. Built-in defaults
fn build_config(cli: &Cli) -> Result<ResolvedConfig, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new(cli.verbose);
    let env_config = load_env_config(cli.verbose);

    let explicit_path = cli
        .config
        .as_ref()
        .map(|path| (path.clone(), "--config"))
        .or_else(|| env_config.config.clone().map(|path| (path, "DV_CONFIG")));

    let file_config = match explicit_path {
        Some((path, origin)) => {
            if cli.verbose {
                tracing::info!(path = %path, origin, "using explicit config file");
            }
            config_manager
                .load_file(&path)
                .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?
        }
        None => match config_manager.discover_and_load() {
            Ok(file_config) => file_config,
            Err(e) => {
                tracing::warn!(error = %e, "config discovery failed, using defaults");
                FileConfig::default()
            }
        },
    };

    let verify = file_config.apply_to(VerifyConfig::default())?;
    let verify = apply_environment_config(verify, &env_config, cli.verbose);
    let verify = apply_cli_args_to_config(verify, cli);

    let defaults = file_config.defaults.as_ref();
    Ok(ResolvedConfig {
        verify,
        json: env_config
            .json
            .or_else(|| defaults.and_then(|d| d.json))
            .unwrap_or(false),
        pretty: env_config
            .pretty
            .or_else(|| defaults.and_then(|d| d.pretty))
            .unwrap_or(false),
    })
}

fn apply_environment_config(config: VerifyConfig, env_config: &EnvConfig, verbose: bool) -> VerifyConfig {
    if env_config.has_output_format_conflict() && verbose {
        tracing::warn!("both DV_JSON and DV_PRETTY are set; JSON wins unless a CLI flag decides");
    }
    env_config.apply_to(config)
}

/// Apply CLI arguments to config (highest precedence).
///
/// Only flags the user actually passed override earlier layers.
fn apply_cli_args_to_config(mut config: VerifyConfig, cli: &Cli) -> VerifyConfig {
    if let Some(secs) = cli.timeout.as_deref().and_then(parse_timeout_string) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(key) = &cli.whois_api_key {
        config = config.with_whois_api_key(key.trim());
    }
    config
}

fn output_mode(args: &VerifyArgs, resolved: &ResolvedConfig) -> OutputMode {
    if args.json {
        OutputMode::Json
    } else if args.pretty {
        OutputMode::Pretty
    } else if resolved.json {
        OutputMode::Json
    } else if resolved.pretty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

fn spinner_enabled(mode: OutputMode, verbose: bool) -> bool {
    mode != OutputMode::Json && !verbose && Term::stderr().is_term()
}

async fn run_verify(
    args: &VerifyArgs,
    config: VerifyConfig,
    mode: OutputMode,
    verbose: bool,
    debug: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Reject bad input up front so no network call is made for it
    let mut domains = Vec::new();
    let mut invalid = 0usize;
    for raw in &args.domains {
        match normalize_domain(raw) {
            Ok(domain) => domains.push(domain),
            Err(e) if args.domains.len() == 1 => return Err(e.into()),
            Err(e) => {
                eprintln!("Error: {}", e);
                invalid += 1;
            }
        }
    }

    let verifier = DomainVerifier::with_config(config)?;

    if domains.len() == 1 {
        let report = verify_single(&verifier, &domains[0], mode, verbose).await;
        match mode {
            OutputMode::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputMode::Pretty => ui::print_report_pretty(&report, debug),
            OutputMode::Text => ui::print_report(&report),
        }
    } else if !domains.is_empty() {
        let start = Instant::now();
        let reports = verify_batch(&verifier, &domains, mode, verbose).await?;
        match mode {
            OutputMode::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            OutputMode::Pretty => {
                for report in &reports {
                    ui::print_report_pretty(report, debug);
                    println!();
                }
                let active = reports
                    .iter()
                    .filter(|r| r.activity == Activity::Active)
                    .count();
                ui::print_summary(reports.len(), active, reports.len() - active, start.elapsed());
            }
            OutputMode::Text => {
                for (i, report) in reports.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    ui::print_report(report);
                }
            }
        }
    }

    if invalid > 0 {
        return Err(format!(
            "{} of {} inputs were not valid domains",
            invalid,
            args.domains.len()
        )
        .into());
    }
    Ok(())
}

async fn verify_single(
    verifier: &DomainVerifier,
    domain: &DomainQuery,
    mode: OutputMode,
    verbose: bool,
) -> VerificationReport {
    let spinner = spinner_enabled(mode, verbose)
        .then(|| ui::Spinner::start(ui::progress_message(domain.as_str(), 0)));
    let text = spinner.as_ref().map(ui::Spinner::text);
    let settled = AtomicUsize::new(0);

    let on_event = |event: SourceEvent| {
        let done = settled.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(text) = &text {
            text.set(ui::progress_message(domain.as_str(), done));
        }
        if verbose {
            tracing::info!(domain = %domain, "{}", ui::describe_event(&event));
        }
    };

    let report = verifier.verify_with_progress(domain, &on_event).await;

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    report
}

/// Verify several domains and return the reports in input order.
async fn verify_batch(
    verifier: &DomainVerifier,
    domains: &[DomainQuery],
    mode: OutputMode,
    verbose: bool,
) -> Result<Vec<VerificationReport>, Box<dyn std::error::Error>> {
    let inputs: Vec<String> = domains.iter().map(|d| d.to_string()).collect();
    let spinner = spinner_enabled(mode, verbose)
        .then(|| ui::Spinner::start(ui::batch_message(0, inputs.len())));

    let mut reports = Vec::with_capacity(inputs.len());
    let mut stream = verifier.verify_stream(&inputs);
    while let Some(result) = stream.next().await {
        let report = result?;
        if verbose {
            tracing::info!(
                domain = %report.domain,
                failures = report.source_failures.len(),
                "verification finished"
            );
        }
        reports.push(report);
        if let Some(spinner) = &spinner {
            spinner
                .text()
                .set(ui::batch_message(reports.len(), inputs.len()));
        }
    }
    drop(stream);

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }

    reports.sort_by_key(|r| inputs.iter().position(|d| *d == r.domain));
    Ok(reports)
}

async fn run_search(args: &SearchArgs, config: VerifyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let verifier = DomainVerifier::with_config(config)?;
    let result = verifier.search(&args.name, args.category).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        ui::print_availability(&result);
    }
    Ok(())
}

/// Map the suggest flags onto the generator's input.
fn build_suggestion_input(args: &SuggestArgs) -> SuggestionInput {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut input = SuggestionInput::new(args.category);
    input.name = text(&args.name);
    input.description = text(&args.description);
    input.location = text(&args.location);
    input.business_type = text(&args.business_type);
    input.style = text(&args.style);
    input.level = text(&args.level);
    input.faith_based = args.faith_based;
    input.name_style = if args.brand_name {
        NameStyle::Brand
    } else {
        NameStyle::RealName
    };
    input.full_name = text(&args.full_name);
    input.initials = text(&args.initials);
    input.focus = text(&args.focus);
    input.org_type = text(&args.org_type);
    input.prefer_short = !args.long;
    input
}

async fn run_suggest(args: &SuggestArgs, config: VerifyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let verifier = DomainVerifier::with_config(config)?;
    let input = build_suggestion_input(args);
    let names = verifier.suggest(&input, args.count);

    if names.is_empty() {
        if args.json {
            println!("[]");
        } else {
            println!("No suggestions. Add a --name or --description to work from.");
        }
        return Ok(());
    }

    if args.dry_run {
        if args.json {
            let output = SuggestionOutput {
                category: args.category,
                extension: args.category.extension(),
                names: Some(&names),
                results: None,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            ui::print_suggestions(&names);
        }
        return Ok(());
    }

    let spinner = (!args.json && Term::stderr().is_term())
        .then(|| ui::Spinner::start(format!("Checking {} suggestions...", names.len())));
    let results = verifier.suggest_and_check(&input, args.count).await;
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }

    if args.json {
        let output = SuggestionOutput {
            category: args.category,
            extension: args.category.extension(),
            names: None,
            results: Some(&results),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        ui::print_grouped_availability(&results);
    }
    Ok(())
}

fn run_pricing(args: &PricingArgs, config: VerifyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let verifier = DomainVerifier::with_config(config)?;

    match &args.domain {
        Some(raw) => {
            let domain = normalize_domain(raw)?;
            let entry = verifier.pricing().price_for(&domain);
            println!("{}", ui::format_price(domain.as_str(), &entry));
        }
        None => ui::print_pricing_table(verifier.pricing().entries()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("domain-verify").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn resolved(json: bool, pretty: bool) -> ResolvedConfig {
        ResolvedConfig {
            verify: VerifyConfig::default(),
            json,
            pretty,
        }
    }

    fn verify_args(cli: &Cli) -> &VerifyArgs {
        match &cli.command {
            Command::Verify(args) => args,
            other => panic!("expected verify, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_args_json_and_pretty_conflict() {
        let cli = parse(&["verify", "example.co.ke", "--json", "--pretty"]);
        let result = validate_args(&cli);
        assert!(result.unwrap_err().contains("--json and --pretty"));
    }

    #[test]
    fn test_validate_args_concurrency_bounds() {
        assert!(validate_args(&parse(&["verify", "a.co.ke", "-c", "0"])).is_err());
        assert!(validate_args(&parse(&["verify", "a.co.ke", "-c", "101"])).is_err());
        assert!(validate_args(&parse(&["verify", "a.co.ke", "-c", "50"])).is_ok());
    }

    #[test]
    fn test_validate_args_timeout() {
        assert!(validate_args(&parse(&["pricing", "--timeout", "8s"])).is_ok());
        assert!(validate_args(&parse(&["pricing", "--timeout", "soon"]))
            .unwrap_err()
            .contains("Invalid timeout"));
        assert!(validate_args(&parse(&["pricing", "--timeout", "0s"])).is_err());
    }

    #[test]
    fn test_validate_args_suggest_count() {
        let cli = parse(&["suggest", "--category", "company", "--count", "0"]);
        assert!(validate_args(&cli).is_err());
        let cli = parse(&["suggest", "--category", "company"]);
        assert!(validate_args(&cli).is_ok());
    }

    #[test]
    fn test_category_parses_case_insensitively() {
        let cli = parse(&["search", "jambo", "--category", "SCHOOL"]);
        match cli.command {
            Command::Search(args) => assert_eq!(args.category, DomainCategory::School),
            other => panic!("expected search, got {:?}", other),
        }
        assert!(Cli::try_parse_from(["domain-verify", "search", "x", "--category", "bogus"]).is_err());
    }

    #[test]
    fn test_output_mode_cli_flags_win() {
        let cli = parse(&["verify", "a.co.ke", "--pretty"]);
        assert_eq!(output_mode(verify_args(&cli), &resolved(true, false)), OutputMode::Pretty);

        let cli = parse(&["verify", "a.co.ke"]);
        assert_eq!(output_mode(verify_args(&cli), &resolved(true, false)), OutputMode::Json);
        assert_eq!(output_mode(verify_args(&cli), &resolved(false, true)), OutputMode::Pretty);
        assert_eq!(output_mode(verify_args(&cli), &resolved(false, false)), OutputMode::Text);
    }

    #[test]
    fn test_cli_overrides_only_when_passed() {
        let config = VerifyConfig::default().with_whois_api_key("from-file");

        let cli = parse(&["pricing"]);
        let result = apply_cli_args_to_config(config.clone(), &cli);
        assert_eq!(result.whois_api_key.as_deref(), Some("from-file"));
        assert_eq!(result.whois_timeout, VerifyConfig::default().whois_timeout);

        let cli = parse(&["pricing", "--timeout", "3s", "--whois-api-key", "from-cli"]);
        let result = apply_cli_args_to_config(config, &cli);
        assert_eq!(result.whois_api_key.as_deref(), Some("from-cli"));
        assert_eq!(result.whois_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_build_suggestion_input() {
        let cli = parse(&[
            "suggest",
            "--category",
            "personal",
            "--description",
            "Wildlife photography",
            "--brand-name",
            "--long",
        ]);
        let Command::Suggest(args) = &cli.command else {
            panic!("expected suggest");
        };

        let input = build_suggestion_input(args);
        assert_eq!(input.category, DomainCategory::Personal);
        assert_eq!(input.name_style, NameStyle::Brand);
        assert!(!input.prefer_short);
        assert_eq!(input.description, "Wildlife photography");
        assert!(input.name.is_empty());
    }
}
