//! Terminal rendering for the domain-verify CLI.
//!
//! Plain and `--pretty` report output, availability lines, suggestion
//! lists, the pricing table and the progress spinner. Uses only the
//! `console` crate for styling; JSON output is handled in `main.rs`.

use console::{pad_str, style, Alignment, Term};
use domain_verify_lib::{
    display_list, display_opt, display_price, AvailabilityResult, AvailabilityStatus, FailureKind,
    PricingEntry, SourceEvent, VerificationReport, UNKNOWN,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Number of sources settled per verification.
pub const SOURCE_COUNT: usize = 7;

const LABEL_WIDTH: usize = 14;
const DOMAIN_WIDTH: usize = 30;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Shared handle for updating a running spinner's message.
#[derive(Clone)]
pub struct SpinnerText(Arc<Mutex<String>>);

impl SpinnerText {
    pub fn set(&self, text: String) {
        if let Ok(mut current) = self.0.lock() {
            *current = text;
        }
    }

    fn get(&self) -> String {
        self.0.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    text: SpinnerText,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message.
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let text = SpinnerText(Arc::new(Mutex::new(message)));

        let running_clone = running.clone();
        let text_clone = text.clone();
        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), text_clone.get()));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            text,
            handle: Some(handle),
        }
    }

    pub fn text(&self) -> SpinnerText {
        self.text.clone()
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

/// Spinner text while a single domain's sources settle.
pub fn progress_message(domain: &str, settled: usize) -> String {
    format!(
        "Verifying {}... {}/{} sources",
        domain,
        settled.min(SOURCE_COUNT),
        SOURCE_COUNT
    )
}

/// Spinner text for a batch.
pub fn batch_message(done: usize, total: usize) -> String {
    format!("Verifying {} domains... {}/{} done", total, done, total)
}

/// One-line description of a settled source, for verbose logging.
pub fn describe_event(event: &SourceEvent) -> String {
    format!(
        "{} {} in {}ms",
        event.kind,
        if event.success { "answered" } else { "failed" },
        event.elapsed.as_millis()
    )
}

// ── Reports ──────────────────────────────────────────────────────────────────

/// A titled group of label/value rows.
pub struct Section {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

/// Break a report into display sections. Missing values render as `—`.
pub fn report_sections(report: &VerificationReport) -> Vec<Section> {
    vec![
        Section {
            title: "Registration",
            rows: vec![
                ("Registered", report.display_registered().to_string()),
                ("Registrar", display_opt(&report.registrar).to_string()),
                ("Created", display_opt(&report.created_date).to_string()),
                ("Updated", display_opt(&report.updated_date).to_string()),
                ("Expires", display_opt(&report.expires_date).to_string()),
                ("WHOIS status", display_list(&report.whois_statuses)),
                ("RDAP status", display_list(&report.rdap_statuses)),
                ("Nameservers", display_list(&report.nameservers)),
            ],
        },
        Section {
            title: "DNS",
            rows: vec![
                ("A", display_list(&report.dns.a)),
                ("AAAA", display_list(&report.dns.aaaa)),
                ("MX", display_list(&report.dns.mx)),
                ("NS", display_list(&report.dns.ns)),
            ],
        },
        Section {
            title: "Web",
            rows: vec![
                ("Reachable", report.display_reachable()),
                ("HTTP status", report.display_status_code()),
                ("Activity", report.activity.to_string()),
            ],
        },
        Section {
            title: "Pricing",
            rows: vec![
                ("Suffix", report.pricing.tld.clone()),
                ("Register", report.display_register_price()),
                ("Renew", report.display_renew_price()),
            ],
        },
    ]
}

fn failure_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Timeout => "timeout",
        FailureKind::Unreachable => "unreachable",
        FailureKind::Http => "http error",
        FailureKind::Parse => "bad response",
        FailureKind::Config => "not configured",
    }
}

/// Short list of failed sources, e.g. `WHOIS (timeout), DNS MX (http error)`.
pub fn failure_summary(report: &VerificationReport) -> Option<String> {
    if report.source_failures.is_empty() {
        return None;
    }
    Some(
        report
            .source_failures
            .iter()
            .map(|entry| format!("{} ({})", entry.source, failure_label(entry.failure.kind)))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Print a report as aligned `Label: value` lines.
pub fn print_report(report: &VerificationReport) {
    println!("{}", report.domain);
    for section in report_sections(report) {
        for (label, value) in section.rows {
            println!("  {:<width$} {}", format!("{}:", label), value, width = LABEL_WIDTH);
        }
    }
    if let Some(failures) = failure_summary(report) {
        println!("  {:<width$} {}", "Unavailable:", failures, width = LABEL_WIDTH);
    }
    if let Some(advisory) = &report.advisory {
        println!("  {}", advisory);
    }
}

/// Print a report with section headers and colors.
pub fn print_report_pretty(report: &VerificationReport, debug: bool) {
    println!(
        "{} {}",
        style(&report.domain).bold(),
        match report.activity {
            domain_verify_lib::Activity::Active => style("ACTIVE").green().bold(),
            domain_verify_lib::Activity::Passive => style("PASSIVE").yellow().bold(),
        }
    );
    println!();

    for section in report_sections(report) {
        println!(
            "  {} {}",
            style(format!("── {} ", section.title)).cyan().bold(),
            style("─".repeat(40)).cyan().dim(),
        );
        for (label, value) in section.rows {
            let padded = pad_str(label, LABEL_WIDTH, Alignment::Left, None);
            if value == UNKNOWN {
                println!("    {}  {}", style(padded).dim(), style(value).dim());
            } else {
                println!("    {}  {}", style(padded).dim(), value);
            }
        }
        println!();
    }

    for entry in &report.source_failures {
        println!(
            "  {} {} {}",
            style("•").dim(),
            style(entry.source).yellow(),
            style(format!("({})", failure_label(entry.failure.kind))).dim(),
        );
        if debug {
            println!("      {} {}", style("└─").dim(), style(&entry.failure.message).dim());
        }
    }
    if let Some(advisory) = &report.advisory {
        println!("  {}", style(advisory).yellow());
    }
    if let Some(duration) = report.check_duration {
        println!(
            "  {}",
            style(format!("Verified in {:.1}s", duration.as_secs_f64())).dim()
        );
    }
}

/// Print the closing line for a batch.
pub fn print_summary(total: usize, active: usize, passive: usize, duration: Duration) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} active", active)).green(),
        style("|").dim(),
        style(format!("{} passive", passive)).yellow(),
    );
}

// ── Availability ─────────────────────────────────────────────────────────────

fn status_word(status: AvailabilityStatus) -> console::StyledObject<&'static str> {
    match status {
        AvailabilityStatus::Available => style("AVAILABLE").green().bold(),
        AvailabilityStatus::Taken => style("TAKEN").red().bold(),
        AvailabilityStatus::Unknown => style("UNKNOWN").yellow(),
    }
}

/// Print one availability result.
pub fn print_availability(result: &AvailabilityResult) {
    let padded = pad_str(&result.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));
    match &result.error_message {
        Some(reason) if result.status == AvailabilityStatus::Unknown => println!(
            "  {}  {}  {}",
            padded,
            status_word(result.status),
            style(format!("({})", reason)).dim()
        ),
        _ => println!("  {}  {}", padded, status_word(result.status)),
    }
}

/// Print results grouped by status: Available, Taken, Unknown.
/// Empty sections are omitted entirely.
pub fn print_grouped_availability(results: &[AvailabilityResult]) {
    let groups = [
        (AvailabilityStatus::Available, "Available"),
        (AvailabilityStatus::Taken, "Taken"),
        (AvailabilityStatus::Unknown, "Unknown"),
    ];

    for (status, title) in groups {
        let members: Vec<&AvailabilityResult> =
            results.iter().filter(|r| r.status == status).collect();
        if members.is_empty() {
            continue;
        }

        let header = format!("── {} ({}) ", title, members.len());
        let rule = "─".repeat(48usize.saturating_sub(header.chars().count()));
        let (header, rule) = match status {
            AvailabilityStatus::Available => (style(header).green().bold(), style(rule).green().dim()),
            AvailabilityStatus::Taken => (style(header).red().bold(), style(rule).red().dim()),
            AvailabilityStatus::Unknown => (style(header).yellow().bold(), style(rule).yellow().dim()),
        };
        println!("  {} {}", header, rule);
        for r in members {
            match &r.error_message {
                Some(reason) => println!("    {}  {}", r.domain, style(format!("({})", reason)).dim()),
                None => println!("    {}", r.domain),
            }
        }
        println!();
    }
}

/// Print generated names without checking them.
pub fn print_suggestions(names: &[String]) {
    for (i, name) in names.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
}

// ── Pricing ──────────────────────────────────────────────────────────────────

/// Render the pricing table, one suffix per line.
pub fn format_pricing_table(entries: &[PricingEntry]) -> Vec<String> {
    let mut lines = vec![format!("{:<12} {:>9} {:>7}", "Suffix", "Register", "Renew")];
    for entry in entries {
        lines.push(format!(
            "{:<12} {:>9} {:>7}",
            entry.tld,
            display_price(entry.register_usd),
            display_price(entry.renew_usd)
        ));
    }
    lines
}

pub fn print_pricing_table(entries: &[PricingEntry]) {
    let mut lines = format_pricing_table(entries).into_iter();
    if let Some(header) = lines.next() {
        println!("{}", style(header).bold());
    }
    for line in lines {
        println!("{}", line);
    }
}

/// One-line price for a single domain.
pub fn format_price(domain: &str, entry: &PricingEntry) -> String {
    format!(
        "{} ({}): register {}, renew {}",
        domain,
        entry.tld,
        display_price(entry.register_usd),
        display_price(entry.renew_usd)
    )
}

// ── Tests ────────────────────────────────────────────────────────────────────
