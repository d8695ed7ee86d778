// domain-verify/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DV_VARS: &[&str] = &[
    "DV_CONCURRENCY",
    "DV_TIMEOUT",
    "DV_PROBE_TIMEOUT",
    "DV_WHOIS_API_KEY",
    "DV_WHOIS_URL",
    "DV_AVAILABILITY_URL",
    "DV_RDAP_URL",
    "DV_DOH_URL",
    "DV_JSON",
    "DV_PRETTY",
    "DV_CONFIG",
    "RUST_LOG",
];

/// Command isolated from the caller's environment and config files.
fn isolated(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domain-verify").unwrap();
    for var in DV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", temp_dir.path())
        .env("XDG_CONFIG_HOME", temp_dir.path().join(".config"))
        .current_dir(temp_dir.path());
    cmd
}

/// Config whose endpoints all refuse connections immediately.
fn write_offline_config(temp_dir: &TempDir) -> String {
    let path = temp_dir.path().join("offline.toml");
    fs::write(
        &path,
        r#"
[defaults]
timeout = "2s"
probe_timeout = "2s"

[endpoints]
whois_url = "http://127.0.0.1:9/whois"
availability_url = "http://127.0.0.1:9/availability"
rdap_url = "http://127.0.0.1:9/rdap"
doh_url = "http://127.0.0.1:9/resolve"
probe_targets = ["http://127.0.0.1:9/{domain}"]
"#,
    )
    .unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_help_lists_subcommands() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("suggest"))
        .stdout(predicate::str::contains("pricing"))
        .stdout(predicate::str::contains("--whois-api-key"));
}

#[test]
fn test_version_flag() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_verify_rejects_input_without_suffix() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args(["verify", "nosuffix"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid domain 'nosuffix'"));
}

#[test]
fn test_verify_json_and_pretty_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args(["verify", "example.co.ke", "--json", "--pretty"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot specify both --json and --pretty"));
}

#[test]
fn test_verify_with_every_source_down_still_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_offline_config(&temp_dir);
    let mut cmd = isolated(&temp_dir);
    cmd.args(["verify", "https://www.testsite.or.ke/about", "--json", "--config", &config]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"domain\": \"testsite.or.ke\""))
        .stdout(predicate::str::contains("\"advisory\""))
        .stdout(predicate::str::contains("\"tld\": \".or.ke\""));
}

#[test]
fn test_verify_text_output_uses_dash_for_missing_values() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_offline_config(&temp_dir);
    let mut cmd = isolated(&temp_dir);
    cmd.args(["verify", "testsite.co.ke", "--config", &config]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("testsite.co.ke"))
        .stdout(predicate::str::contains("Registrar:"))
        .stdout(predicate::str::contains("—"))
        .stdout(predicate::str::contains("Activity:"))
        .stdout(predicate::str::contains("Passive"))
        .stdout(predicate::str::contains("Unavailable:"));
}

#[test]
fn test_verify_batch_reports_invalid_entry_and_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_offline_config(&temp_dir);
    let mut cmd = isolated(&temp_dir);
    cmd.args(["verify", "one.co.ke", "bad", "--json", "--config", &config]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("one.co.ke"))
        .stderr(predicate::str::contains("Invalid domain 'bad'"))
        .stderr(predicate::str::contains("1 of 2 inputs"));
}

#[test]
fn test_pricing_table() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.arg("pricing");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Suffix"))
        .stdout(predicate::str::contains(".co.ke"))
        .stdout(predicate::str::contains("$15"))
        .stdout(predicate::str::contains(".go.ke"));
}

#[test]
fn test_pricing_for_government_domain_is_zero() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args(["pricing", "www.treasury.go.ke"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("treasury.go.ke (.go.ke): register $0, renew $0"));
}

#[test]
fn test_pricing_override_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("prices.toml");
    fs::write(
        &config_path,
        "[pricing.\".co.ke\"]\nregister_usd = 14\nrenew_usd = 16\n",
    )
    .unwrap();

    let mut cmd = isolated(&temp_dir);
    cmd.args(["pricing", "shop.co.ke", "--config"])
        .arg(&config_path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("register $14, renew $16"));
}

#[test]
fn test_local_config_file_is_discovered() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("domain-verify.toml"),
        "[pricing.\".ke\"]\nregister_usd = 25\n",
    )
    .unwrap();

    let mut cmd = isolated(&temp_dir);
    cmd.args(["pricing", "kenya.ke"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("register $25"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[defaults]\nconcurrency = 0\n").unwrap();

    let mut cmd = isolated(&temp_dir);
    cmd.args(["pricing", "--config"]).arg(&config_path);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args(["pricing", "--config", "does-not-exist.toml"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_suggest_dry_run() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args([
        "suggest",
        "--category",
        "company",
        "--name",
        "Jua Kali",
        "--dry-run",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1. juakali.co.ke"))
        .stdout(predicate::str::contains(".co.ke"));
}

#[test]
fn test_suggest_dry_run_json() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args([
        "suggest",
        "--category",
        "school",
        "--name",
        "Green Hills",
        "--count",
        "3",
        "--dry-run",
        "--json",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"extension\": \".sc.ke\""))
        .stdout(predicate::str::contains("greenhills"));
}

#[test]
fn test_suggest_without_keywords() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args(["suggest", "--category", "general", "--dry-run"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No suggestions"));
}

#[test]
fn test_unknown_category_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args(["search", "jambo", "--category", "spaceport"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn test_search_without_api_key_reports_unknown() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args(["search", "jambo", "--category", "company", "--json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"domain\": \"jambo.co.ke\""))
        .stdout(predicate::str::contains("\"status\": \"unknown\""));
}

#[test]
fn test_invalid_timeout_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = isolated(&temp_dir);
    cmd.args(["pricing", "--timeout", "forever"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout"));
}
