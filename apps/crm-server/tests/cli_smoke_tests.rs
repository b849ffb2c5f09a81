//! CLI smoke tests for the crm-server binary

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn run_crm_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_crm-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute crm-server")
}

/// Config with logging to console only, rooted in `dir`.
fn write_config(dir: &Path, extra: &str) -> String {
    let home = dir.join("home").to_string_lossy().replace('\\', "/");
    let content = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 0

logging:
  default:
    console_level: error
    file: ""
{extra}
"#
    );
    let path = dir.join("crm.yaml");
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_crm_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("crm-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_crm_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("crm-server 0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_crm_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the bad subcommand");
}

#[test]
fn test_cli_missing_config_file() {
    for flag in ["--config", "-c"] {
        let output = run_crm_server(&[flag, "/nonexistent/config.yaml", "check"]);

        assert!(!output.status.success(), "Should fail with missing config");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("config file not found"),
            "Should mention missing config file: {stderr}"
        );
    }
}

#[test]
fn test_cli_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_crm_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
database:
  url: "sqlite://database/crm.db"

modules:
  salespersons:
    max_page_size: 100
"#,
    );

    let output = run_crm_server(&["--config", &config_path, "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Should succeed with valid config: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("database/crm.db?mode=rwc"));
}

#[test]
fn test_cli_check_rejects_unknown_module_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
database:
  url: "sqlite::memory:"

modules:
  salespersons:
    page_sise: 10
"#,
    );

    let output = run_crm_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("salespersons"), "{stderr}");
}

#[test]
fn test_cli_mock_flag_overrides_unsupported_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
database:
  url: "postgresql://localhost/nonexistent"
"#,
    );

    let without_mock = run_crm_server(&["--config", &config_path, "check"]);
    assert!(!without_mock.status.success());
    assert!(String::from_utf8_lossy(&without_mock.stderr).contains("Unsupported database type"));

    let with_mock = run_crm_server(&["--config", &config_path, "--mock", "check"]);
    assert!(
        with_mock.status.success(),
        "Should succeed with mock database: {}",
        String::from_utf8_lossy(&with_mock.stderr)
    );
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_crm_server(&["--config", &config_path, "--port", "9123", "--print-config"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("port: 9123"));
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_crm_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Start the server"));

    let output = run_crm_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Check configuration"));
}

#[tokio::test]
async fn test_cli_run_with_mock_database_keeps_serving() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_crm-server"));
    cmd.args(["--config", &config_path, "--mock", "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let child = cmd.spawn().expect("Failed to spawn crm-server");

    // Still running after the startup window means migrations and bind worked.
    match timeout(Duration::from_secs(3), child.wait_with_output()).await {
        Err(_elapsed) => {}
        Ok(Ok(output)) => panic!(
            "server exited early: {}",
            String::from_utf8_lossy(&output.stderr)
        ),
        Ok(Err(e)) => panic!("failed to wait for server: {e}"),
    }
}

#[test]
fn test_cli_run_rejects_bad_listen_address() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("bad_host.yaml");
    let home = temp_dir.path().join("home").to_string_lossy().replace('\\', "/");
    std::fs::write(
        &config_path,
        format!(
            "server:\n  home_dir: \"{home}\"\n  host: \"not an address\"\n  port: 8090\nlogging:\n  default:\n    console_level: error\n    file: \"\"\n"
        ),
    )
    .expect("Failed to write config file");

    let output = run_crm_server(&["--config", config_path.to_str().unwrap(), "--mock", "run"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid listen address"), "{stderr}");
}
