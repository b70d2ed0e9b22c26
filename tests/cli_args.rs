//! Integration tests for CLI argument handling
//!
//! Runs the binary with arguments and scripted stdin that never reach the
//! network.

use std::io::{ErrorKind, Write};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Helper to run the CLI with given args and stdin, capturing output
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_npsites"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute npsites");

    let mut pipe = child.stdin.take().expect("stdin should be piped");
    if !stdin.is_empty() {
        // The child may exit before reading, e.g. on invalid arguments
        match pipe.write_all(stdin.as_bytes()) {
            Err(e) if e.kind() != ErrorKind::BrokenPipe => panic!("Failed to write stdin: {}", e),
            _ => {}
        }
    }
    drop(pipe);

    child.wait_with_output().expect("Failed to wait for npsites")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"], "");
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("npsites"), "Help should mention npsites");
    assert!(stdout.contains("--cache-file"), "Help should mention --cache-file");
    assert!(stdout.contains("--delay-ms"), "Help should mention --delay-ms");
}

#[test]
fn test_zero_timeout_prints_error_and_exits() {
    let output = run_cli(&["--timeout-secs", "0"], "exit\n");
    assert!(!output.status.success(), "Expected zero timeout to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("timeout"),
        "Should print error message about the timeout: {}",
        stderr
    );
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let output = run_cli(&["--log-level", "loud"], "");
    assert!(!output.status.success());
}

#[test]
fn test_exit_at_state_prompt() {
    let temp_dir = TempDir::new().unwrap();
    let cache_file = temp_dir.path().join("cache.json");

    let output = run_cli(
        &["--cache-file", cache_file.to_str().unwrap()],
        "exit\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Enter a state name"));
    assert!(!cache_file.exists(), "Nothing was fetched so nothing is written");
}

#[test]
fn test_invalid_state_reprompts_then_eof_exits() {
    let temp_dir = TempDir::new().unwrap();
    let cache_file = temp_dir.path().join("cache.json");

    let output = run_cli(
        &["--cache-file", cache_file.to_str().unwrap()],
        "Narnia\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[Error] Enter proper state name"));
    assert_eq!(stdout.matches("Enter a state name").count(), 2);
}

#[test]
fn test_corrupt_cache_file_does_not_prevent_startup() {
    let temp_dir = TempDir::new().unwrap();
    let cache_file = temp_dir.path().join("cache.json");
    std::fs::write(&cache_file, "{ not json").unwrap();

    let output = run_cli(
        &["--cache-file", cache_file.to_str().unwrap()],
        "exit\n",
    );

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.is_empty(), "Corruption should not be reported: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use npsites::cli::{Cli, CliError, RuntimeConfig};
    use std::time::Duration;

    #[test]
    fn test_delay_converts_to_duration() {
        let cli = Cli::parse_from(["npsites", "--delay-ms", "1500"]);
        let config = RuntimeConfig::from_cli(&cli).unwrap();
        assert_eq!(config.min_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_negative_delay_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["npsites", "--delay-ms", "-5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let cli = Cli::parse_from(["npsites", "--timeout-secs", "0"]);
        assert!(matches!(
            RuntimeConfig::from_cli(&cli),
            Err(CliError::ZeroTimeout)
        ));
    }
}
