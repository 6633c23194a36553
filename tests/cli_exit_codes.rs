//! Tests for the CLI exit code contract (--required flag)

mod helpers;

use std::process::{Command, Output};

use tempfile::TempDir;

use helpers::{file_entry, write_document};

fn run_cli(descriptor: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_layered_config"))
        .args(args)
        .arg("--config-url")
        .arg(descriptor)
        .env_remove("DEBUG")
        .env_remove("MODE")
        .env_remove("CONFIG_ENV")
        .output()
        .expect("Failed to run layered_config binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_prints_resolved_value() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let doc = write_document(&dir, "config.yaml", "mail: 127.0.0.1\nmax_sessions: 12\n");
    let descriptor = file_entry(&doc);

    let output = run_cli(&descriptor, &["mail"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "127.0.0.1");

    let output = run_cli(&descriptor, &["svc.max_sessions", "--as", "int"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "12");
}

#[test]
fn test_missing_optional_key_exits_zero() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let doc = write_document(&dir, "config.yaml", "mail: 127.0.0.1\n");

    let output = run_cli(&file_entry(&doc), &["absent_key"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_missing_required_key_exits_one() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let doc = write_document(&dir, "config.yaml", "mail: 127.0.0.1\n");

    let output = run_cli(&file_entry(&doc), &["absent_key", "--required"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");

    let output = run_cli(&file_entry(&doc), &["mail", "--as", "int", "--required"]);
    assert_eq!(
        output.status.code(),
        Some(1),
        "a value that cannot be coerced is as fatal as a missing one"
    );
}

#[test]
fn test_bad_descriptor_exits_one() {
    let output = run_cli("a.yaml,b.yaml,c.yaml", &["mail"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("layered_config error"));
}
