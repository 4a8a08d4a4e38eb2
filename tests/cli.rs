//! CLI surface tests. These drive the compiled binary directly and never
//! launch a browser, so they run everywhere.

use std::process::Command;

fn pagesnap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pagesnap"))
}

#[test]
fn missing_url_exits_one_with_a_diagnostic() {
    let output = pagesnap().output().expect("Failed to run binary");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "Expected no HTML on stdout");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("URL") || stderr.contains("url"),
        "Expected a usage diagnostic mentioning the URL, got: {stderr}"
    );
}

#[test]
fn unknown_flag_exits_one() {
    let output = pagesnap()
        .args(["--no-such-flag", "https://example.com"])
        .output()
        .expect("Failed to run binary");

    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn help_exits_zero_and_documents_the_arguments() {
    let output = pagesnap().arg("--help").output().expect("Failed to run binary");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("URL"));
    assert!(stdout.contains("SCREENSHOT"));
    assert!(stdout.contains("--user-agent"));
}

#[test]
fn version_exits_zero() {
    let output = pagesnap().arg("--version").output().expect("Failed to run binary");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("pagesnap"));
}
