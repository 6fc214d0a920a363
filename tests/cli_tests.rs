//! CLI integration tests
//!
//! These tests run the built binary against the fixture documents.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn wcs10_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_wcs10"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(wcs10_bin())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_basic() {
    let output = run(&["inspect"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect should succeed");
    assert!(stdout.contains("http://www.opengis.net/wcs"), "should show namespace");
    assert!(stdout.contains("Global elements (33)"), "should show element count");
    assert!(stdout.contains("InterpolationMethodType: nearest neighbor | bilinear"));
}

#[test]
fn test_cli_inspect_json_output() {
    let output = run(&["inspect", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect --json should succeed");

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(json["target_namespace"], "http://www.opengis.net/wcs");
    assert_eq!(json["global_elements"].as_array().map(Vec::len), Some(33));
}

#[test]
fn test_cli_inspect_type_lookup() {
    let output = run(&["inspect", "--type-name", "OutputType"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "type lookup should succeed");
    assert!(stdout.contains("Type: {http://www.opengis.net/wcs}OutputType"));
    assert!(stdout.contains("format (element"), "should list the format feature");
}

#[test]
fn test_cli_inspect_unknown_type() {
    let output = run(&["inspect", "-t", "NoSuchType"]);

    assert!(!output.status.success(), "should fail for an unknown type");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown type: NoSuchType"));
}

// ============================================================================
// Check Command Tests
// ============================================================================

#[test]
fn test_cli_check_valid_documents() {
    for name in ["get_coverage.xml", "capabilities.xml", "coverage_description.xml"] {
        let output = run(&["check", fixtures_dir().join(name).to_str().unwrap()]);
        let stdout = String::from_utf8_lossy(&output.stdout);

        assert!(output.status.success(), "{} should be valid", name);
        assert!(stdout.contains("Document is valid"), "{}", name);
    }
}

#[test]
fn test_cli_check_invalid_document() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bad_request.xml");
    std::fs::write(
        &file,
        r#"<wcs:GetCoverage xmlns:wcs="http://www.opengis.net/wcs" mode="fast">
  <wcs:sourceCoverage>dem</wcs:sourceCoverage>
</wcs:GetCoverage>
"#,
    )
    .unwrap();

    let strict = run(&["check", file.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&strict.stdout);
    assert!(!strict.status.success(), "strict check should fail");
    assert!(stdout.contains("Document is invalid"));
    assert!(stdout.contains("unexpected attribute 'mode'"));

    let lax = run(&["check", "--mode", "lax", file.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&lax.stdout);
    assert!(!lax.status.success(), "lax check should report problems");
    assert!(stdout.contains("Document has problems"));
    assert!(stdout.contains("domainSubset"));

    let skip = run(&["check", "--mode", "skip", file.to_str().unwrap()]);
    assert!(skip.status.success(), "skip mode ignores content errors");
}

#[test]
fn test_cli_check_bad_mode() {
    let output = run(&[
        "check",
        "--mode",
        "careless",
        fixtures_dir().join("get_coverage.xml").to_str().unwrap(),
    ]);
    assert!(!output.status.success());
}

// ============================================================================
// Roundtrip Command Tests
// ============================================================================

#[test]
fn test_cli_roundtrip_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("copy.xml");

    let output = run(&[
        "roundtrip",
        fixtures_dir().join("get_coverage.xml").to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "roundtrip should succeed");

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("<?xml"));
    assert!(written.contains("dem_30m"));

    let again = run(&["check", out.to_str().unwrap()]);
    assert!(again.status.success(), "written copy should be valid");
}

#[test]
fn test_cli_roundtrip_compact_stdout() {
    let output = run(&[
        "roundtrip",
        "--compact",
        fixtures_dir().join("get_coverage.xml").to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(stdout.trim_end().lines().count(), 1, "compact output is one line");
}
