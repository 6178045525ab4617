//! `veil scan` end to end — runs the built binary against a temp file.

use std::io::Write;
use std::process::Command;

fn veil() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_veil"));
    cmd.env("RUST_LOG", "error");
    cmd
}

#[test]
fn test_scan_file_prints_result_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Reach me at jane@example.org or 020 7946 0958.").unwrap();

    let output = veil().arg("scan").arg(file.path()).output().unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["piiDetected"], true);
    assert_eq!(result["detectionStats"]["email"], 1);
    assert_eq!(result["detectionStats"]["phone"], 1);
    assert_eq!(
        result["redactedText"],
        "Reach me at [EMAIL_1] or [PHONE_1 *******0958]."
    );
}

#[test]
fn test_scan_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = veil()
        .arg("scan")
        .arg(dir.path().join("absent.txt"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("IO error"));
}

#[test]
fn test_help_lists_commands() {
    let output = veil().arg("help").output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("scan <file|->"));
}
