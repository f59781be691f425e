use assert_cmd::Command;
use std::fs;

#[test]
fn test_failed_start_leaves_previous_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("results.json");
    fs::write(&store, "[]\n").unwrap();

    // a header value cannot contain a newline, so the HTTP client fails to build
    let output = Command::cargo_bin("collector")
        .unwrap()
        .args(["--count", "1", "--delay", "0", "--base-url", "http://127.0.0.1:9/db/"])
        .args(["--user-agent", "bad\nagent"])
        .arg("--output")
        .arg(&store)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(&store).unwrap(), "[]\n");
}

#[test]
fn test_invalid_range_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("results.json");

    let output = Command::cargo_bin("collector")
        .unwrap()
        .args(["--count", "0"])
        .arg("--output")
        .arg(&store)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!store.exists());
}
