#![cfg(unix)]

use std::process::Command;

#[test]
fn version_prints_the_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn extended_version_prints_build_provenance() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("version")
        .arg("--extended")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: sensorlink"));
    assert!(stdout.contains("target_os:"));
    assert!(stdout.contains("target_arch:"));
}

#[test]
fn emit_rejects_a_non_hex_client_with_usage_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("emit")
        .arg("-")
        .arg("--client")
        .arg("not-hex")
        .output()
        .expect("emit should run");

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--client"));
}

#[test]
fn emit_rejects_an_oversized_client_with_usage_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("emit")
        .arg("-")
        .arg("--client")
        .arg("ab".repeat(16))
        .output()
        .expect("emit should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn emit_rejects_a_malformed_reading_with_usage_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("emit")
        .arg("-")
        .arg("--client")
        .arg("6e6f6465")
        .arg("--reading")
        .arg("missing-value")
        .output()
        .expect("emit should run");

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("HEXID:VALUE"));
}

#[test]
fn watch_rejects_an_unsupported_baud_with_usage_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("watch")
        .arg("/dev/null")
        .arg("--baud")
        .arg("12345")
        .output()
        .expect("watch should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn watch_fails_cleanly_on_a_missing_device() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("watch")
        .arg("/dev/sensorlink-does-not-exist")
        .output()
        .expect("watch should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"));
}

#[test]
fn inspect_fails_cleanly_on_a_missing_capture() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("inspect")
        .arg("/tmp/sensorlink-no-such-capture.bin")
        .output()
        .expect("inspect should run");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn unknown_subcommands_fail_to_parse() {
    let output = Command::new(env!("CARGO_BIN_EXE_sensorlink"))
        .arg("frobnicate")
        .output()
        .expect("cli should run");

    assert!(!output.status.success());
}
