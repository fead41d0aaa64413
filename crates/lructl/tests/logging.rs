use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn write_script(dir: &Path) -> std::path::PathBuf {
    let script = dir.join("session.lru");
    fs::write(&script, "ADD a 1\nGET a\n").unwrap();
    script
}

fn lructl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lructl"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

#[test]
fn test_file_sink_keeps_its_own_level() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path());
    let log = dir.path().join("lructl.log");

    let output = lructl(&[
        "--script",
        script.to_str().unwrap(),
        "--log-file",
        log.to_str().unwrap(),
        "--file-level",
        "debug",
        "--log-level",
        "error",
    ]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "OK\n1\n");

    let file = fs::read_to_string(&log).unwrap();
    assert!(file.contains("DEBUG"));
    assert!(file.contains("executing"));
    assert!(file.contains("Starting lructl"));

    // Console is held at error, so none of the debug/info events reach it
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("executing"));
    assert!(!stderr.contains("Starting lructl"));
}

#[test]
fn test_quiet_file_next_to_verbose_console() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path());
    let log = dir.path().join("quiet.log");

    let output = lructl(&[
        "--script",
        script.to_str().unwrap(),
        "--log-file",
        log.to_str().unwrap(),
        "--file-level",
        "error",
        "--log-level",
        "debug",
    ]);

    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("executing"));

    let file = fs::read_to_string(&log).unwrap();
    assert!(!file.contains("executing"));
}

#[test]
fn test_unknown_level_falls_back_to_info() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path());

    let output = lructl(&["--script", script.to_str().unwrap(), "--log-level", "loud"]);

    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown log level 'loud', falling back to info"));
    assert!(stderr.contains("Starting lructl"));
    assert!(!stderr.contains("executing"));
}

#[test]
fn test_logging_config_file() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path());
    let log = dir.path().join("from-config.log");
    let config = dir.path().join("logging.json");
    fs::write(
        &config,
        format!(
            r#"{{ "console_level": "error", "file_level": "debug", "file": {:?} }}"#,
            log.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = lructl(&[
        "--script",
        script.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(fs::read_to_string(&log).unwrap().contains("executing"));
}
