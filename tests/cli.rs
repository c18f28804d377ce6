use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::Value;

const SMALL_CARD: &str = r#"
[page]
width_cm = 6.0
height_cm = 7.25
dpi = 150

[qr]
box_size = 8
top_margin = 20

[caption]
font_size = 24.0
font_paths = ["/nonexistent/fonts/arialbd.ttf"]

[logo]
path = "missing-icon.png"

[output]
path = "card.png"
"#;

fn qrstamp(dir: &Path, args: &[&str]) -> Output {
    std::fs::write(dir.join("card.toml"), SMALL_CARD).expect("write config");
    Command::new(env!("CARGO_BIN_EXE_qrstamp"))
        .current_dir(dir)
        .arg("--config")
        .arg("card.toml")
        .args(args)
        .env("QRSTAMP_LOG_LEVEL", "info")
        .env_remove("QRSTAMP_LOG_FILE")
        .env_remove("QRSTAMP_OUTPUT")
        .env_remove("QRSTAMP_LOGO")
        .output()
        .expect("spawn qrstamp")
}

#[test]
fn json_report_is_the_only_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let output = qrstamp(dir.path(), &["--json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "qrstamp failed: {stderr}");

    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["width"], 354);
    assert_eq!(report["height"], 428);
    assert!(report["logo"].is_null());
    assert!(dir.path().join("card.png").exists());

    // Logs, including the missing-logo warning, stay on stderr.
    assert!(stderr.contains("Logo not found"), "stderr: {stderr}");
}

#[test]
fn human_report_starts_with_success_line() {
    let dir = tempfile::tempdir().unwrap();
    let output = qrstamp(dir.path(), &["--output", "human.png"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap_or_default();
    assert_eq!(first, "Success! Saved to human.png");
    assert!(dir.path().join("human.png").exists());
}

#[test]
fn fatal_error_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let output = qrstamp(dir.path(), &["--output", "no-such-dir/card.png"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
