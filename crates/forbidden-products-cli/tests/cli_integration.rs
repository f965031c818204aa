//! Integration tests for the fpctl CLI.
//!
//! Run with: `cargo test --package forbidden-products-cli --test cli_integration`

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper to run fpctl against a data directory.
fn run_fpctl(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fpctl"))
        .current_dir(data_dir)
        .env_remove("FP_USER_DATA_DIR")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("Failed to execute fpctl command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn config_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("ForbiddenProducts")
}

fn write_config(data_dir: &Path, json: &str) {
    let dir = config_dir(data_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("customer_forbidden_products.json"), json).unwrap();
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_fpctl"))
        .arg("--help")
        .output()
        .expect("Failed to execute fpctl command");
    assert!(output.status.success());

    let text = stdout(&output);
    for command in ["paths", "init", "validate", "show", "debug"] {
        assert!(text.contains(command), "missing {command} in help");
    }
}

// ============================================================================
// Paths / Init
// ============================================================================

#[test]
fn test_paths_uses_data_dir_flag() {
    let temp = TempDir::new().unwrap();
    let output = run_fpctl(temp.path(), &["paths"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("ForbiddenProducts"));
    assert!(text.contains("customer_forbidden_products.json"));
    assert!(text.contains("--data-dir"));
    assert!(text.contains("missing"));
}

#[test]
fn test_init_writes_sorted_default() {
    let temp = TempDir::new().unwrap();
    let output = run_fpctl(temp.path(), &["init"]);
    assert!(output.status.success());

    let path = config_dir(temp.path()).join("customer_forbidden_products.json");
    let contents = fs::read_to_string(&path).unwrap();
    let austin = contents.find("austin_steiner").unwrap();
    let beth = contents.find("Beth_Penn").unwrap();
    let peter = contents.find("Peter_File").unwrap();
    assert!(austin < beth && beth < peter);
}

#[test]
fn test_init_keeps_existing_without_force() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), r#"{"only_me": ["Cocaine"]}"#);
    let path = config_dir(temp.path()).join("customer_forbidden_products.json");

    let output = run_fpctl(temp.path(), &["init"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("already exists"));
    assert!(fs::read_to_string(&path).unwrap().contains("only_me"));

    let output = run_fpctl(temp.path(), &["init", "--force"]);
    assert!(output.status.success());
    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("only_me"));
    assert!(contents.contains("kyle_cooley"));
}

// ============================================================================
// Validate
// ============================================================================

#[test]
fn test_validate_creates_and_accepts_default() {
    let temp = TempDir::new().unwrap();
    let output = run_fpctl(temp.path(), &["validate"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Created default config"));
    assert!(text.contains("8 customer(s) configured"));
}

#[test]
fn test_validate_reports_skipped_entries() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"{"a": ["Cocaine", "Crack"], "b": ["Nope"], "  ": ["Shrooms"]}"#,
    );

    let output = run_fpctl(temp.path(), &["validate"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Crack"));
    assert!(text.contains("1 customer(s) configured"));
    assert!(text.contains("a: Cocaine"));
}

#[test]
fn test_validate_fails_on_malformed_json() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "{ not json");

    let output = run_fpctl(temp.path(), &["validate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no restrictions"));
}

// ============================================================================
// Show / Debug
// ============================================================================

#[test]
fn test_show_customer_case_insensitive() {
    let temp = TempDir::new().unwrap();
    let output = run_fpctl(
        temp.path(),
        &[
            "show",
            "BETH_PENN",
            "--affinity",
            "Shrooms=0.9",
            "--affinity",
            "Marijuana=0.6",
        ],
    );
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Forbidden: Shrooms"));
    assert!(text.contains("<b>Wants:</b> Marijuana"));
    assert!(text.contains("<b>Refuses:</b> Shrooms"));
}

#[test]
fn test_show_json() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), r#"{"kyle": ["Methamphetamine", "Heroin"]}"#);

    let output = run_fpctl(
        temp.path(),
        &["show", "kyle", "-a", "Cocaine=0.7", "-a", "Methamphetamine=0.99", "--json"],
    );
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["customer"], "kyle");
    assert_eq!(
        report["forbidden"],
        serde_json::json!(["Methamphetamine", "Heroin"])
    );
    assert_eq!(report["wants"], serde_json::json!(["Cocaine"]));
    assert_eq!(report["annotations"].as_array().unwrap().len(), 2);
}

#[test]
fn test_show_rejects_bad_affinity() {
    let temp = TempDir::new().unwrap();
    let output = run_fpctl(temp.path(), &["show", "kyle", "--affinity", "Crack=0.5"]);
    assert!(!output.status.success());
}

#[test]
fn test_debug_follows_flag_and_filter() {
    let temp = TempDir::new().unwrap();
    let dir = config_dir(temp.path());
    fs::create_dir_all(&dir).unwrap();

    let output = run_fpctl(temp.path(), &["debug", "kyle"]);
    assert!(stdout(&output).contains("kyle: not traced"));

    fs::write(dir.join("forbidden_products.debug"), "").unwrap();
    let output = run_fpctl(temp.path(), &["debug", "kyle"]);
    assert!(stdout(&output).contains("kyle: traced"));

    fs::write(
        dir.join("forbidden_products.debug_npcs.txt"),
        "# only beth\nbeth\n",
    )
    .unwrap();
    let output = run_fpctl(temp.path(), &["debug", "kyle"]);
    assert!(stdout(&output).contains("kyle: not traced"));
    let output = run_fpctl(temp.path(), &["debug", "BETH"]);
    assert!(stdout(&output).contains("BETH: traced"));
}
