//! Integration tests for the `quadc` binary.

use std::path::Path;
use std::process::{Command, Output};

fn write_source(dir: &Path, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).expect("write source failed");
    path
}

fn quadc(args: &[&str], file: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quadc"))
        .args(args)
        .arg(file)
        .env_remove("NO_COLOR")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run quadc")
}

const LOOP: &str = "int sum(int n) {\n  int s;\n  s = 0;\n  while (n > 0) {\n    s += n;\n    n--;\n  }\n  return s;\n}\n";

// ────────────────────────────────────────────────────────────────────────────
// Successful compilations
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_emit_ir() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "sum.c", LOOP);

    let out = quadc(&["--emit", "ir"], &file);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("fn sum(n) -> int {"));
    assert!(stdout.contains("  enter sum"));
    assert!(stdout.contains("goto __L1__"));
    assert!(stdout.contains("return s"));
    assert!(!stdout.contains("bb0"));
}

#[test]
fn test_emit_cfg_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "sum.c", LOOP);

    let out = quadc(&[], &file);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("bb0: ; preds: - ;"));
    assert!(stdout.contains("bb1"));
}

#[test]
fn test_emit_cfg_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "f.c", "int g = 5;\nint f() { return 1 + 2; }\n");

    let out = quadc(&["--emit", "cfg-json"], &file);
    assert!(out.status.success());

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("invalid JSON");
    assert_eq!(report["globals"][0], "global g = 5");

    let func = &report["functions"][0];
    assert_eq!(func["name"], "f");
    assert_eq!(func["quad_count"], 5);
    assert_eq!(func["edge_count"], 0);
    assert_eq!(func["blocks"].as_array().map(Vec::len), Some(1));
    assert_eq!(func["blocks"][0]["quads"][0], "enter f");
}

#[test]
fn test_emit_ast() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "f.c", "int f() { return 1 + 2; }\n");

    let out = quadc(&["--emit", "ast"], &file);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("function int f()"));
}

#[test]
fn test_no_implicit_return() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "f.c", "void f() { }\n");

    let with = quadc(&["--emit", "ir"], &file);
    assert!(String::from_utf8_lossy(&with.stdout).contains("return"));

    let without = quadc(&["--emit", "ir", "--no-implicit-return"], &file);
    assert!(without.status.success());
    assert!(!String::from_utf8_lossy(&without.stdout).contains("return"));
}

// ────────────────────────────────────────────────────────────────────────────
// Failures
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_type_error_reports_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "bad.c", "int f() { return y; }\n");

    let out = quadc(&["--color", "never"], &file);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());

    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("error[E2002]"), "stderr: {}", stderr);
    assert!(stderr.contains("bad.c:1:18"));
    assert!(stderr.contains("could not compile"));
}

#[test]
fn test_no_color_env_wins_over_flag() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "bad.c", "int f() { return y; }\n");

    let out = Command::new(env!("CARGO_BIN_EXE_quadc"))
        .args(["--color", "always"])
        .arg(&file)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run quadc");
    assert!(!out.status.success());
    assert!(!out.stderr.contains(&0x1b), "unexpected escape codes in stderr");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = quadc(&[], &dir.path().join("missing.c"));
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read"));
}
