//! End-to-end tests for the `speclint` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLEAN: &str = "# Title\n\n## 1 Intro\n\n## 2 Body\n";
const MISNUMBERED: &str = "# Title\n\n## 1 Intro\n\n## 3 Body\n";

fn speclint(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_speclint"));
    cmd.current_dir(dir).env_remove("RUST_LOG").arg("--color").arg("never");
    cmd
}

/// A project root (bounded by `.git`) with a `docs/` directory
fn setup_project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(temp_dir.path().join(".git")).unwrap();
    for (name, content) in files {
        let path = temp_dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    temp_dir
}

#[test]
fn test_clean_files_exit_zero() {
    let project = setup_project(&[("docs/spec.md", CLEAN)]);
    speclint(project.path())
        .args(["check", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found in 1 file"));
}

#[test]
fn test_violations_exit_one() {
    let project = setup_project(&[("docs/spec.md", MISNUMBERED)]);
    speclint(project.path())
        .args(["check", "docs/spec.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "docs/spec.md:5:1: [SL001] Non-sequential numbering in this section: got '3', expected '2'.",
        ))
        .stdout(predicate::str::contains("Found 1 issue in 1 file"));
}

#[test]
fn test_top_level_readme_exempt_from_ascii_only() {
    let project = setup_project(&[("README.md", "# Título\n\nCafé notes.\n")]);
    speclint(project.path())
        .args(["check", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found in 1 file"));
}

#[test]
fn test_missing_path_is_tool_error() {
    let project = setup_project(&[]);
    speclint(project.path())
        .args(["check", "nope.md"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("File not found: nope.md"));
}

#[test]
fn test_invalid_config_is_tool_error() {
    let project = setup_project(&[("docs/spec.md", CLEAN), (".speclint.toml", "[global\n")]);
    speclint(project.path())
        .args(["check", "docs"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_json_output() {
    let project = setup_project(&[("docs/a.md", MISNUMBERED), ("docs/b.md", "x → y\n")]);
    let output = speclint(project.path())
        .args(["check", "docs", "--output-format", "json", "--disable", "ascii-only"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["file"], "docs/a.md");
    assert_eq!(records[0]["rule"], "SL001");
    assert_eq!(records[0]["line"], 5);
    assert_eq!(records[1]["file"], "docs/b.md");
    assert_eq!(records[1]["rule"], "SL004");
    assert_eq!(records[1]["column"], 3);
}

#[test]
fn test_github_output_from_config() {
    let project = setup_project(&[
        ("docs/spec.md", MISNUMBERED),
        (".speclint.toml", "[global]\noutput-format = \"github\"\n"),
    ]);
    speclint(project.path())
        .args(["check", "docs"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "::error file=docs/spec.md,line=5,col=1,title=SL001::",
        ));
}

#[test]
fn test_disable_flag_accepts_alias() {
    let project = setup_project(&[("docs/spec.md", MISNUMBERED)]);
    speclint(project.path())
        .args(["check", "docs", "--disable", "heading-numbering"])
        .assert()
        .success();
}

#[test]
fn test_config_discovered_from_target_directory() {
    let project = setup_project(&[
        ("docs/spec.md", MISNUMBERED),
        ("docs/drafts/wip.md", "x → y\n"),
        (
            ".speclint.toml",
            "[global]\nexclude = [\"docs/drafts\"]\n\n[per-file-ignores]\n\"docs/spec.md\" = [\"SL001\"]\n",
        ),
    ]);
    speclint(project.path())
        .args(["check", "docs"])
        .assert()
        .success();

    // Explicitly named files are still checked against excludes
    speclint(project.path())
        .args(["check", "docs/drafts/wip.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ignored because of exclude pattern"));

    speclint(project.path())
        .args(["check", "docs/drafts/wip.md", "--no-exclude"])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_config_key_warns_but_continues() {
    let project = setup_project(&[
        ("docs/spec.md", CLEAN),
        (".speclint.toml", "[SL002]\nstrict-placment = false\n"),
    ]);
    speclint(project.path())
        .args(["check", "docs"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[config warning]"))
        .stderr(predicate::str::contains("did you mean: strict-placement?"));
}

#[test]
fn test_stdin_with_filename() {
    let project = setup_project(&[]);
    speclint(project.path())
        .args(["check", "--stdin", "--stdin-filename", "notes/README.md"])
        .write_stdin("naïve → text\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("notes/README.md:1:7: [SL004]"))
        .stdout(predicate::str::contains("[SL003]").not());
}

#[test]
fn test_init_creates_config_once() {
    let project = setup_project(&[]);
    speclint(project.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default configuration file"));
    assert!(project.path().join(".speclint.toml").exists());

    speclint(project.path())
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_rule_listing() {
    let project = setup_project(&[]);
    speclint(project.path())
        .arg("rule")
        .assert()
        .success()
        .stdout(predicate::str::contains("SL001 (heading-numbering)"))
        .stdout(predicate::str::contains("SL004 (no-unicode-arrows)"));

    speclint(project.path())
        .args(["rule", "allowed_anchors"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SL002"))
        .stdout(predicate::str::contains("strict-placement = true"));

    speclint(project.path()).args(["rule", "MD001"]).assert().code(2);
}

#[test]
fn test_config_defaults() {
    let project = setup_project(&[]);
    speclint(project.path())
        .args(["config", "--defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[SL001]"))
        .stdout(predicate::str::contains("policy = \"section\""));
}
