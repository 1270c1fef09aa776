//! Tests for error handling and CLI flags.

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("setup"));
    assert!(out.contains("matrix"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "mirrorer");
}

#[test]
fn test_verbose_flag_accepted() {
    let t = Test::with_repos(FOO_BAR_REPOS);

    let output = t.cmd().args(["--verbose", "matrix"]).output().unwrap();
    assert_success(&output);
    // Logs go to stderr; stdout stays a single JSON document
    stdout_json(&output);
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("_mirrorer") || out.contains("complete"));
}

#[test]
fn test_completions_fish() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "fish"]).output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(
        out.contains("complete") && out.contains("mirrorer"),
        "fish completion should contain fish-specific syntax"
    );
}
