use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn script(home: &Path, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("output_tracker_cli").unwrap();
    cmd.env("OUTPUT_TRACKER_HOME", home)
        .env("OUTPUT_TRACKER_CLI_SCRIPT", "1")
        .env("NO_COLOR", "1")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_adds_units_and_reports_totals() {
    let home = TempDir::new().unwrap();

    script(home.path(), "add 525 qm=2 flat=3\ntotals\nexit\n")
        .success()
        .stdout(contains("Added 5 525 unit(s)"))
        .stdout(contains("Weighted output     : 4.50"));

    let csv = std::fs::read_to_string(home.path().join("output_progress.csv")).unwrap();
    assert!(csv.starts_with("output,weighted_output,"));
}

#[test]
fn oversized_remove_is_rejected() {
    let home = TempDir::new().unwrap();

    script(home.path(), "add 525 qm=2 flat=3\nremove 525 qm=5\nweighted\n")
        .success()
        .stdout(contains("Cannot remove more 525 QM Warranty than recorded"))
        .stdout(contains("Weighted Output: 4.50"));
}

#[test]
fn negative_quantities_are_refused() {
    let home = TempDir::new().unwrap();

    script(home.path(), "add stratus flat=-3\n")
        .success()
        .stdout(contains("negative"));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = TempDir::new().unwrap();

    script(home.path(), "totls\n")
        .success()
        .stdout(contains("Unknown command `totls`"))
        .stdout(contains("Suggestion: `totals`?"));
}

#[test]
fn progress_survives_restart() {
    let home = TempDir::new().unwrap();

    script(home.path(), "add poc repair=4\n").success();
    script(home.path(), "breakdown --compact\n")
        .success()
        .stdout(contains("- POC: 4"))
        .stdout(contains("Repair: 4"));
}

#[test]
fn config_changes_are_persisted() {
    let home = TempDir::new().unwrap();

    script(home.path(), "config set decimal_places 1\n").success();
    script(home.path(), "add poc repair=1\nweighted\n")
        .success()
        .stdout(contains("Weighted Output: 2.0"));
}

#[test]
fn command_aliases_dispatch_like_their_command() {
    let home = TempDir::new().unwrap();

    script(home.path(), "add poc repair=2\nrm poc repair=1\nq\ntotals\n")
        .success()
        .stdout(contains("Removed 1 POC unit(s)"))
        .stdout(contains("Total output").not());
}
