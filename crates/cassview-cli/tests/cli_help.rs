use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("cassview")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("reindex"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_sessions_help_shows_agent_filter() {
    cargo_bin_cmd!("cassview")
        .args(["sessions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--agent"))
        .stdout(predicate::str::contains("--only-workspace"));
}

#[test]
fn test_unknown_agent_is_rejected() {
    cargo_bin_cmd!("cassview")
        .args(["sessions", "--agent", "copilot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown agent 'copilot'"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("cassview")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cassview"));
}
