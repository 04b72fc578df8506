//! CLI arg parsing tests for rackwatch (client)
use assert_cmd::Command;

fn rackwatch() -> Command {
    Command::cargo_bin("rackwatch").expect("rackwatch binary built")
}

fn run(args: &[&str]) -> (bool, i32, String) {
    let output = rackwatch()
        .args(args)
        .env_remove("RACKWATCH_REFRESH_SECS")
        .env_remove("RACKWATCH_TIMEOUT_MS")
        .output()
        .expect("run rackwatch");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), output.status.code().unwrap_or(-1), text)
}

#[test]
fn test_help_mentions_short_and_long_flags() {
    let (ok, _, text) = run(&["--help"]);
    assert!(ok);
    assert!(
        text.contains("--role") && text.contains("-r") && text.contains("--profile") && text.contains("-P"),
        "help text missing expected flags (--role/-r, --profile/-P)\n{text}"
    );
    assert!(text.contains("admin, operator, viewer"));
}

#[test]
fn test_help_wins_over_other_flags() {
    for args in [
        &["--role", "viewer", "--help"][..],
        &["-r", "operator", "--help"][..],
        &["--profile", "dev", "--help"][..],
    ] {
        let (ok, _, text) = run(args);
        assert!(ok, "{args:?} did not succeed");
        assert!(text.contains("Usage:"));
    }
}

#[test]
fn test_dry_run_prints_resolved_settings() {
    let (ok, _, text) = run(&["--role", "viewer", "-i", "15", "--offline", "http://10.0.0.5:5000", "--dry-run"]);
    assert!(ok, "{text}");
    assert!(text.contains("base_url: http://10.0.0.5:5000"), "{text}");
    assert!(text.contains("role: viewer"));
    assert!(text.contains("refresh_interval_secs: 15"));
    assert!(text.contains("offline: true"));
}

#[test]
fn test_equals_forms_are_accepted() {
    let (ok, _, text) = run(&["--role=operator", "--interval=5", "http://h:1", "--dry-run"]);
    assert!(ok, "{text}");
    assert!(text.contains("role: operator"));
    assert!(text.contains("refresh_interval_secs: 5"));
}

#[test]
fn test_demo_dry_run_targets_local_agent() {
    let (ok, _, text) = run(&["--demo", "--dry-run"]);
    assert!(ok, "{text}");
    assert!(text.contains("base_url: http://127.0.0.1:5055"), "{text}");
}

#[test]
fn test_invalid_arguments_exit_with_usage() {
    rackwatch().arg("--bogus").assert().failure().code(2);
    let (_, _, text) = run(&["--bogus"]);
    assert!(text.contains("Unknown option '--bogus'"), "{text}");

    let (ok, code, _) = run(&["--interval", "0", "--dry-run"]);
    assert!(!ok);
    assert_eq!(code, 2);

    let (ok, _, text) = run(&["--role", "root", "http://h:1", "--dry-run"]);
    assert!(!ok);
    assert!(text.contains("unknown role 'root'"), "{text}");
}
