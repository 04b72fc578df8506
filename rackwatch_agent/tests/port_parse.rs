//! Port flag parsing shared by the agent binary.

use rackwatch_agent::{parse_port, DEFAULT_PORT};

fn args(v: &[&str]) -> Vec<String> {
    std::iter::once("agent").chain(v.iter().copied()).map(String::from).collect()
}

#[test]
fn port_long_short_and_assign() {
    assert_eq!(parse_port(args(&["--port", "9001"]), DEFAULT_PORT), 9001);
    assert_eq!(parse_port(args(&["-p", "9002"]), DEFAULT_PORT), 9002);
    assert_eq!(parse_port(args(&["--port=9003"]), DEFAULT_PORT), 9003);
    assert_eq!(parse_port(args(&[]), DEFAULT_PORT), 5000);
}

#[test]
fn long_form_beats_short_and_junk_falls_back() {
    assert_eq!(parse_port(args(&["-p", "9002", "--port", "9001"]), 1), 9001);
    assert_eq!(parse_port(args(&["--port", "http"]), 7), 7);
    assert_eq!(parse_port(args(&["--port", "70000"]), 7), 7);
    assert_eq!(parse_port(args(&["--port"]), 7), 7);
}
