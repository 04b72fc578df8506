//! Demo telemetry backend for rackwatch: a fixed fleet, randomized forecasts,
//! rule-based allocation and a fuzzy cooling controller.

pub mod models;
pub mod routes;
pub mod state;
pub mod types;

pub use routes::build_router;
pub use state::AppState;

pub const DEFAULT_PORT: u16 = 5000;
pub const LOG_ENV: &str = "RACKWATCH_AGENT_LOG";
pub const SEED_ENV: &str = "RACKWATCH_AGENT_SEED";

/// `--port N`, `-p N` or `--port=N`; falls back to `default_port` when absent or unparsable.
pub fn parse_port<I: IntoIterator<Item = String>>(args: I, default_port: u16) -> u16 {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut long: Option<String> = None;
    let mut short: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--port" => long = it.next(),
            "-p" => short = it.next(),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    long = Some(v.to_string());
                }
            }
            _ => {}
        }
    }
    long.or(short)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(default_port)
}
