//! Telemetry models behind the endpoints. All are pure functions of their input and an Rng.

pub mod allocation;
pub mod cooling;
pub mod fleet;
pub mod forecast;

pub fn round_to(v: f64, decimals: i32) -> f64 {
    let p = 10f64.powi(decimals);
    (v * p).round() / p
}

pub fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
