//! Request and response bodies for the telemetry endpoints.
//! Keep field names stable: they define the wire format the dashboard decodes.

use serde::{Deserialize, Serialize};

// ---------- responses ----------

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Server {
    pub id: u32,
    pub status: String,
    pub cpu: f64,
    pub memory: f64,
    pub io: f64,
    pub temperature: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Energy {
    pub current: f64,
    pub saved: f64,
    pub renewable: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CoolingReading {
    pub level: String,
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SystemStatus {
    pub servers: Vec<Server>,
    pub energy: Energy,
    pub cooling: CoolingReading,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPoint {
    pub server_id: u32,
    pub time_offset: u8,
    pub cpu_forecast: f64,
    pub memory_forecast: f64,
    pub io_forecast: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Forecast {
    pub forecasts: Vec<ForecastPoint>,
    pub timestamp: String,
    pub forecast_horizon: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Decision {
    pub server_id: u32,
    pub action: String,
    pub target: Option<String>,
    pub expected_cpu_savings: f64,
    pub expected_energy_savings: f64,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Allocation {
    pub decisions: Vec<Decision>,
    pub timestamp: String,
    pub optimization_goal: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CoolingPlan {
    pub cooling_level: String,
    pub fan_speed_percent: u32,
    pub ac_temperature_setpoint: f64,
    pub expected_power_savings: f64,
    pub timestamp: String,
}

// ---------- request bodies ----------
// Inputs are lenient: missing fields fall back to the controller defaults.

#[derive(Debug, Deserialize, Default)]
pub struct ForecastInput {
    #[serde(default)]
    pub forecasts: Vec<ForecastPointInput>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastPointInput {
    pub server_id: u32,
    pub time_offset: u8,
    pub cpu_forecast: f64,
    pub memory_forecast: f64,
    #[serde(default)]
    pub io_forecast: f64,
}

#[derive(Debug, Deserialize, Default)]
pub struct StatusInput {
    #[serde(default)]
    pub servers: Vec<ServerInput>,
    #[serde(default)]
    pub cooling: Option<CoolingInput>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ServerInput {
    pub temperature: Option<f64>,
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CoolingInput {
    pub humidity: Option<f64>,
}
