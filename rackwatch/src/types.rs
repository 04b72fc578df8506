//! Telemetry data model. Field names mirror the backend's JSON schema.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};

pub const RACK_ROWS: usize = 2;
pub const RACK_COLS: usize = 5;
pub const RACK_CELLS: usize = RACK_ROWS * RACK_COLS;
pub const FORECAST_HORIZON_HOURS: u8 = 6;

/// One telemetry category fetched per refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    SystemStatus,
    Forecast,
    ResourceAllocation,
    CoolingPlan,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::SystemStatus,
        Category::Forecast,
        Category::ResourceAllocation,
        Category::CoolingPlan,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Category::SystemStatus => "/api/system/status",
            Category::Forecast => "/api/workload/forecast",
            Category::ResourceAllocation => "/api/resource/allocate",
            Category::CoolingPlan => "/api/cooling/optimize",
        }
    }

    /// Dependent categories POST their input; the others are plain GETs.
    pub fn is_post(self) -> bool {
        matches!(self, Category::ResourceAllocation | Category::CoolingPlan)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::SystemStatus => "system status",
            Category::Forecast => "workload forecast",
            Category::ResourceAllocation => "resource allocation",
            Category::CoolingPlan => "cooling plan",
        })
    }
}

/// Where a category's data came from in a given cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Live,
    Synthetic,
}

// ---------- system status ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Active,
    Hibernating,
    Offline,
}

impl ServerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServerStatus::Active => "active",
            ServerStatus::Hibernating => "hibernating",
            ServerStatus::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: u32,
    pub status: ServerStatus,
    pub cpu: f64,
    pub memory: f64,
    pub io: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    /// kW
    pub current: f64,
    /// kW
    pub saved: f64,
    #[serde(rename = "renewable")]
    pub renewable_pct: f64,
}

/// Cooling intensity. The backend's five-step scale folds onto three levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoolingLevel {
    Low,
    Medium,
    High,
}

impl CoolingLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            CoolingLevel::Low => "Low",
            CoolingLevel::Medium => "Medium",
            CoolingLevel::High => "High",
        }
    }
}

impl FromStr for CoolingLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "very_low" => Ok(CoolingLevel::Low),
            "medium" => Ok(CoolingLevel::Medium),
            "high" | "very_high" => Ok(CoolingLevel::High),
            other => Err(format!("unknown cooling level '{other}'")),
        }
    }
}

impl TryFrom<String> for CoolingLevel {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CoolingLevel> for String {
    fn from(level: CoolingLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for CoolingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolingState {
    pub level: CoolingLevel,
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
    #[serde(rename = "humidity")]
    pub humidity_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub servers: Vec<Server>,
    pub energy: Energy,
    pub cooling: CoolingState,
}

// ---------- forecast ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub server_id: u32,
    pub time_offset: u8,
    pub cpu_forecast: f64,
    pub memory_forecast: f64,
    pub io_forecast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSet {
    pub forecasts: Vec<ForecastPoint>,
}

// ---------- resource allocation ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Hibernate,
    Activate,
    MigrateWorkload,
    #[serde(alias = "maintain")]
    NoAction,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Hibernate => "hibernate",
            Action::Activate => "activate",
            Action::MigrateWorkload => "migrate_workload",
            Action::NoAction => "no_action",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub server_id: u32,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Percent; negative when the action adds load.
    pub expected_cpu_savings: f64,
    /// kW; negative when the action draws more power.
    #[serde(rename = "expected_energy_savings")]
    pub expected_energy_savings_kw: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub decisions: Vec<Decision>,
}

// ---------- cooling plan ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerOptimization {
    Performance,
    Balanced,
    Eco,
}

impl PowerOptimization {
    pub fn as_str(self) -> &'static str {
        match self {
            PowerOptimization::Performance => "performance",
            PowerOptimization::Balanced => "balanced",
            PowerOptimization::Eco => "eco",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolingSettings {
    pub fan_speed: f64,
    pub target_temp: f64,
    pub humidity_level: f64,
    pub power_optimization: PowerOptimization,
}

impl Default for CoolingSettings {
    fn default() -> Self {
        Self {
            fan_speed: 65.0,
            target_temp: 22.0,
            humidity_level: 45.0,
            power_optimization: PowerOptimization::Balanced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolingPlan {
    pub cooling_level: CoolingLevel,
    #[serde(rename = "fan_speed_percent")]
    pub fan_speed_pct: f64,
    #[serde(rename = "ac_temperature_setpoint")]
    pub ac_setpoint_c: f64,
    #[serde(rename = "expected_power_savings")]
    pub expected_power_savings_kw: f64,
    /// Row-major over the RACK_ROWS x RACK_COLS layout.
    #[serde(default)]
    pub server_temperatures: Vec<f64>,
    #[serde(default, rename = "cooling_settings")]
    pub settings: CoolingSettings,
}

impl CoolingPlan {
    /// Temperature at a rack position, if the layout is populated.
    pub fn rack_temperature(&self, row: usize, col: usize) -> Option<f64> {
        if row >= RACK_ROWS || col >= RACK_COLS {
            return None;
        }
        self.server_temperatures.get(row * RACK_COLS + col).copied()
    }
}

// ---------- snapshot ----------

/// One refresh cycle's aggregated telemetry. Replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub servers: Vec<Server>,
    pub energy: Energy,
    pub cooling: CoolingState,
    pub forecasts: Vec<ForecastPoint>,
    pub allocation_decisions: Vec<Decision>,
    pub cooling_plan: CoolingPlan,
    pub captured_at: DateTime<Local>,
}

impl Snapshot {
    pub fn assemble(
        status: SystemStatus,
        forecast: ForecastSet,
        allocation: AllocationPlan,
        cooling_plan: CoolingPlan,
    ) -> Self {
        Self {
            servers: status.servers,
            energy: status.energy,
            cooling: status.cooling,
            forecasts: forecast.forecasts,
            allocation_decisions: allocation.decisions,
            cooling_plan,
            captured_at: Local::now(),
        }
    }

    pub fn forecasts_at(&self, offset: u8) -> impl Iterator<Item = &ForecastPoint> {
        self.forecasts.iter().filter(move |f| f.time_offset == offset)
    }

    /// Mean (cpu, memory, io) across servers; None for an empty fleet.
    pub fn averages(&self) -> Option<(f64, f64, f64)> {
        if self.servers.is_empty() {
            return None;
        }
        let n = self.servers.len() as f64;
        let (c, m, i) = self.servers.iter().fold((0.0, 0.0, 0.0), |acc, s| {
            (acc.0 + s.cpu, acc.1 + s.memory, acc.2 + s.io)
        });
        Some((c / n, m / n, i / n))
    }

    pub fn validate(&self) -> Result<()> {
        validate_servers(&self.servers, &self.energy, &self.cooling)?;
        validate_forecasts(&self.forecasts)?;
        validate_fleet_coverage(&self.servers, &self.forecasts)?;
        validate_decisions(&self.allocation_decisions)?;
        self.cooling_plan.validate()
    }
}

// ---------- validation ----------

fn check_pct(category: Category, what: &str, v: f64) -> Result<()> {
    if v.is_finite() && (0.0..=100.0).contains(&v) {
        Ok(())
    } else {
        Err(DashError::Invalid {
            category,
            reason: format!("{what} {v} outside 0-100"),
        })
    }
}

fn invalid(category: Category, reason: String) -> DashError {
    DashError::Invalid { category, reason }
}

fn validate_servers(servers: &[Server], energy: &Energy, cooling: &CoolingState) -> Result<()> {
    let c = Category::SystemStatus;
    for s in servers {
        if s.id == 0 {
            return Err(invalid(c, "server id must be positive".into()));
        }
        check_pct(c, "cpu", s.cpu)?;
        check_pct(c, "memory", s.memory)?;
        check_pct(c, "io", s.io)?;
        if !s.temperature.is_finite() {
            return Err(invalid(c, format!("server {} temperature not finite", s.id)));
        }
    }
    if !(energy.current.is_finite() && energy.current >= 0.0)
        || !(energy.saved.is_finite() && energy.saved >= 0.0)
    {
        return Err(invalid(c, "energy readings must be non-negative".into()));
    }
    check_pct(c, "renewable share", energy.renewable_pct)?;
    check_pct(c, "humidity", cooling.humidity_pct)
}

fn validate_forecasts(points: &[ForecastPoint]) -> Result<()> {
    let c = Category::Forecast;
    // server id -> last offset seen; each server must run 1, 2, ..., 6 in order.
    let mut last: HashMap<u32, u8> = HashMap::new();
    for p in points {
        if p.server_id == 0 {
            return Err(invalid(c, "server id must be positive".into()));
        }
        let prev = last.get(&p.server_id).copied().unwrap_or(0);
        if p.time_offset != prev + 1 || p.time_offset > FORECAST_HORIZON_HOURS {
            return Err(invalid(
                c,
                format!(
                    "server {} offset {} out of sequence (after {})",
                    p.server_id, p.time_offset, prev
                ),
            ));
        }
        last.insert(p.server_id, p.time_offset);
        check_pct(c, "cpu forecast", p.cpu_forecast)?;
        check_pct(c, "memory forecast", p.memory_forecast)?;
        check_pct(c, "io forecast", p.io_forecast)?;
    }
    if let Some((id, off)) = last.iter().find(|&(_, &o)| o != FORECAST_HORIZON_HOURS) {
        return Err(invalid(
            c,
            format!("server {id} has {off} of {FORECAST_HORIZON_HOURS} forecast points"),
        ));
    }
    Ok(())
}

// Status and forecast must describe the same fleet.
fn validate_fleet_coverage(servers: &[Server], points: &[ForecastPoint]) -> Result<()> {
    let c = Category::Forecast;
    if let Some(s) = servers
        .iter()
        .find(|s| !points.iter().any(|p| p.server_id == s.id))
    {
        return Err(invalid(c, format!("server {} has no forecast", s.id)));
    }
    if let Some(p) = points
        .iter()
        .find(|p| !servers.iter().any(|s| s.id == p.server_id))
    {
        return Err(invalid(c, format!("forecast for unknown server {}", p.server_id)));
    }
    Ok(())
}

fn validate_decisions(decisions: &[Decision]) -> Result<()> {
    let c = Category::ResourceAllocation;
    for d in decisions {
        if d.server_id == 0 {
            return Err(invalid(c, "server id must be positive".into()));
        }
        if !(d.confidence.is_finite() && (0.0..=1.0).contains(&d.confidence)) {
            return Err(invalid(
                c,
                format!("server {} confidence {} outside 0-1", d.server_id, d.confidence),
            ));
        }
        if !d.expected_cpu_savings.is_finite() || !d.expected_energy_savings_kw.is_finite() {
            return Err(invalid(c, format!("server {} savings not finite", d.server_id)));
        }
    }
    Ok(())
}

impl SystemStatus {
    pub fn validate(&self) -> Result<()> {
        validate_servers(&self.servers, &self.energy, &self.cooling)
    }

    pub fn server_ids(&self) -> Vec<u32> {
        self.servers.iter().map(|s| s.id).collect()
    }
}

impl ForecastSet {
    pub fn validate(&self) -> Result<()> {
        validate_forecasts(&self.forecasts)
    }

    /// Distinct server ids in order of first appearance.
    pub fn server_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = Vec::new();
        for p in &self.forecasts {
            if !ids.contains(&p.server_id) {
                ids.push(p.server_id);
            }
        }
        ids
    }
}

impl AllocationPlan {
    pub fn validate(&self) -> Result<()> {
        validate_decisions(&self.decisions)
    }
}

impl CoolingPlan {
    pub fn validate(&self) -> Result<()> {
        let c = Category::CoolingPlan;
        check_pct(c, "fan speed", self.fan_speed_pct)?;
        check_pct(c, "settings fan speed", self.settings.fan_speed)?;
        check_pct(c, "settings humidity", self.settings.humidity_level)?;
        if self.server_temperatures.len() != RACK_CELLS {
            return Err(invalid(
                c,
                format!(
                    "rack layout has {} temperatures, expected {RACK_CELLS}",
                    self.server_temperatures.len()
                ),
            ));
        }
        if !self.ac_setpoint_c.is_finite() || !self.expected_power_savings_kw.is_finite() {
            return Err(invalid(c, "setpoint or savings not finite".into()));
        }
        Ok(())
    }
}
