//! Fuzzy-logic cooling controller.
//!
//! Inputs are the average rack temperature, ambient humidity and average heat
//! output (0.7 * cpu + 0.3 * memory). Each rule's strength is the minimum of its
//! input memberships times the rule weight; the crisp level is the
//! strength-weighted average of the rule outputs.

use super::round_to;
use crate::types::{CoolingPlan, StatusInput};

pub const DEFAULT_TEMPERATURE: f64 = 25.0;
pub const DEFAULT_HUMIDITY: f64 = 45.0;
pub const DEFAULT_HEAT: f64 = 50.0;
/// Crisp level when no rule fires.
pub const NEUTRAL_LEVEL: f64 = 50.0;

pub fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    ((x - a) / (b - a)).min((c - x) / (c - b)).max(0.0)
}

pub fn trapezoidal(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    ((x - a) / (b - a)).min(1.0).min((d - x) / (d - c)).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Temp {
    Cold,
    Normal,
    Hot,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Humidity {
    Normal,
    High,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heat {
    Low,
    Medium,
    High,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Level {
    fn crisp(self) -> f64 {
        match self {
            Level::VeryLow => 10.0,
            Level::Low => 30.0,
            Level::Medium => 50.0,
            Level::High => 70.0,
            Level::VeryHigh => 90.0,
        }
    }

    pub fn from_crisp(v: f64) -> Level {
        match v {
            x if x < 20.0 => Level::VeryLow,
            x if x < 40.0 => Level::Low,
            x if x < 60.0 => Level::Medium,
            x if x < 80.0 => Level::High,
            _ => Level::VeryHigh,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::VeryLow => "very_low",
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
            Level::VeryHigh => "very_high",
        }
    }
}

struct Rule {
    temp: Temp,
    humidity: Humidity,
    heat: Heat,
    out: Level,
    weight: f64,
}

const RULES: [Rule; 6] = [
    Rule { temp: Temp::Cold, humidity: Humidity::Any, heat: Heat::Low, out: Level::VeryLow, weight: 1.0 },
    Rule { temp: Temp::Normal, humidity: Humidity::Normal, heat: Heat::Low, out: Level::Low, weight: 0.8 },
    Rule { temp: Temp::Normal, humidity: Humidity::Any, heat: Heat::Medium, out: Level::Medium, weight: 0.7 },
    Rule { temp: Temp::Hot, humidity: Humidity::Any, heat: Heat::Any, out: Level::High, weight: 0.9 },
    Rule { temp: Temp::Any, humidity: Humidity::Any, heat: Heat::High, out: Level::High, weight: 0.9 },
    Rule { temp: Temp::Hot, humidity: Humidity::High, heat: Heat::Any, out: Level::VeryHigh, weight: 1.0 },
];

fn temp_membership(t: Temp, x: f64) -> f64 {
    match t {
        Temp::Cold => trapezoidal(x, 15.0, 18.0, 22.0, 25.0),
        Temp::Normal => triangular(x, 22.0, 25.0, 28.0),
        Temp::Hot => trapezoidal(x, 25.0, 28.0, 35.0, 40.0),
        Temp::Any => 1.0,
    }
}

fn humidity_membership(h: Humidity, x: f64) -> f64 {
    match h {
        Humidity::Normal => triangular(x, 35.0, 45.0, 55.0),
        Humidity::High => trapezoidal(x, 50.0, 60.0, 70.0, 80.0),
        Humidity::Any => 1.0,
    }
}

fn heat_membership(h: Heat, x: f64) -> f64 {
    match h {
        Heat::Low => trapezoidal(x, 0.0, 10.0, 30.0, 40.0),
        Heat::Medium => triangular(x, 30.0, 50.0, 70.0),
        Heat::High => trapezoidal(x, 60.0, 70.0, 90.0, 100.0),
        Heat::Any => 1.0,
    }
}

/// Defuzzified cooling level in 0..=100.
pub fn crisp_level(temperature: f64, humidity: f64, heat: f64) -> f64 {
    let (weighted, total) = RULES.iter().fold((0.0, 0.0), |(sum, total), r| {
        let strength = temp_membership(r.temp, temperature)
            .min(humidity_membership(r.humidity, humidity))
            .min(heat_membership(r.heat, heat))
            * r.weight;
        (sum + strength * r.out.crisp(), total + strength)
    });
    if total > 0.0 {
        weighted / total
    } else {
        NEUTRAL_LEVEL
    }
}

/// (average temperature, ambient humidity, average heat output) from a status body.
pub fn inputs(status: &StatusInput) -> (f64, f64, f64) {
    let humidity = status
        .cooling
        .as_ref()
        .and_then(|c| c.humidity)
        .unwrap_or(DEFAULT_HUMIDITY);
    if status.servers.is_empty() {
        return (DEFAULT_TEMPERATURE, humidity, DEFAULT_HEAT);
    }
    let n = status.servers.len() as f64;
    let temp = status
        .servers
        .iter()
        .map(|s| s.temperature.unwrap_or(DEFAULT_TEMPERATURE))
        .sum::<f64>()
        / n;
    let heat = status
        .servers
        .iter()
        .map(|s| s.cpu.unwrap_or(50.0) * 0.7 + s.memory.unwrap_or(50.0) * 0.3)
        .sum::<f64>()
        / n;
    (temp, humidity, heat)
}

pub fn optimize(status: &StatusInput, timestamp: String) -> CoolingPlan {
    let (temp, humidity, heat) = inputs(status);
    let level = crisp_level(temp, humidity, heat);
    CoolingPlan {
        cooling_level: Level::from_crisp(level).as_str().to_string(),
        fan_speed_percent: level.floor() as u32,
        ac_temperature_setpoint: round_to(24.0 - (level - 50.0) / 10.0, 1),
        expected_power_savings: round_to((100.0 - level) * 0.05, 2),
        timestamp,
    }
}
