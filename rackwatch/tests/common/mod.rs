//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use chrono::Local;
use rackwatch::types::{
    Action, AllocationPlan, Category, CoolingLevel, CoolingPlan, CoolingSettings, CoolingState,
    Decision, Energy, ForecastPoint, ForecastSet, Server, ServerStatus, Snapshot, SystemStatus,
    RACK_CELLS,
};

pub fn server(id: u32, cpu: f64, memory: f64) -> Server {
    Server {
        id,
        status: ServerStatus::Active,
        cpu,
        memory,
        io: 30.0,
        temperature: 40.0,
    }
}

/// Six points for one server; the one-hour point carries the given load, the rest sit at 50/50.
pub fn forecast_for(server_id: u32, cpu_1h: f64, memory_1h: f64) -> Vec<ForecastPoint> {
    (1..=6u8)
        .map(|offset| {
            let (cpu, memory) = if offset == 1 { (cpu_1h, memory_1h) } else { (50.0, 50.0) };
            ForecastPoint {
                server_id,
                time_offset: offset,
                cpu_forecast: cpu,
                memory_forecast: memory,
                io_forecast: 25.0,
            }
        })
        .collect()
}

pub fn decision(server_id: u32, action: Action, kw: f64) -> Decision {
    Decision {
        server_id,
        action,
        target: None,
        expected_cpu_savings: 0.0,
        expected_energy_savings_kw: kw,
        confidence: 0.8,
    }
}

pub fn cooling_plan() -> CoolingPlan {
    CoolingPlan {
        cooling_level: CoolingLevel::Medium,
        fan_speed_pct: 65.0,
        ac_setpoint_c: 21.5,
        expected_power_savings_kw: 3.2,
        server_temperatures: (0..RACK_CELLS).map(|i| 38.0 + i as f64).collect(),
        settings: CoolingSettings::default(),
    }
}

/// Three moderate servers with nothing for the conditional rules to report.
pub fn quiet_snapshot() -> Snapshot {
    Snapshot {
        servers: vec![server(1, 50.0, 50.0), server(2, 50.0, 50.0), server(3, 50.0, 50.0)],
        energy: Energy {
            current: 15.0,
            saved: 4.0,
            renewable_pct: 40.0,
        },
        cooling: CoolingState {
            level: CoolingLevel::Medium,
            temperature_c: 22.0,
            humidity_pct: 45.0,
        },
        forecasts: (1..=3).flat_map(|id| forecast_for(id, 50.0, 50.0)).collect(),
        allocation_decisions: (1..=3).map(|id| decision(id, Action::NoAction, 0.0)).collect(),
        cooling_plan: cooling_plan(),
        captured_at: Local::now(),
    }
}

pub fn with_forecast(mut s: Snapshot, server_id: u32, cpu_1h: f64, memory_1h: f64) -> Snapshot {
    s.forecasts.retain(|p| p.server_id != server_id);
    s.forecasts.extend(forecast_for(server_id, cpu_1h, memory_1h));
    s
}

/// JSON bodies a healthy backend would return for `quiet_snapshot`, keyed by category.
pub fn live_bodies() -> HashMap<Category, String> {
    let s = quiet_snapshot();
    let status = SystemStatus {
        servers: s.servers,
        energy: s.energy,
        cooling: s.cooling,
    };
    let forecast = ForecastSet { forecasts: s.forecasts };
    let allocation = AllocationPlan {
        decisions: s.allocation_decisions,
    };
    HashMap::from([
        (Category::SystemStatus, serde_json::to_string(&status).unwrap()),
        (Category::Forecast, serde_json::to_string(&forecast).unwrap()),
        (Category::ResourceAllocation, serde_json::to_string(&allocation).unwrap()),
        (Category::CoolingPlan, serde_json::to_string(&s.cooling_plan).unwrap()),
    ])
}
