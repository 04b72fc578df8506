//! Synthetic telemetry used when the backend is unavailable.
//!
//! Each generator draws fresh randomness on every call. Values stay inside the
//! documented ranges so a synthetic snapshot always passes `Snapshot::validate`.

use rand::Rng;

use crate::types::{
    Action, AllocationPlan, CoolingLevel, CoolingPlan, CoolingSettings, CoolingState, Decision,
    Energy, ForecastPoint, ForecastSet, PowerOptimization, Server, ServerStatus, Snapshot,
    SystemStatus, FORECAST_HORIZON_HOURS, RACK_CELLS, RACK_COLS, RACK_ROWS,
};

pub const SYNTHETIC_SERVERS: u32 = 5;
/// Server ids used when there is no live fleet to follow.
pub const SYNTHETIC_FLEET: [u32; SYNTHETIC_SERVERS as usize] = [1, 2, 3, 4, 5];

// Three in five servers come up active.
const STATUS_WEIGHTS: [ServerStatus; 5] = [
    ServerStatus::Active,
    ServerStatus::Active,
    ServerStatus::Active,
    ServerStatus::Hibernating,
    ServerStatus::Offline,
];
const LEVELS: [CoolingLevel; 3] = [CoolingLevel::Low, CoolingLevel::Medium, CoolingLevel::High];
const ACTIONS: [Action; 4] = [
    Action::Hibernate,
    Action::Activate,
    Action::MigrateWorkload,
    Action::NoAction,
];
const POWER_MODES: [PowerOptimization; 3] = [
    PowerOptimization::Performance,
    PowerOptimization::Balanced,
    PowerOptimization::Eco,
];

fn pick<R: Rng, T: Copy>(rng: &mut R, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let p = 10f64.powi(decimals);
    (v * p).round() / p
}

pub fn system_status<R: Rng>(rng: &mut R) -> SystemStatus {
    system_status_for(rng, &SYNTHETIC_FLEET)
}

pub fn system_status_for<R: Rng>(rng: &mut R, server_ids: &[u32]) -> SystemStatus {
    let servers = server_ids
        .iter()
        .map(|&id| Server {
            id,
            cpu: rng.random_range(30.0..90.0f64).floor(),
            memory: rng.random_range(20.0..90.0f64).floor(),
            io: rng.random_range(10.0..90.0f64).floor(),
            temperature: rng.random_range(35.0..50.0f64).floor(),
            status: pick(rng, &STATUS_WEIGHTS),
        })
        .collect();

    SystemStatus {
        servers,
        energy: Energy {
            current: round_to(rng.random_range(12.0..20.0f64), 1),
            saved: round_to(rng.random_range(3.0..8.0f64), 1),
            renewable_pct: rng.random_range(20.0..80.0f64).floor(),
        },
        cooling: CoolingState {
            level: pick(rng, &LEVELS),
            temperature_c: round_to(rng.random_range(20.0..25.0f64), 1),
            humidity_pct: rng.random_range(40.0..60.0f64).floor(),
        },
    }
}

pub fn forecast<R: Rng>(rng: &mut R) -> ForecastSet {
    forecast_for(rng, &SYNTHETIC_FLEET)
}

/// Six hourly points for each of `server_ids`.
pub fn forecast_for<R: Rng>(rng: &mut R, server_ids: &[u32]) -> ForecastSet {
    let horizon = f64::from(FORECAST_HORIZON_HOURS);
    let mut forecasts = Vec::with_capacity(server_ids.len() * usize::from(FORECAST_HORIZON_HOURS));

    for &server_id in server_ids {
        let base_cpu = rng.random_range(30.0..70.0f64);
        let base_memory = rng.random_range(40.0..70.0f64);
        let base_io = rng.random_range(20.0..60.0f64);

        for hour in 1..=FORECAST_HORIZON_HOURS {
            // Load drifts upward (cpu, memory) or downward (io) over the horizon.
            let trend = f64::from(hour) / horizon;
            let variation = rng.random_range(-10.0..10.0f64);
            forecasts.push(ForecastPoint {
                server_id,
                time_offset: hour,
                cpu_forecast: clamp_pct((base_cpu + (variation - 5.0) + trend * 20.0).floor()),
                memory_forecast: clamp_pct((base_memory + variation + trend * 15.0).floor()),
                io_forecast: clamp_pct((base_io + variation - trend * 10.0).floor()),
            });
        }
    }

    ForecastSet { forecasts }
}

fn clamp_pct(v: f64) -> f64 {
    v.clamp(5.0, 100.0)
}

pub fn allocation<R: Rng>(rng: &mut R) -> AllocationPlan {
    allocation_for(rng, &SYNTHETIC_FLEET)
}

pub fn allocation_for<R: Rng>(rng: &mut R, server_ids: &[u32]) -> AllocationPlan {
    let decisions = server_ids
        .iter()
        .map(|&server_id| {
            let action = pick(rng, &ACTIONS);
            let (cpu_savings, energy_savings) = match action {
                Action::Hibernate => (rng.random_range(80.0..100.0f64), rng.random_range(4.0..7.0f64)),
                Action::Activate => (
                    -rng.random_range(30.0..50.0f64),
                    -rng.random_range(2.0..4.0f64),
                ),
                Action::MigrateWorkload => {
                    (rng.random_range(20.0..50.0f64), rng.random_range(1.0..3.0f64))
                }
                Action::NoAction => (0.0, 0.0),
            };
            Decision {
                server_id,
                action,
                target: None,
                expected_cpu_savings: cpu_savings.floor(),
                expected_energy_savings_kw: round_to(energy_savings, 2),
                confidence: rng.random_range(0.7..1.0f64),
            }
        })
        .collect();

    AllocationPlan { decisions }
}

/// Temperatures for every rack cell; cells near the centre of the rack run hotter.
pub fn rack_temperatures<R: Rng>(rng: &mut R) -> Vec<f64> {
    (0..RACK_CELLS).map(|i| rack_cell_temperature(rng, i)).collect()
}

fn rack_cell_temperature<R: Rng>(rng: &mut R, index: usize) -> f64 {
    let row = index / RACK_COLS;
    let col = index % RACK_COLS;
    let distance = col.abs_diff(RACK_COLS / 2) + row.abs_diff(RACK_ROWS / 2);
    40.0 + rng.random_range(0.0..5.0f64) + (3.0 - distance as f64) * 2.0
}

/// Completes a partially populated rack layout, keeping the cells already present.
pub fn fill_rack_temperatures<R: Rng>(rng: &mut R, temps: &mut Vec<f64>) {
    temps.truncate(RACK_CELLS);
    for i in temps.len()..RACK_CELLS {
        temps.push(rack_cell_temperature(rng, i));
    }
}

pub fn cooling_plan<R: Rng>(rng: &mut R) -> CoolingPlan {
    let server_temperatures = rack_temperatures(rng);
    CoolingPlan {
        cooling_level: pick(rng, &LEVELS),
        fan_speed_pct: rng.random_range(50.0..90.0f64).floor(),
        ac_setpoint_c: rng.random_range(20.0..22.0f64),
        expected_power_savings_kw: round_to(rng.random_range(2.0..5.0f64), 1),
        server_temperatures,
        settings: CoolingSettings {
            fan_speed: rng.random_range(50.0..95.0f64).floor(),
            target_temp: round_to(rng.random_range(21.0..24.0f64), 1),
            humidity_level: rng.random_range(40.0..55.0f64).floor(),
            power_optimization: pick(rng, &POWER_MODES),
        },
    }
}

/// A complete snapshot built only from the generators above.
pub fn snapshot<R: Rng>(rng: &mut R) -> Snapshot {
    Snapshot::assemble(
        system_status(rng),
        forecast(rng),
        allocation(rng),
        cooling_plan(rng),
    )
}
