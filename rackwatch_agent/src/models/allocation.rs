//! Allocation decisions from the one-hour forecast.

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

use super::round_to;
use crate::types::{Allocation, Decision, ForecastInput};

/// Workloads leaving this server are migrated instead of scaled up.
pub const MIGRATING_SERVER: u32 = 3;
pub const MIGRATION_TARGET: &str = "Server 5";

/// The action for one server's next-hour forecast.
pub fn action_for(server_id: u32, cpu: f64, memory: f64, io: f64) -> &'static str {
    if cpu > 80.0 || memory > 85.0 {
        if server_id == MIGRATING_SERVER {
            "migrate_workload"
        } else {
            "activate"
        }
    } else if cpu < 20.0 && memory < 30.0 && io < 15.0 {
        "hibernate"
    } else {
        "maintain"
    }
}

pub fn allocate<R: Rng>(
    rng: &mut R,
    input: &ForecastInput,
    timestamp: String,
) -> Result<Allocation, NormalError> {
    let cpu_savings = Normal::new(5.0, 2.0)?;
    let energy_savings = Normal::new(0.3, 0.1)?;
    let confidence: Normal<f64> = Normal::new(0.7, 0.1)?;

    let decisions = input
        .forecasts
        .iter()
        .filter(|f| f.time_offset == 1)
        .map(|f| {
            let action = action_for(f.server_id, f.cpu_forecast, f.memory_forecast, f.io_forecast);
            let saves = matches!(action, "hibernate" | "migrate_workload");
            let (cpu, energy) = if saves {
                (
                    round_to(cpu_savings.sample(rng), 1),
                    round_to(energy_savings.sample(rng), 2),
                )
            } else {
                (0.0, 0.0)
            };
            Decision {
                server_id: f.server_id,
                action: action.to_string(),
                target: (action == "migrate_workload").then(|| MIGRATION_TARGET.to_string()),
                expected_cpu_savings: cpu,
                expected_energy_savings: energy,
                confidence: round_to(confidence.sample(rng).clamp(0.0, 1.0), 2),
            }
        })
        .collect();

    Ok(Allocation {
        decisions,
        timestamp,
        optimization_goal: "energy_efficiency".into(),
    })
}
