//! Six-hour workload forecast for the demo fleet.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

use super::round_to;
use crate::types::{Forecast, ForecastPoint};

pub const SERVERS: [u32; 4] = [1, 2, 3, 4];
pub const HORIZON_HOURS: u8 = 6;

fn pct(v: f64) -> f64 {
    round_to(v.clamp(0.0, 100.0), 1)
}

pub fn forecast<R: Rng>(rng: &mut R, timestamp: String) -> Result<Forecast, NormalError> {
    let base_cpu: Normal<f64> = Normal::new(50.0, 10.0)?;
    let base_memory: Normal<f64> = Normal::new(60.0, 15.0)?;
    let base_io: Normal<f64> = Normal::new(40.0, 20.0)?;
    let cpu_noise = Normal::new(0.0, 3.0)?;
    let memory_noise = Normal::new(0.0, 2.0)?;
    let io_noise = Normal::new(0.0, 4.0)?;

    let mut forecasts = Vec::with_capacity(SERVERS.len() * HORIZON_HOURS as usize);
    for server_id in SERVERS {
        let cpu = base_cpu.sample(rng).clamp(5.0, 95.0);
        let memory = base_memory.sample(rng).clamp(10.0, 90.0);
        let io = base_io.sample(rng).clamp(5.0, 85.0);

        for hour in 1..=HORIZON_HOURS {
            // Load peaks mid-horizon.
            let time_factor = (f64::from(hour) / 6.0 * PI).sin() * 10.0;
            forecasts.push(ForecastPoint {
                server_id,
                time_offset: hour,
                cpu_forecast: pct(cpu + time_factor + cpu_noise.sample(rng)),
                memory_forecast: pct(memory + time_factor * 0.5 + memory_noise.sample(rng)),
                io_forecast: pct(io + time_factor * 0.7 + io_noise.sample(rng)),
            });
        }
    }
    Ok(Forecast {
        forecasts,
        timestamp,
        forecast_horizon: format!("{HORIZON_HOURS} hours"),
    })
}
