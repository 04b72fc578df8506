//! The fixed demo fleet reported by the status endpoint.

use crate::types::{CoolingReading, Energy, Server, SystemStatus};

fn server(id: u32, status: &str, cpu: f64, memory: f64, io: f64, temperature: f64) -> Server {
    Server {
        id,
        status: status.to_string(),
        cpu,
        memory,
        io,
        temperature,
    }
}

pub fn system_status(timestamp: String) -> SystemStatus {
    SystemStatus {
        servers: vec![
            server(1, "active", 78.0, 65.0, 45.0, 42.0),
            server(2, "active", 45.0, 80.0, 30.0, 38.0),
            server(3, "hibernating", 5.0, 10.0, 2.0, 25.0),
            server(4, "active", 90.0, 75.0, 60.0, 48.0),
        ],
        energy: Energy {
            current: 4.2,
            saved: 1.8,
            renewable: 65.0,
        },
        cooling: CoolingReading {
            level: "medium".into(),
            temperature: 22.0,
            humidity: 45.0,
        },
        timestamp,
    }
}
