//! Bounded per-cycle history buffers for the sparklines.

use std::collections::{BTreeMap, VecDeque};

use crate::types::Snapshot;

pub const DEFAULT_HISTORY_CAP: usize = 60;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

fn pct(v: f64) -> u64 {
    v.clamp(0.0, 100.0).round() as u64
}

/// One sample per published cycle, capped at `cap` samples per series.
#[derive(Debug)]
pub struct FleetHistory {
    pub fleet_cpu: VecDeque<u64>,
    pub renewable: VecDeque<u64>,
    // Keyed by server id; ids that drop out of the fleet keep their history.
    pub per_server_cpu: BTreeMap<u32, VecDeque<u64>>,
    cap: usize,
}

impl FleetHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            fleet_cpu: VecDeque::with_capacity(cap),
            renewable: VecDeque::with_capacity(cap),
            per_server_cpu: BTreeMap::new(),
            cap,
        }
    }

    pub fn record(&mut self, snapshot: &Snapshot) {
        if let Some((cpu, _, _)) = snapshot.averages() {
            push_capped(&mut self.fleet_cpu, pct(cpu), self.cap);
        }
        push_capped(&mut self.renewable, pct(snapshot.energy.renewable_pct), self.cap);
        for s in &snapshot.servers {
            let cap = self.cap;
            let dq = self
                .per_server_cpu
                .entry(s.id)
                .or_insert_with(|| VecDeque::with_capacity(cap));
            push_capped(dq, pct(s.cpu), cap);
        }
    }

    pub fn server(&self, id: u32) -> Option<&VecDeque<u64>> {
        self.per_server_cpu.get(&id)
    }

    pub fn len(&self) -> usize {
        self.renewable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renewable.is_empty()
    }
}

impl Default for FleetHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}
