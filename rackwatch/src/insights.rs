//! Rule-based insights derived from a snapshot.
//!
//! `derive_insights` is pure: the same snapshot always yields the same list, in
//! rule order. Rules 1-4 contribute nothing when they find no match; the cooling
//! and renewable rules always contribute exactly one insight.

use std::fmt::Write as _;

use crate::types::{Action, Snapshot};

pub const HIGH_LOAD_CPU: f64 = 80.0;
pub const HIGH_LOAD_MEMORY: f64 = 85.0;
pub const LOW_UTIL_CPU: f64 = 20.0;
pub const LOW_UTIL_MEMORY: f64 = 30.0;
pub const RENEWABLE_GOOD_PCT: f64 = 50.0;

/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InsightCategory {
    HighLoad,
    LowUtilization,
    EnergySavings,
    Migration,
    Cooling,
    Renewable,
}

impl InsightCategory {
    pub fn title(self) -> &'static str {
        match self {
            InsightCategory::HighLoad => "High Load Alert",
            InsightCategory::LowUtilization => "Low Utilization Detected",
            InsightCategory::EnergySavings => "Energy Savings Opportunity",
            InsightCategory::Migration => "Workload Migration Recommended",
            InsightCategory::Cooling => "Cooling Optimization",
            InsightCategory::Renewable => "Renewable Energy Usage",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            InsightCategory::HighLoad => "high-load",
            InsightCategory::LowUtilization => "low-utilization",
            InsightCategory::EnergySavings => "energy-savings",
            InsightCategory::Migration => "migration",
            InsightCategory::Cooling => "cooling",
            InsightCategory::Renewable => "renewable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub category: InsightCategory,
    pub message: String,
}

impl Insight {
    fn new(category: InsightCategory, message: String) -> Self {
        Self { category, message }
    }

    pub fn title(&self) -> &'static str {
        self.category.title()
    }
}

pub fn derive_insights(snapshot: &Snapshot) -> Vec<Insight> {
    let mut out = Vec::with_capacity(6);
    out.extend(high_load(snapshot));
    out.extend(low_utilization(snapshot));
    out.extend(energy_savings(snapshot));
    out.extend(migration(snapshot));
    out.push(cooling(snapshot));
    out.push(renewable(snapshot));
    out
}

pub fn is_high_load(cpu: f64, memory: f64) -> bool {
    cpu > HIGH_LOAD_CPU || memory > HIGH_LOAD_MEMORY
}

pub fn is_low_utilization(cpu: f64, memory: f64) -> bool {
    cpu < LOW_UTIL_CPU && memory < LOW_UTIL_MEMORY
}

fn join_ids<I: IntoIterator<Item = u32>>(ids: I) -> String {
    let mut s = String::new();
    for (i, id) in ids.into_iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        let _ = write!(s, "{id}");
    }
    s
}

fn next_hour_matching(snapshot: &Snapshot, pred: impl Fn(f64, f64) -> bool) -> Vec<u32> {
    snapshot
        .forecasts_at(1)
        .filter(|f| pred(f.cpu_forecast, f.memory_forecast))
        .map(|f| f.server_id)
        .collect()
}

fn high_load(snapshot: &Snapshot) -> Option<Insight> {
    let ids = next_hour_matching(snapshot, is_high_load);
    (!ids.is_empty()).then(|| {
        Insight::new(
            InsightCategory::HighLoad,
            format!(
                "Servers {} are predicted to experience high load in the next hour. \
                 Resource allocation has been adjusted.",
                join_ids(ids)
            ),
        )
    })
}

fn low_utilization(snapshot: &Snapshot) -> Option<Insight> {
    let ids = next_hour_matching(snapshot, is_low_utilization);
    (!ids.is_empty()).then(|| {
        Insight::new(
            InsightCategory::LowUtilization,
            format!(
                "Servers {} are underutilized. Consider hibernating these servers to save energy.",
                join_ids(ids)
            ),
        )
    })
}

fn energy_savings(snapshot: &Snapshot) -> Option<Insight> {
    let (count, total) = snapshot
        .allocation_decisions
        .iter()
        .filter(|d| d.action == Action::Hibernate)
        .fold((0usize, 0.0f64), |(n, kw), d| {
            (n + 1, kw + d.expected_energy_savings_kw)
        });
    (count > 0).then(|| {
        Insight::new(
            InsightCategory::EnergySavings,
            format!("Hibernating {count} servers can save approximately {total:.2} kW of power."),
        )
    })
}

fn migration(snapshot: &Snapshot) -> Option<Insight> {
    let ids: Vec<u32> = snapshot
        .allocation_decisions
        .iter()
        .filter(|d| d.action == Action::MigrateWorkload)
        .map(|d| d.server_id)
        .collect();
    (!ids.is_empty()).then(|| {
        Insight::new(
            InsightCategory::Migration,
            format!(
                "Migrating workloads from Server {} will optimize resource usage and improve performance.",
                join_ids(ids)
            ),
        )
    })
}

fn cooling(snapshot: &Snapshot) -> Insight {
    let plan = &snapshot.cooling_plan;
    Insight::new(
        InsightCategory::Cooling,
        format!(
            "Cooling system set to {} ({:.0}% fan speed, {:.1}°C). Expected power savings: {:.1} kW.",
            plan.cooling_level,
            plan.fan_speed_pct,
            plan.ac_setpoint_c,
            plan.expected_power_savings_kw
        ),
    )
}

fn renewable(snapshot: &Snapshot) -> Insight {
    let pct = snapshot.energy.renewable_pct;
    let tone = if pct > RENEWABLE_GOOD_PCT {
        "Great job!"
    } else {
        "Consider scheduling intensive tasks during peak renewable generation."
    };
    Insight::new(
        InsightCategory::Renewable,
        format!("Currently {pct}% of power is from renewable sources. {tone}"),
    )
}
