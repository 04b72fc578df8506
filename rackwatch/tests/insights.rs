//! Insight derivation rules, message formats and ordering.

mod common;

use common::{decision, quiet_snapshot, with_forecast};
use rackwatch::insights::{derive_insights, InsightCategory};
use rackwatch::types::{Action, CoolingLevel};

fn categories(s: &rackwatch::Snapshot) -> Vec<InsightCategory> {
    derive_insights(s).into_iter().map(|i| i.category).collect()
}

#[test]
fn quiet_fleet_reports_only_cooling_and_renewable() {
    let s = quiet_snapshot();
    assert_eq!(
        categories(&s),
        vec![InsightCategory::Cooling, InsightCategory::Renewable]
    );
}

#[test]
fn single_high_load_server_is_named_once() {
    let s = with_forecast(quiet_snapshot(), 3, 85.0, 50.0);
    let insights = derive_insights(&s);
    let high: Vec<_> = insights
        .iter()
        .filter(|i| i.category == InsightCategory::HighLoad)
        .collect();
    assert_eq!(high.len(), 1);
    assert_eq!(
        high[0].message,
        "Servers 3 are predicted to experience high load in the next hour. Resource allocation has been adjusted."
    );
}

#[test]
fn memory_alone_triggers_high_load_and_ids_keep_first_appearance_order() {
    let s = with_forecast(quiet_snapshot(), 2, 10.0, 90.0);
    let s = with_forecast(s, 1, 95.0, 10.0);
    let high = derive_insights(&s)
        .into_iter()
        .find(|i| i.category == InsightCategory::HighLoad)
        .expect("high load insight");
    assert!(high.message.starts_with("Servers 2, 1 are predicted"), "{}", high.message);
}

#[test]
fn thresholds_are_strict() {
    // Exactly 80 cpu / 85 memory is not high load; exactly 20 / 30 is not low utilization.
    let s = with_forecast(quiet_snapshot(), 1, 80.0, 85.0);
    let s = with_forecast(s, 2, 20.0, 29.0);
    let cats = categories(&s);
    assert!(!cats.contains(&InsightCategory::HighLoad));
    assert!(!cats.contains(&InsightCategory::LowUtilization));
}

#[test]
fn low_utilization_lists_underused_servers() {
    let s = with_forecast(quiet_snapshot(), 1, 10.0, 20.0);
    let s = with_forecast(s, 3, 15.0, 25.0);
    let low = derive_insights(&s)
        .into_iter()
        .find(|i| i.category == InsightCategory::LowUtilization)
        .expect("low utilization insight");
    assert_eq!(
        low.message,
        "Servers 1, 3 are underutilized. Consider hibernating these servers to save energy."
    );
}

#[test]
fn high_load_and_low_utilization_never_name_the_same_server() {
    for (cpu, mem) in [(85.0, 10.0), (10.0, 90.0), (5.0, 5.0), (99.0, 99.0), (19.0, 86.0)] {
        let s = with_forecast(quiet_snapshot(), 1, cpu, mem);
        let cats = categories(&s);
        assert!(
            !(cats.contains(&InsightCategory::HighLoad) && cats.contains(&InsightCategory::LowUtilization)),
            "cpu {cpu} mem {mem} produced both rules"
        );
    }
}

#[test]
fn only_one_hour_points_count() {
    let mut s = quiet_snapshot();
    for p in s.forecasts.iter_mut().filter(|p| p.time_offset == 2) {
        p.cpu_forecast = 99.0;
    }
    assert!(!categories(&s).contains(&InsightCategory::HighLoad));
}

#[test]
fn hibernation_savings_are_counted_and_summed() {
    let mut s = quiet_snapshot();
    s.allocation_decisions = vec![
        decision(1, Action::Hibernate, 5.0),
        decision(2, Action::NoAction, 0.0),
        decision(3, Action::Hibernate, 3.5),
    ];
    let savings = derive_insights(&s)
        .into_iter()
        .find(|i| i.category == InsightCategory::EnergySavings)
        .expect("energy savings insight");
    assert_eq!(
        savings.message,
        "Hibernating 2 servers can save approximately 8.50 kW of power."
    );
}

#[test]
fn migration_names_source_servers() {
    let mut s = quiet_snapshot();
    s.allocation_decisions = vec![
        decision(3, Action::MigrateWorkload, 0.3),
        decision(4, Action::Activate, -2.0),
    ];
    let m = derive_insights(&s)
        .into_iter()
        .find(|i| i.category == InsightCategory::Migration)
        .expect("migration insight");
    assert_eq!(
        m.message,
        "Migrating workloads from Server 3 will optimize resource usage and improve performance."
    );
}

#[test]
fn cooling_and_renewable_messages() {
    let mut s = quiet_snapshot();
    s.cooling_plan.cooling_level = CoolingLevel::High;
    s.cooling_plan.fan_speed_pct = 72.0;
    s.cooling_plan.ac_setpoint_c = 21.84;
    s.cooling_plan.expected_power_savings_kw = 1.44;
    s.energy.renewable_pct = 65.0;

    let insights = derive_insights(&s);
    let n = insights.len();
    assert_eq!(
        insights[n - 2].message,
        "Cooling system set to High (72% fan speed, 21.8°C). Expected power savings: 1.4 kW."
    );
    assert_eq!(
        insights[n - 1].message,
        "Currently 65% of power is from renewable sources. Great job!"
    );

    s.energy.renewable_pct = 50.0;
    let last = derive_insights(&s).pop().expect("renewable insight");
    assert!(last.message.ends_with("Consider scheduling intensive tasks during peak renewable generation."));
}

#[test]
fn renewable_share_is_reported_as_measured() {
    let mut s = quiet_snapshot();
    s.energy.renewable_pct = 50.4;
    let last = derive_insights(&s).pop().expect("renewable insight");
    assert_eq!(
        last.message,
        "Currently 50.4% of power is from renewable sources. Great job!"
    );

    s.energy.renewable_pct = 49.6;
    let last = derive_insights(&s).pop().expect("renewable insight");
    assert!(last.message.starts_with("Currently 49.6% of power"));
    assert!(!last.message.contains("Great job!"));
}

#[test]
fn rules_come_out_in_declaration_order() {
    let s = with_forecast(quiet_snapshot(), 1, 95.0, 10.0);
    let mut s = with_forecast(s, 2, 5.0, 5.0);
    s.allocation_decisions = vec![
        decision(2, Action::Hibernate, 5.0),
        decision(1, Action::MigrateWorkload, 0.3),
    ];
    let cats = categories(&s);
    assert_eq!(
        cats,
        vec![
            InsightCategory::HighLoad,
            InsightCategory::LowUtilization,
            InsightCategory::EnergySavings,
            InsightCategory::Migration,
            InsightCategory::Cooling,
            InsightCategory::Renewable,
        ]
    );
    let mut sorted = cats.clone();
    sorted.sort();
    assert_eq!(sorted, cats);
}

#[test]
fn derivation_is_pure() {
    let s = with_forecast(quiet_snapshot(), 2, 90.0, 90.0);
    let before = s.clone();
    let a = derive_insights(&s);
    let b = derive_insights(&s);
    assert_eq!(a, b);
    assert_eq!(s, before);
}
