//! AppContext publishing, navigation wiring and notifications.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rackwatch::context::{NotificationLevel, Notifications};
use rackwatch::insights::Insight;
use rackwatch::nav::{NavigationState, Role, View, ViewDetail};
use rackwatch::refresh::{CycleReport, Origins, RefreshPhase, RefreshTrigger};
use rackwatch::types::Origin;
use rackwatch::{derive_insights, AppContext, Renderer, Snapshot};

#[derive(Default)]
struct Recorder {
    snapshots: Vec<Snapshot>,
    navigations: Vec<(NavigationState, Option<ViewDetail>)>,
}

impl Renderer for Recorder {
    fn render(&mut self, snapshot: &Snapshot, _insights: &[Insight]) {
        self.snapshots.push(snapshot.clone());
    }

    fn render_navigation(&mut self, state: &NavigationState, detail: Option<&ViewDetail>) {
        self.navigations.push((state.clone(), detail.cloned()));
    }
}

fn report(snapshot: Snapshot, phase: RefreshPhase, failure: Option<&str>) -> CycleReport {
    CycleReport {
        trigger: RefreshTrigger::Manual,
        phase,
        insights: derive_insights(&snapshot),
        snapshot: Arc::new(snapshot),
        origins: Origins::all(Origin::Live),
        failure: failure.map(str::to_string),
        elapsed: Duration::from_millis(12),
    }
}

#[test]
fn publish_swaps_snapshot_and_renders() {
    let mut ctx = AppContext::new(Role::Admin, Duration::from_secs(5));
    let mut r = Recorder::default();
    assert!(ctx.snapshot().is_none());

    let first = common::quiet_snapshot();
    ctx.publish(report(first.clone(), RefreshPhase::Success, None), &mut r);
    assert_eq!(ctx.snapshot().map(|s| s.servers.clone()), Some(first.servers.clone()));
    assert_eq!(ctx.insights().len(), 2);
    assert_eq!(r.snapshots.len(), 1);
    assert_eq!(r.navigations.len(), 1);
    assert_eq!(ctx.detail(), Some(&ViewDetail::Overview));
    assert!(ctx.notifications().is_empty());

    let second = common::with_forecast(first, 1, 95.0, 10.0);
    ctx.publish(report(second.clone(), RefreshPhase::Success, None), &mut r);
    assert_eq!(ctx.snapshot().map(|s| s.forecasts.clone()), Some(second.forecasts));
    assert_eq!(ctx.insights().len(), 3);
    assert_eq!(ctx.last_cycle().map(|c| c.phase), Some(RefreshPhase::Success));
}

#[test]
fn degraded_cycle_raises_an_error_notification() {
    let mut ctx = AppContext::new(Role::Operator, Duration::from_secs(5));
    let mut r = Recorder::default();
    ctx.publish(
        report(
            common::quiet_snapshot(),
            RefreshPhase::Degraded,
            Some("refresh cycle failed: data collection panicked: boom"),
        ),
        &mut r,
    );
    let notes = ctx.notifications().active();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert!(notes[0].message.contains("panicked"));
    // The fallback snapshot is still shown.
    assert_eq!(r.snapshots.len(), 1);
}

#[test]
fn active_view_detail_follows_new_snapshots() {
    let mut ctx = AppContext::new(Role::Admin, Duration::from_secs(5));
    let mut r = Recorder::default();
    ctx.publish(report(common::quiet_snapshot(), RefreshPhase::Success, None), &mut r);

    let out = ctx.navigate("resource", &mut r);
    assert!(!out.is_rejected());
    let runs = ctx.guard().handler_runs();

    let mut next = common::quiet_snapshot();
    next.allocation_decisions[0].expected_energy_savings_kw = 2.5;
    ctx.publish(report(next, RefreshPhase::Success, None), &mut r);
    assert_eq!(ctx.guard().handler_runs(), runs + 1);
    match ctx.detail() {
        Some(ViewDetail::Resource {
            total_energy_savings_kw,
            ..
        }) => assert!((total_energy_savings_kw - 2.5).abs() < 1e-9),
        other => panic!("unexpected detail {other:?}"),
    }
}

#[test]
fn rejected_view_is_not_refreshed_and_shows_no_detail() {
    let mut ctx = AppContext::new(Role::Viewer, Duration::from_secs(5));
    let mut r = Recorder::default();
    ctx.publish(report(common::quiet_snapshot(), RefreshPhase::Success, None), &mut r);

    assert!(ctx.navigate("cooling", &mut r).is_rejected());
    assert!(ctx.detail().is_none());
    let (state, detail) = r.navigations.last().cloned().unwrap();
    assert!(state.rejected);
    assert_eq!(state.requested.as_deref(), Some("cooling"));
    assert!(detail.is_none());

    let runs = ctx.guard().handler_runs();
    ctx.publish(report(common::quiet_snapshot(), RefreshPhase::Success, None), &mut r);
    assert_eq!(ctx.guard().handler_runs(), runs);
    assert!(ctx.navigation().rejected);

    ctx.back_to_dashboard(&mut r);
    assert!(!ctx.navigation().rejected);
    assert_eq!(ctx.navigation().active_view, View::Dashboard);
}

#[test]
fn view_chosen_before_first_data_is_built_on_publish() {
    let mut ctx = AppContext::new(Role::Operator, Duration::from_secs(5));
    let mut r = Recorder::default();

    let out = ctx.navigate("workload", &mut r);
    assert!(!out.is_rejected());
    assert_eq!(ctx.navigation().active_view, View::Workload);
    assert!(ctx.detail().is_none());
    assert_eq!(ctx.guard().handler_runs(), 0);

    ctx.publish(report(common::quiet_snapshot(), RefreshPhase::Success, None), &mut r);
    assert_eq!(ctx.guard().handler_runs(), 1);
    match ctx.detail() {
        Some(ViewDetail::Workload { series }) => assert!(!series.is_empty()),
        other => panic!("unexpected detail {other:?}"),
    }
    let (state, detail) = r.navigations.last().cloned().unwrap();
    assert_eq!(state.active_view, View::Workload);
    assert!(matches!(detail, Some(ViewDetail::Workload { .. })));
}

#[test]
fn role_switch_notifies_and_reevaluates() {
    let mut ctx = AppContext::new(Role::Operator, Duration::from_secs(5));
    let mut r = Recorder::default();
    ctx.navigate("workload", &mut r);
    assert!(ctx.detail().is_none(), "no snapshot yet, no detail");

    let out = ctx.set_role(Role::Viewer, &mut r);
    assert!(out.is_rejected());
    let notes = ctx.notifications().active();
    assert_eq!(notes.last().map(|n| n.message.as_str()), Some("Role switched to viewer"));
    assert_eq!(notes.last().map(|n| n.level), Some(NotificationLevel::Info));
}

#[test]
fn notifications_expire_after_ttl() {
    let mut n = Notifications::new(Duration::from_secs(5));
    let t0 = Instant::now();
    n.push_at(NotificationLevel::Info, "first", t0);
    n.push_at(NotificationLevel::Error, "second", t0 + Duration::from_secs(3));

    assert_eq!(n.expire(t0 + Duration::from_secs(4)), 0);
    assert_eq!(n.expire(t0 + Duration::from_secs(5)), 1);
    assert_eq!(n.active().len(), 1);
    assert_eq!(n.active()[0].message, "second");
    assert_eq!(n.expire(t0 + Duration::from_secs(8)), 1);
    assert!(n.is_empty());
}

#[test]
fn notifications_can_be_dismissed() {
    let mut n = Notifications::new(Duration::from_secs(5));
    let a = n.push(NotificationLevel::Info, "a");
    let b = n.push(NotificationLevel::Info, "b");
    assert_ne!(a, b);
    assert!(n.dismiss(a));
    assert!(!n.dismiss(a));
    assert!(n.dismiss_latest());
    assert!(!n.dismiss_latest());
    assert!(n.is_empty());
}
