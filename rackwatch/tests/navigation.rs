//! Role-gated navigation: permissions, rejection, handler re-runs and role switching.

mod common;

use common::quiet_snapshot;
use rackwatch::nav::{NavOutcome, NavigationGuard, Role, View, ViewDetail};
use rackwatch::types::{RACK_COLS, RACK_ROWS};

#[test]
fn starts_on_dashboard() {
    let g = NavigationGuard::new(Role::Viewer);
    let st = g.state();
    assert_eq!(st.active_view, View::Dashboard);
    assert!(!st.rejected);
    assert_eq!(st.requested, None);
}

#[test]
fn permission_table() {
    use Role::*;
    let expect = [
        (View::Dashboard, [true, true, true]),
        (View::Workload, [true, true, false]),
        (View::Resource, [true, false, false]),
        (View::Cooling, [true, true, false]),
    ];
    for (view, allowed) in expect {
        for (role, ok) in [Admin, Operator, Viewer].into_iter().zip(allowed) {
            assert_eq!(view.permits(role), ok, "{} for {role}", view.id());
        }
    }
}

#[test]
fn viewer_rejected_from_admin_view_then_cleared() {
    let snap = quiet_snapshot();
    let mut g = NavigationGuard::new(Role::Viewer);

    let out = g.navigate("resource", Role::Viewer, Some(&snap));
    assert_eq!(
        out,
        NavOutcome::Rejected {
            requested: "resource".into(),
            active: View::Dashboard
        }
    );
    assert!(g.state().rejected);
    assert_eq!(g.state().active_view, View::Dashboard);
    assert_eq!(g.state().requested.as_deref(), Some("resource"));

    let out = g.navigate("dashboard", Role::Viewer, Some(&snap));
    assert!(!out.is_rejected());
    assert!(!g.state().rejected);
}

#[test]
fn unknown_view_is_rejected_and_keeps_active_view() {
    let mut g = NavigationGuard::new(Role::Admin);
    g.navigate("cooling", Role::Admin, None);
    let out = g.navigate("models", Role::Admin, None);
    assert!(out.is_rejected());
    assert_eq!(g.state().active_view, View::Cooling);
}

#[test]
fn renavigating_reruns_the_handler() {
    let snap = quiet_snapshot();
    let mut g = NavigationGuard::new(Role::Operator);
    let first = g.navigate("workload", Role::Operator, Some(&snap));
    let second = g.navigate("workload", Role::Operator, Some(&snap));
    assert_eq!(g.handler_runs(), 2);
    assert_eq!(first, second);
}

#[test]
fn rejected_navigation_runs_no_handler() {
    let snap = quiet_snapshot();
    let mut g = NavigationGuard::new(Role::Viewer);
    g.navigate("cooling", Role::Viewer, Some(&snap));
    assert_eq!(g.handler_runs(), 0);
}

#[test]
fn workload_detail_groups_points_per_server() {
    let snap = quiet_snapshot();
    let mut g = NavigationGuard::new(Role::Admin);
    let NavOutcome::Activated { detail: Some(ViewDetail::Workload { series }), .. } =
        g.navigate("workload", Role::Admin, Some(&snap))
    else {
        panic!("expected workload detail");
    };
    assert_eq!(series.len(), 3);
    for s in &series {
        assert_eq!(s.cpu.len(), 6);
        assert_eq!(s.memory.len(), 6);
        assert_eq!(s.io.len(), 6);
    }
    assert_eq!(series.iter().map(|s| s.server_id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn resource_detail_totals_decisions() {
    let mut snap = quiet_snapshot();
    snap.allocation_decisions[0].expected_energy_savings_kw = 1.25;
    snap.allocation_decisions[1].expected_energy_savings_kw = -0.25;
    snap.allocation_decisions[2].expected_cpu_savings = 12.0;
    let mut g = NavigationGuard::new(Role::Admin);
    match g.navigate("resource", Role::Admin, Some(&snap)) {
        NavOutcome::Activated {
            detail:
                Some(ViewDetail::Resource {
                    rows,
                    total_cpu_savings,
                    total_energy_savings_kw,
                }),
            ..
        } => {
            assert_eq!(rows.len(), 3);
            assert!((total_energy_savings_kw - 1.0).abs() < 1e-9);
            assert!((total_cpu_savings - 12.0).abs() < 1e-9);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn cooling_detail_is_a_row_major_grid() {
    let snap = quiet_snapshot();
    let mut g = NavigationGuard::new(Role::Operator);
    let NavOutcome::Activated { detail: Some(ViewDetail::Cooling { heatmap, settings }), .. } =
        g.navigate("cooling", Role::Operator, Some(&snap))
    else {
        panic!("expected cooling detail");
    };
    assert_eq!(heatmap.len(), RACK_ROWS);
    assert!(heatmap.iter().all(|r| r.len() == RACK_COLS));
    // Second row starts right after the first row's last cell.
    assert_eq!(heatmap[1][0], snap.cooling_plan.server_temperatures[RACK_COLS]);
    assert_eq!(settings, snap.cooling_plan.settings);
}

#[test]
fn set_role_reevaluates_active_view() {
    let snap = quiet_snapshot();
    let mut g = NavigationGuard::new(Role::Admin);
    g.navigate("resource", Role::Admin, Some(&snap));

    let out = g.set_role(Role::Operator, Some(&snap));
    assert!(out.is_rejected());
    assert_eq!(g.state().role, Role::Operator);
    assert_eq!(g.state().active_view, View::Resource);

    let out = g.back_to_dashboard(Some(&snap));
    assert_eq!(
        out,
        NavOutcome::Activated {
            view: View::Dashboard,
            detail: Some(ViewDetail::Overview)
        }
    );
    assert!(!g.state().rejected);
}

#[test]
fn role_parsing() {
    assert_eq!("Operator".parse::<Role>(), Ok(Role::Operator));
    assert_eq!(" viewer ".parse::<Role>(), Ok(Role::Viewer));
    assert!("root".parse::<Role>().is_err());
    assert_eq!(Role::Viewer.cycle(), Role::Admin);
}
