//! Role-gated navigation between dashboard views.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::types::{Action, CoolingSettings, Decision, Snapshot, FORECAST_HORIZON_HOURS, RACK_COLS, RACK_ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Operator,
    Viewer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Viewer => "viewer",
        }
    }

    /// Next role in admin -> operator -> viewer -> admin order.
    pub fn cycle(self) -> Role {
        match self {
            Role::Admin => Role::Operator,
            Role::Operator => Role::Viewer,
            Role::Viewer => Role::Admin,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "operator" => Ok(Role::Operator),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("unknown role '{other}' (expected admin, operator or viewer)")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Workload,
    Resource,
    Cooling,
}

impl View {
    pub const ALL: [View; 4] = [View::Dashboard, View::Workload, View::Resource, View::Cooling];

    pub fn id(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Workload => "workload",
            View::Resource => "resource",
            View::Cooling => "cooling",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Workload => "Workload Forecast",
            View::Resource => "Resource Allocation",
            View::Cooling => "Cooling",
        }
    }

    pub fn from_id(id: &str) -> Option<View> {
        View::ALL.into_iter().find(|v| v.id() == id)
    }

    pub fn permissions(self) -> &'static [Role] {
        match self {
            View::Dashboard => &[Role::Admin, Role::Operator, Role::Viewer],
            View::Workload => &[Role::Admin, Role::Operator],
            View::Resource => &[Role::Admin],
            View::Cooling => &[Role::Admin, Role::Operator],
        }
    }

    pub fn permits(self, role: Role) -> bool {
        self.permissions().contains(&role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub active_view: View,
    pub role: Role,
    pub rejected: bool,
    pub requested: Option<String>,
}

impl NavigationState {
    pub fn new(role: Role) -> Self {
        Self {
            active_view: View::Dashboard,
            role,
            rejected: false,
            requested: None,
        }
    }
}

/// One server's forecast over the horizon, indexed by offset - 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub server_id: u32,
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
    pub io: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub server_id: u32,
    pub action: Action,
    pub target: Option<String>,
    pub cpu_savings: f64,
    pub energy_savings_kw: f64,
    pub confidence: f64,
}

impl From<&Decision> for DecisionRow {
    fn from(d: &Decision) -> Self {
        Self {
            server_id: d.server_id,
            action: d.action,
            target: d.target.clone(),
            cpu_savings: d.expected_cpu_savings,
            energy_savings_kw: d.expected_energy_savings_kw,
            confidence: d.confidence,
        }
    }
}

/// View-model produced by a view's refresh handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewDetail {
    Overview,
    Workload {
        series: Vec<ForecastSeries>,
    },
    Resource {
        rows: Vec<DecisionRow>,
        total_cpu_savings: f64,
        total_energy_savings_kw: f64,
    },
    Cooling {
        /// RACK_ROWS rows of RACK_COLS temperatures.
        heatmap: Vec<Vec<f64>>,
        settings: CoolingSettings,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    Activated {
        view: View,
        detail: Option<ViewDetail>,
    },
    Rejected {
        requested: String,
        active: View,
    },
}

impl NavOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, NavOutcome::Rejected { .. })
    }
}

/// Owns the navigation state; the only place it changes.
#[derive(Debug)]
pub struct NavigationGuard {
    state: NavigationState,
    handler_runs: u64,
}

impl NavigationGuard {
    pub fn new(role: Role) -> Self {
        Self {
            state: NavigationState::new(role),
            handler_runs: 0,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// How many times a view refresh handler has run.
    pub fn handler_runs(&self) -> u64 {
        self.handler_runs
    }

    /// Activates `view_id` if `role` may see it. Without a snapshot yet the view
    /// is only recorded; its handler first runs from `refresh_active` when data
    /// is published.
    pub fn navigate(&mut self, view_id: &str, role: Role, snapshot: Option<&Snapshot>) -> NavOutcome {
        self.state.role = role;
        self.state.requested = Some(view_id.to_string());

        let view = match View::from_id(view_id) {
            Some(v) if v.permits(role) => v,
            found => {
                self.state.rejected = true;
                if found.is_none() {
                    debug!(view = view_id, "navigation to unknown view rejected");
                } else {
                    info!(view = view_id, role = %role, "navigation denied");
                }
                return NavOutcome::Rejected {
                    requested: view_id.to_string(),
                    active: self.state.active_view,
                };
            }
        };

        self.state.active_view = view;
        self.state.rejected = false;
        let detail = snapshot.map(|s| self.run_handler(view, s));
        NavOutcome::Activated { view, detail }
    }

    /// Replaces the role and re-evaluates the active view under it.
    pub fn set_role(&mut self, role: Role, snapshot: Option<&Snapshot>) -> NavOutcome {
        let active = self.state.active_view.id();
        self.navigate(active, role, snapshot)
    }

    /// Leaves a rejected state by returning to the dashboard.
    pub fn back_to_dashboard(&mut self, snapshot: Option<&Snapshot>) -> NavOutcome {
        let role = self.state.role;
        self.navigate(View::Dashboard.id(), role, snapshot)
    }

    /// Rebuilds the active view's detail against a new snapshot.
    pub fn refresh_active(&mut self, snapshot: &Snapshot) -> Option<ViewDetail> {
        if self.state.rejected {
            return None;
        }
        Some(self.run_handler(self.state.active_view, snapshot))
    }

    fn run_handler(&mut self, view: View, snapshot: &Snapshot) -> ViewDetail {
        self.handler_runs += 1;
        match view {
            View::Dashboard => ViewDetail::Overview,
            View::Workload => ViewDetail::Workload {
                series: forecast_series(snapshot),
            },
            View::Resource => resource_detail(snapshot),
            View::Cooling => ViewDetail::Cooling {
                heatmap: heatmap(snapshot),
                settings: snapshot.cooling_plan.settings.clone(),
            },
        }
    }
}

fn forecast_series(snapshot: &Snapshot) -> Vec<ForecastSeries> {
    let mut series: Vec<ForecastSeries> = Vec::new();
    for p in &snapshot.forecasts {
        let idx = match series.iter().position(|s| s.server_id == p.server_id) {
            Some(i) => i,
            None => {
                let cap = usize::from(FORECAST_HORIZON_HOURS);
                series.push(ForecastSeries {
                    server_id: p.server_id,
                    cpu: Vec::with_capacity(cap),
                    memory: Vec::with_capacity(cap),
                    io: Vec::with_capacity(cap),
                });
                series.len() - 1
            }
        };
        let s = &mut series[idx];
        s.cpu.push(p.cpu_forecast);
        s.memory.push(p.memory_forecast);
        s.io.push(p.io_forecast);
    }
    series
}

fn resource_detail(snapshot: &Snapshot) -> ViewDetail {
    let rows: Vec<DecisionRow> = snapshot.allocation_decisions.iter().map(DecisionRow::from).collect();
    let total_cpu_savings = rows.iter().map(|r| r.cpu_savings).sum();
    let total_energy_savings_kw = rows.iter().map(|r| r.energy_savings_kw).sum();
    ViewDetail::Resource {
        rows,
        total_cpu_savings,
        total_energy_savings_kw,
    }
}

fn heatmap(snapshot: &Snapshot) -> Vec<Vec<f64>> {
    (0..RACK_ROWS)
        .map(|row| {
            (0..RACK_COLS)
                .map(|col| snapshot.cooling_plan.rack_temperature(row, col).unwrap_or(0.0))
                .collect()
        })
        .collect()
}
