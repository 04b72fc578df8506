//! Library for the rackwatch dashboard: telemetry collection, insights and role-gated navigation.

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod insights;
pub mod logging;
pub mod nav;
pub mod profiles;
pub mod refresh;
pub mod source;
pub mod synthetic;
pub mod types;
pub mod ui;

pub use context::{AppContext, Renderer};
pub use error::{DashError, Result};
pub use insights::{derive_insights, Insight, InsightCategory};
pub use nav::{NavOutcome, NavigationGuard, NavigationState, Role, View, ViewDetail};
pub use refresh::{CycleReport, RefreshCoordinator, RefreshPhase, RefreshTimer, RefreshTrigger};
pub use source::{HttpTransport, OfflineTransport, TelemetryAdapter, Transport};
pub use types::Snapshot;
