//! Refresh cycle: collect every category, assemble a snapshot, derive insights.
//!
//! At most one cycle is in flight per coordinator. Triggers that arrive while a
//! cycle is running are dropped, not queued.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::error::DashError;
use crate::insights::{derive_insights, Insight};
use crate::source::{Fetched, TelemetryAdapter, Transport};
use crate::synthetic;
use crate::types::{Category, ForecastSet, Origin, Snapshot, SystemStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RefreshPhase {
    Idle = 0,
    Refreshing = 1,
    Success = 2,
    Degraded = 3,
}

impl RefreshPhase {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => RefreshPhase::Refreshing,
            2 => RefreshPhase::Success,
            3 => RefreshPhase::Degraded,
            _ => RefreshPhase::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Initial,
    Interval,
    Manual,
}

/// Per-category origin for one cycle, in `Category::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origins([Origin; 4]);

impl Origins {
    pub fn all(origin: Origin) -> Self {
        Origins([origin; 4])
    }

    pub fn get(&self, category: Category) -> Origin {
        self.0[category as usize]
    }

    fn set(&mut self, category: Category, origin: Origin) {
        self.0[category as usize] = origin;
    }

    pub fn any_synthetic(&self) -> bool {
        self.0.contains(&Origin::Synthetic)
    }

    pub fn live_count(&self) -> usize {
        self.0.iter().filter(|o| **o == Origin::Live).count()
    }
}

/// Outcome of one completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub trigger: RefreshTrigger,
    pub phase: RefreshPhase,
    pub snapshot: Arc<Snapshot>,
    pub insights: Vec<Insight>,
    pub origins: Origins,
    /// Set when the cycle degraded; shown to the user.
    pub failure: Option<String>,
    pub elapsed: Duration,
}

pub struct RefreshCoordinator<T> {
    adapter: Arc<TelemetryAdapter<T>>,
    phase: Arc<AtomicU8>,
}

impl<T> Clone for RefreshCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            adapter: Arc::clone(&self.adapter),
            phase: Arc::clone(&self.phase),
        }
    }
}

impl<T: Transport> RefreshCoordinator<T> {
    pub fn new(adapter: TelemetryAdapter<T>) -> Self {
        Self {
            adapter: Arc::new(adapter),
            phase: Arc::new(AtomicU8::new(RefreshPhase::Idle as u8)),
        }
    }

    pub fn adapter(&self) -> &TelemetryAdapter<T> {
        &self.adapter
    }

    pub fn phase(&self) -> RefreshPhase {
        RefreshPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Runs one cycle, or returns None if another cycle is already in flight.
    pub async fn run_cycle(&self, trigger: RefreshTrigger) -> Option<CycleReport> {
        let refreshing = RefreshPhase::Refreshing as u8;
        if self
            .phase
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| {
                (p != refreshing).then_some(refreshing)
            })
            .is_err()
        {
            debug!(?trigger, "refresh already in flight, trigger ignored");
            return None;
        }

        let started = Instant::now();
        let in_flight = InFlight {
            phase: &self.phase,
            finished: false,
        };
        let guarded = AssertUnwindSafe(async {
            let (snapshot, origins) = collect(&self.adapter).await;
            snapshot
                .validate()
                .map_err(|e| DashError::Cycle(format!("assembled snapshot invalid: {e}")))?;
            let insights = derive_insights(&snapshot);
            Ok::<_, DashError>((snapshot, insights, origins))
        })
        .catch_unwind()
        .await;

        let outcome = match guarded {
            Ok(result) => result,
            Err(panic) => Err(DashError::Cycle(panic_message(panic.as_ref()))),
        };

        let (phase, snapshot, insights, origins, failure) = match outcome {
            Ok((snapshot, insights, origins)) => {
                (RefreshPhase::Success, snapshot, insights, origins, None)
            }
            Err(e) => {
                error!(error = %e, "refresh cycle failed, publishing synthetic snapshot");
                let snapshot = synthetic::snapshot(&mut rand::rng());
                let insights = derive_insights(&snapshot);
                (
                    RefreshPhase::Degraded,
                    snapshot,
                    insights,
                    Origins::all(Origin::Synthetic),
                    Some(e.to_string()),
                )
            }
        };

        let elapsed = started.elapsed();
        in_flight.finish(phase);
        info!(
            ?trigger,
            ?phase,
            live = origins.live_count(),
            insights = insights.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "refresh cycle complete"
        );

        Some(CycleReport {
            trigger,
            phase,
            snapshot: Arc::new(snapshot),
            insights,
            origins,
            failure,
            elapsed,
        })
    }
}

/// Holds the coordinator in `Refreshing`. Dropped without `finish` (cycle future
/// cancelled, or a panic on the fallback path) it goes back to `Idle`.
struct InFlight<'a> {
    phase: &'a AtomicU8,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(mut self, phase: RefreshPhase) {
        self.phase.store(phase as u8, Ordering::Release);
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("refresh cycle abandoned, coordinator back to idle");
            self.phase.store(RefreshPhase::Idle as u8, Ordering::Release);
        }
    }
}

async fn collect<T: Transport>(adapter: &TelemetryAdapter<T>) -> (Snapshot, Origins) {
    let mut status = adapter.system_status().await;
    let mut forecast = adapter.forecast().await;
    align_fleet(&mut status, &mut forecast);
    let (allocation, cooling) = tokio::join!(
        adapter.resource_allocation(&forecast.data),
        adapter.cooling_plan(&status.data),
    );

    let mut origins = Origins::all(Origin::Live);
    origins.set(Category::SystemStatus, status.origin);
    origins.set(Category::Forecast, forecast.origin);
    origins.set(Category::ResourceAllocation, allocation.origin);
    origins.set(Category::CoolingPlan, cooling.origin);

    let snapshot = Snapshot::assemble(status.data, forecast.data, allocation.data, cooling.data);
    (snapshot, origins)
}

/// Regenerates a synthetic status or forecast so it covers the servers of its
/// live counterpart. Two live payloads that disagree are left for validation.
fn align_fleet(status: &mut Fetched<SystemStatus>, forecast: &mut Fetched<ForecastSet>) {
    let server_ids = status.data.server_ids();
    let forecast_ids = forecast.data.server_ids();
    if same_fleet(&server_ids, &forecast_ids) {
        return;
    }
    match (status.origin, forecast.origin) {
        (_, Origin::Synthetic) => {
            debug!(?server_ids, "synthetic forecast follows the live fleet");
            forecast.data = synthetic::forecast_for(&mut rand::rng(), &server_ids);
        }
        (Origin::Synthetic, Origin::Live) => {
            debug!(?forecast_ids, "synthetic status follows the live forecast");
            status.data = synthetic::system_status_for(&mut rand::rng(), &forecast_ids);
        }
        (Origin::Live, Origin::Live) => {
            warn!(?server_ids, ?forecast_ids, "live status and forecast disagree on the fleet");
        }
    }
}

fn same_fleet(a: &[u32], b: &[u32]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    a.dedup();
    b.sort_unstable();
    a == b
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("data collection panicked: {detail}")
}

/// Background task that emits `RefreshTrigger::Interval` every period.
pub struct RefreshTimer {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    /// First tick fires one period after spawning; the initial load is the caller's job.
    pub fn spawn(period: Duration, tx: mpsc::Sender<RefreshTrigger>) -> Self {
        let (stop, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if tx.send(RefreshTrigger::Interval).await.is_err() {
                            break;
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("refresh timer stopped");
        });
        Self { stop, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}
