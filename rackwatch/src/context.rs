//! Application context: the published snapshot, navigation and notifications.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::insights::Insight;
use crate::nav::{NavOutcome, NavigationGuard, NavigationState, Role, ViewDetail};
use crate::refresh::{CycleReport, Origins, RefreshPhase, RefreshTrigger};
use crate::types::Snapshot;

/// Receives structured view-models; knows nothing about where they came from.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot, insights: &[Insight]);
    fn render_navigation(&mut self, state: &NavigationState, detail: Option<&ViewDetail>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: Instant,
}

/// Dismissible messages that drop out on their own after `ttl`.
#[derive(Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    ttl: Duration,
    next_id: u64,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
            next_id: 1,
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        self.push_at(level, message, Instant::now())
    }

    pub fn push_at(&mut self, level: NotificationLevel, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            level,
            message: message.into(),
            raised_at: now,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Dismisses the newest notification, if any.
    pub fn dismiss_latest(&mut self) -> bool {
        self.items.pop().is_some()
    }

    /// Drops notifications older than the ttl; returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items
            .retain(|n| now.saturating_duration_since(n.raised_at) < ttl);
        before - self.items.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What the last published cycle looked like, for the status line.
#[derive(Debug, Clone, Copy)]
pub struct CycleSummary {
    pub trigger: RefreshTrigger,
    pub phase: RefreshPhase,
    pub origins: Origins,
    pub captured_at: DateTime<Local>,
    pub elapsed: Duration,
}

pub struct AppContext {
    snapshot: Option<Arc<Snapshot>>,
    insights: Vec<Insight>,
    guard: NavigationGuard,
    detail: Option<ViewDetail>,
    notifications: Notifications,
    last_cycle: Option<CycleSummary>,
}

impl AppContext {
    pub fn new(role: Role, notification_ttl: Duration) -> Self {
        Self {
            snapshot: None,
            insights: Vec::new(),
            guard: NavigationGuard::new(role),
            detail: None,
            notifications: Notifications::new(notification_ttl),
            last_cycle: None,
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.snapshot.as_ref()
    }

    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    pub fn navigation(&self) -> &NavigationState {
        self.guard.state()
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn detail(&self) -> Option<&ViewDetail> {
        self.detail.as_ref()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn last_cycle(&self) -> Option<&CycleSummary> {
        self.last_cycle.as_ref()
    }

    /// Swaps in a cycle's snapshot and insights, then re-renders.
    pub fn publish<R: Renderer + ?Sized>(&mut self, report: CycleReport, renderer: &mut R) {
        if let Some(msg) = &report.failure {
            self.notifications.push(NotificationLevel::Error, msg.clone());
        }
        self.last_cycle = Some(CycleSummary {
            trigger: report.trigger,
            phase: report.phase,
            origins: report.origins,
            captured_at: report.snapshot.captured_at,
            elapsed: report.elapsed,
        });
        self.snapshot = Some(report.snapshot);
        self.insights = report.insights;

        if let Some(snapshot) = &self.snapshot {
            self.detail = self.guard.refresh_active(snapshot);
            renderer.render(snapshot, &self.insights);
        }
        renderer.render_navigation(self.guard.state(), self.detail.as_ref());
    }

    pub fn navigate<R: Renderer + ?Sized>(&mut self, view_id: &str, renderer: &mut R) -> NavOutcome {
        let role = self.guard.state().role;
        let outcome = self.guard.navigate(view_id, role, self.snapshot.as_deref());
        self.apply(outcome, renderer)
    }

    pub fn set_role<R: Renderer + ?Sized>(&mut self, role: Role, renderer: &mut R) -> NavOutcome {
        let outcome = self.guard.set_role(role, self.snapshot.as_deref());
        self.notifications
            .push(NotificationLevel::Info, format!("Role switched to {role}"));
        self.apply(outcome, renderer)
    }

    pub fn back_to_dashboard<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> NavOutcome {
        let outcome = self.guard.back_to_dashboard(self.snapshot.as_deref());
        self.apply(outcome, renderer)
    }

    fn apply<R: Renderer + ?Sized>(&mut self, outcome: NavOutcome, renderer: &mut R) -> NavOutcome {
        match &outcome {
            NavOutcome::Activated { detail, .. } => self.detail = detail.clone(),
            NavOutcome::Rejected { .. } => self.detail = None,
        }
        renderer.render_navigation(self.guard.state(), self.detail.as_ref());
        outcome
    }
}
