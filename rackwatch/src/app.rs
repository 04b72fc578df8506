//! Terminal app: input handling, cycle scheduling, publishing and drawing.

use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Settings;
use crate::context::{AppContext, Renderer};
use crate::history::FleetHistory;
use crate::insights::Insight;
use crate::nav::{NavigationState, View, ViewDetail};
use crate::refresh::{CycleReport, RefreshCoordinator, RefreshTimer, RefreshTrigger};
use crate::source::Transport;
use crate::types::Snapshot;
use crate::ui::{
    cooling::draw_cooling,
    denied::draw_denied,
    header::{draw_header, draw_tabs},
    insights::draw_insights,
    notify::{draw_notifications, notify_height},
    overview::draw_overview,
    resource::draw_resource,
    theme::MUTED,
    workload::draw_workload,
};

/// Renderer side of the TUI: keeps chart history and marks the frame dirty.
#[derive(Debug, Default)]
pub struct Screen {
    pub history: FleetHistory,
    pub renders: u64,
    dirty: bool,
}

impl Screen {
    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Renderer for Screen {
    fn render(&mut self, snapshot: &Snapshot, insights: &[Insight]) {
        self.history.record(snapshot);
        self.renders += 1;
        self.dirty = true;
        let kinds: Vec<&str> = insights.iter().map(|i| i.category.slug()).collect();
        debug!(?kinds, "snapshot rendered");
    }

    fn render_navigation(&mut self, state: &NavigationState, _detail: Option<&ViewDetail>) {
        self.dirty = true;
        debug!(view = state.active_view.id(), rejected = state.rejected, "navigation rendered");
    }
}

/// What a key press asks the loop to do beyond updating the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Refresh,
    Quit,
}

pub struct App {
    ctx: AppContext,
    screen: Screen,
    backend: String,
    refresh_every: Duration,
}

impl App {
    pub fn new(settings: &Settings, backend: String) -> Self {
        Self {
            ctx: AppContext::new(settings.role, settings.notification_ttl),
            screen: Screen::default(),
            backend,
            refresh_every: settings.refresh_interval,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn publish(&mut self, report: CycleReport) {
        self.ctx.publish(report, &mut self.screen);
    }

    pub fn handle_key(&mut self, code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5) => return KeyAction::Refresh,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as u8 - b'1') as usize;
                self.ctx.navigate(View::ALL[idx].id(), &mut self.screen);
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.ctx.back_to_dashboard(&mut self.screen);
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                let next = self.ctx.navigation().role.cycle();
                self.ctx.set_role(next, &mut self.screen);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                if self.ctx.notifications_mut().dismiss_latest() {
                    self.screen.dirty = true;
                }
            }
            _ => {}
        }
        KeyAction::None
    }

    pub async fn run<T: Transport>(&mut self, coordinator: RefreshCoordinator<T>) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let res = self.event_loop(&mut terminal, coordinator).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend, T: Transport>(
        &mut self,
        terminal: &mut Terminal<B>,
        coordinator: RefreshCoordinator<T>,
    ) -> anyhow::Result<()> {
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<RefreshTrigger>(8);
        let (report_tx, mut report_rx) = mpsc::channel::<CycleReport>(8);
        let timer = RefreshTimer::spawn(self.refresh_every, trigger_tx.clone());
        let _ = trigger_tx.try_send(RefreshTrigger::Initial);
        self.screen.dirty = true;

        loop {
            // Input (non-blocking)
            let mut quit = false;
            while event::poll(Duration::from_millis(10))? {
                match event::read()? {
                    Event::Key(k) if k.kind == KeyEventKind::Press => match self.handle_key(k.code) {
                        KeyAction::Quit => quit = true,
                        KeyAction::Refresh => {
                            let _ = trigger_tx.try_send(RefreshTrigger::Manual);
                        }
                        KeyAction::None => {}
                    },
                    Event::Resize(_, _) => self.screen.dirty = true,
                    _ => {}
                }
            }
            if quit {
                break;
            }

            // Cycles run off the loop so navigation never waits on the network.
            while let Ok(trigger) = trigger_rx.try_recv() {
                let coordinator = coordinator.clone();
                let report_tx = report_tx.clone();
                tokio::spawn(async move {
                    if let Some(report) = coordinator.run_cycle(trigger).await {
                        let _ = report_tx.send(report).await;
                    }
                });
            }
            while let Ok(report) = report_rx.try_recv() {
                self.publish(report);
            }
            if self.ctx.notifications_mut().expire(Instant::now()) > 0 {
                self.screen.dirty = true;
            }

            if self.screen.take_dirty() {
                terminal.draw(|f| self.draw(f))?;
            }

            sleep(Duration::from_millis(50)).await;
        }

        timer.shutdown().await;
        info!("dashboard closed");
        Ok(())
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let notes = self.ctx.notifications().active();

        // Root rows: header, tabs, body, notifications
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(notify_height(notes.len())),
            ])
            .split(area);

        let nav = self.ctx.navigation();
        draw_header(f, rows[0], &self.backend, nav, self.ctx.last_cycle());
        draw_tabs(f, rows[1], nav);
        self.draw_body(f, rows[2]);
        draw_notifications(f, rows[3], notes);
    }

    fn draw_body(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let nav = self.ctx.navigation();
        if nav.rejected {
            draw_denied(f, area, nav);
            return;
        }
        let Some(snapshot) = self.ctx.snapshot() else {
            draw_placeholder(f, area, "Loading telemetry...");
            return;
        };

        match (nav.active_view, self.ctx.detail()) {
            (View::Dashboard, _) => {
                let split = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(11), Constraint::Length(14)])
                    .split(area);
                draw_overview(f, split[0], snapshot, &self.screen.history);
                draw_insights(f, split[1], self.ctx.insights());
            }
            (View::Workload, Some(ViewDetail::Workload { series })) => draw_workload(f, area, series),
            (
                View::Resource,
                Some(ViewDetail::Resource {
                    rows,
                    total_cpu_savings,
                    total_energy_savings_kw,
                }),
            ) => draw_resource(f, area, rows, *total_cpu_savings, *total_energy_savings_kw),
            (View::Cooling, Some(ViewDetail::Cooling { heatmap, settings })) => {
                draw_cooling(f, area, heatmap, settings, &snapshot.cooling_plan)
            }
            _ => draw_placeholder(f, area, "Waiting for the next refresh..."),
        }
    }
}

fn draw_placeholder(f: &mut ratatui::Frame<'_>, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(Style::default().fg(MUTED))
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}
