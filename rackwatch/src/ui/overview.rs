//! Dashboard overview: energy, averages, server table and history sparklines.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Sparkline, Table},
};

use crate::history::FleetHistory;
use crate::types::Snapshot;
use crate::ui::theme::{level_color, load_color, status_color, ACCENT, MUTED};
use crate::ui::util::{inner, tail};

const SERVER_COLS: [Constraint; 6] = [
    Constraint::Length(8),  // Server
    Constraint::Length(12), // Status
    Constraint::Length(7),  // CPU
    Constraint::Length(7),  // Mem
    Constraint::Length(7),  // IO
    Constraint::Length(8),  // Temp
];

pub fn draw_overview(f: &mut ratatui::Frame<'_>, area: Rect, s: &Snapshot, history: &FleetHistory) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);
    draw_energy(f, top[0], s);
    draw_averages(f, top[1], s);
    draw_cooling_state(f, top[2], s);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    draw_servers(f, bottom[0], s, history);

    let sparks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(bottom[1]);
    let cpu_now = history.fleet_cpu.back().copied().unwrap_or(0);
    draw_spark(f, sparks[0], &format!("Fleet CPU avg (now: {cpu_now}%)"), &history.fleet_cpu, Color::Cyan);
    let ren_now = history.renewable.back().copied().unwrap_or(0);
    draw_spark(f, sparks[1], &format!("Renewable share (now: {ren_now}%)"), &history.renewable, Color::Green);
}

fn draw_energy(f: &mut ratatui::Frame<'_>, area: Rect, s: &Snapshot) {
    let block = Block::default().borders(Borders::ALL).title("Energy");
    f.render_widget(block, area);
    let body = inner(area);
    if body.height < 2 {
        return;
    }
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(body);
    f.render_widget(
        Paragraph::new(format!(
            "now {:.1} kW | saved {:.1} kW",
            s.energy.current, s.energy.saved
        )),
        parts[0],
    );
    let pct = s.energy.renewable_pct.clamp(0.0, 100.0);
    let g = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(pct / 100.0)
        .label(format!("renewable {pct:.0}%"));
    f.render_widget(g, parts[1]);
}

fn draw_averages(f: &mut ratatui::Frame<'_>, area: Rect, s: &Snapshot) {
    let lines = match s.averages() {
        Some((cpu, mem, io)) => vec![
            avg_line("CPU", cpu),
            avg_line("Memory", mem),
            avg_line("IO", io),
        ],
        None => vec![Line::from(Span::styled("no servers reported", Style::default().fg(MUTED)))],
    };
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Averages")),
        area,
    );
}

fn avg_line(label: &str, v: f64) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label:<8}")),
        Span::styled(format!("{v:>5.1}%"), Style::default().fg(load_color(v))),
    ])
}

fn draw_cooling_state(f: &mut ratatui::Frame<'_>, area: Rect, s: &Snapshot) {
    let c = &s.cooling;
    let lines = vec![
        Line::from(vec![
            Span::raw("Level    "),
            Span::styled(c.level.as_str(), Style::default().fg(level_color(c.level)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(format!("Temp     {:.1}°C", c.temperature_c)),
        Line::from(format!("Humidity {:.0}%", c.humidity_pct)),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Cooling")),
        area,
    );
}

fn draw_servers(f: &mut ratatui::Frame<'_>, area: Rect, s: &Snapshot, history: &FleetHistory) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Servers ({})", s.servers.len()));
    f.render_widget(block, area);
    let body = inner(area);
    if body.height < 2 {
        return;
    }

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(56), Constraint::Min(0)])
        .split(body);

    let header = Row::new(vec!["Server", "Status", "CPU", "Mem", "IO", "Temp"])
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let rows = s.servers.iter().map(|srv| {
        Row::new(vec![
            Cell::from(format!("#{}", srv.id)),
            Cell::from(srv.status.as_str()).style(Style::default().fg(status_color(srv.status))),
            Cell::from(format!("{:>5.1}", srv.cpu)).style(Style::default().fg(load_color(srv.cpu))),
            Cell::from(format!("{:>5.1}", srv.memory)).style(Style::default().fg(load_color(srv.memory))),
            Cell::from(format!("{:>5.1}", srv.io)).style(Style::default().fg(load_color(srv.io))),
            Cell::from(format!("{:.0}°C", srv.temperature)),
        ])
    });
    f.render_widget(
        Table::new(rows, SERVER_COLS.to_vec()).header(header).column_spacing(1),
        split[0],
    );

    // Per-server CPU trend beside each row; row 0 is the header.
    let trend = split[1];
    if trend.width == 0 {
        return;
    }
    for (i, srv) in s.servers.iter().enumerate() {
        let y = trend.y + 1 + i as u16;
        if y >= trend.y + trend.height {
            break;
        }
        let Some(hist) = history.server(srv.id) else { continue };
        let row = Rect { x: trend.x, y, width: trend.width, height: 1 };
        let data = tail(hist, row.width);
        let spark = Sparkline::default()
            .data(&data)
            .max(100)
            .style(Style::default().fg(load_color(srv.cpu)));
        f.render_widget(spark, row);
    }
}

fn draw_spark(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    hist: &std::collections::VecDeque<u64>,
    color: Color,
) {
    let data = tail(hist, area.width.saturating_sub(2));
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .data(&data)
        .max(100)
        .style(Style::default().fg(color));
    f.render_widget(spark, area);
}
