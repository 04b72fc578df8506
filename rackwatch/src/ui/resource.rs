//! Resource allocation decisions with totals.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::nav::DecisionRow;
use crate::ui::theme::{action_color, ACCENT, MUTED};
use crate::ui::util::signed;

const COLS: [Constraint; 6] = [
    Constraint::Length(8),  // Server
    Constraint::Length(18), // Action
    Constraint::Length(12), // Target
    Constraint::Length(10), // CPU savings
    Constraint::Length(12), // Energy savings
    Constraint::Length(11), // Confidence
];

pub fn draw_resource(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    rows: &[DecisionRow],
    total_cpu: f64,
    total_kw: f64,
) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(area);

    let header = Row::new(vec!["Server", "Action", "Target", "CPU %", "Energy kW", "Confidence"])
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let body = rows.iter().map(|r| {
        Row::new(vec![
            Cell::from(format!("#{}", r.server_id)),
            Cell::from(r.action.as_str()).style(Style::default().fg(action_color(r.action))),
            Cell::from(r.target.clone().unwrap_or_else(|| "-".into()))
                .style(Style::default().fg(MUTED)),
            Cell::from(signed(r.cpu_savings, 0)),
            Cell::from(signed(r.energy_savings_kw, 2)),
            Cell::from(format!("{:.0}%", r.confidence * 100.0)),
        ])
    });
    let table = Table::new(body, COLS.to_vec())
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title("Allocation decisions"));
    f.render_widget(table, parts[0]);

    f.render_widget(
        Paragraph::new(format!(
            "Expected CPU savings {} % | expected energy savings {} kW",
            signed(total_cpu, 0),
            signed(total_kw, 2)
        ))
        .block(Block::default().borders(Borders::ALL).title("Totals")),
        parts[1],
    );
}
