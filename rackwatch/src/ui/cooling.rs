//! Cooling view: rack heat map, plan summary and controller settings.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::types::{CoolingPlan, CoolingSettings};
use crate::ui::theme::{heat_color, level_color};
use crate::ui::util::inner;

const CELL_W: u16 = 9;

pub fn draw_cooling(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    heatmap: &[Vec<f64>],
    settings: &CoolingSettings,
    plan: &CoolingPlan,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    draw_heatmap(f, cols[0], heatmap);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(cols[1]);
    draw_plan(f, side[0], plan);
    draw_settings(f, side[1], settings);
}

fn draw_heatmap(f: &mut ratatui::Frame<'_>, area: Rect, heatmap: &[Vec<f64>]) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Rack temperatures"), area);
    let body = inner(area);
    let mut lines: Vec<Line> = Vec::new();
    for (r, row) in heatmap.iter().enumerate() {
        let spans: Vec<Span> = row
            .iter()
            .map(|t| {
                Span::styled(
                    format!("{:^w$}", format!("{t:.1}°C"), w = CELL_W as usize),
                    Style::default().fg(Color::Black).bg(heat_color(*t)),
                )
            })
            .collect();
        lines.push(Line::from(format!("Row {}", r + 1)));
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines), body);
}

fn draw_plan(f: &mut ratatui::Frame<'_>, area: Rect, plan: &CoolingPlan) {
    let lines = vec![
        Line::from(vec![
            Span::raw("Level     "),
            Span::styled(
                plan.cooling_level.as_str(),
                Style::default().fg(level_color(plan.cooling_level)).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("Fan       {:.0}%", plan.fan_speed_pct)),
        Line::from(format!("Setpoint  {:.1}°C", plan.ac_setpoint_c)),
        Line::from(format!("Savings   {:.1} kW", plan.expected_power_savings_kw)),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Plan")),
        area,
    );
}

fn draw_settings(f: &mut ratatui::Frame<'_>, area: Rect, s: &CoolingSettings) {
    let lines = vec![
        Line::from(format!("Fan speed           {:.0}%", s.fan_speed)),
        Line::from(format!("Target temperature  {:.1}°C", s.target_temp)),
        Line::from(format!("Humidity level      {:.0}%", s.humidity_level)),
        Line::from(format!("Power optimization  {}", s.power_optimization.as_str())),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Settings")),
        area,
    );
}
