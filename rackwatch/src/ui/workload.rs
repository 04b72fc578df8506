//! Workload forecast: per-server CPU / memory over the next six hours.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
};

use crate::insights::{is_high_load, is_low_utilization};
use crate::nav::ForecastSeries;
use crate::types::FORECAST_HORIZON_HOURS;
use crate::ui::theme::{load_color, ACCENT, MUTED};
use crate::ui::util::inner;

pub fn draw_workload(f: &mut ratatui::Frame<'_>, area: Rect, series: &[ForecastSeries]) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(series.len() as u16 + 2)])
        .split(area);
    draw_table(f, parts[0], series);
    draw_trends(f, parts[1], series);
}

fn draw_table(f: &mut ratatui::Frame<'_>, area: Rect, series: &[ForecastSeries]) {
    let hours = usize::from(FORECAST_HORIZON_HOURS);
    let mut widths = vec![Constraint::Length(8)];
    widths.extend((0..hours).map(|_| Constraint::Length(11)));

    let mut header = vec!["Server".to_string()];
    header.extend((1..=hours).map(|h| format!("+{h}h cpu/mem")));
    let header = Row::new(header).style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let rows = series.iter().map(|s| {
        let mut cells = vec![Cell::from(format!("#{}", s.server_id))];
        for (cpu, mem) in s.cpu.iter().zip(&s.memory) {
            let style = if is_high_load(*cpu, *mem) {
                Style::default().fg(ratatui::style::Color::Red).add_modifier(Modifier::BOLD)
            } else if is_low_utilization(*cpu, *mem) {
                Style::default().fg(ratatui::style::Color::Blue)
            } else {
                Style::default()
            };
            cells.push(Cell::from(format!("{cpu:>4.0}/{mem:<4.0}")).style(style));
        }
        Row::new(cells)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title("Workload forecast"));
    f.render_widget(table, area);
}

fn draw_trends(f: &mut ratatui::Frame<'_>, area: Rect, series: &[ForecastSeries]) {
    f.render_widget(Block::default().borders(Borders::ALL).title("CPU trend"), area);
    let body = inner(area);
    for (i, s) in series.iter().enumerate() {
        let y = body.y + i as u16;
        if y >= body.y + body.height {
            break;
        }
        let label = Rect { x: body.x, y, width: 6.min(body.width), height: 1 };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(format!("#{}", s.server_id), Style::default().fg(MUTED)))),
            label,
        );
        let row = Rect {
            x: body.x + label.width,
            y,
            width: body.width.saturating_sub(label.width).min(24),
            height: 1,
        };
        let data: Vec<u64> = s.cpu.iter().map(|v| v.clamp(0.0, 100.0).round() as u64).collect();
        let peak = s.cpu.iter().copied().fold(0.0_f64, f64::max);
        let spark = Sparkline::default()
            .data(&data)
            .max(100)
            .style(Style::default().fg(load_color(peak)));
        f.render_widget(spark, row);
    }
}
