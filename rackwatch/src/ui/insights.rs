//! Insight list under the overview.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::insights::{Insight, InsightCategory};

fn category_color(c: InsightCategory) -> Color {
    match c {
        InsightCategory::HighLoad => Color::Red,
        InsightCategory::LowUtilization => Color::Blue,
        InsightCategory::EnergySavings | InsightCategory::Renewable => Color::Green,
        InsightCategory::Migration => Color::Magenta,
        InsightCategory::Cooling => Color::Cyan,
    }
}

pub fn draw_insights(f: &mut ratatui::Frame<'_>, area: Rect, insights: &[Insight]) {
    let mut lines: Vec<Line> = Vec::with_capacity(insights.len() * 2);
    for i in insights {
        let color = category_color(i.category);
        lines.push(Line::from(Span::styled(
            i.title(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  {}", i.message)));
    }
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("AI Insights ({})", insights.len())),
        );
    f.render_widget(p, area);
}
