//! Top header with backend, role and last-updated status, plus the view tabs.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::context::CycleSummary;
use crate::nav::{NavigationState, View};
use crate::refresh::RefreshPhase;
use crate::ui::theme::{ACCENT, LOCKED, MUTED, SYNTHETIC};
use crate::ui::util::truncate_middle;

pub fn draw_header(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    backend: &str,
    nav: &NavigationState,
    cycle: Option<&CycleSummary>,
) {
    let mut spans = vec![
        Span::styled("rackwatch", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" | {} | role: {}", truncate_middle(backend, 40), nav.role)),
    ];

    match cycle {
        Some(c) => {
            spans.push(Span::raw(format!(
                " | updated {}",
                c.captured_at.format("%H:%M:%S")
            )));
            if c.origins.any_synthetic() {
                spans.push(Span::styled(" (synthetic data)", Style::default().fg(SYNTHETIC)));
            }
            if c.phase == RefreshPhase::Degraded {
                spans.push(Span::styled(" DEGRADED", Style::default().fg(ratatui::style::Color::Red)));
            }
        }
        None => spans.push(Span::styled(" | loading...", Style::default().fg(MUTED))),
    }
    spans.push(Span::styled(
        "  (1-4 views, r refresh, o role, b back, x dismiss, q quit)",
        Style::default().fg(MUTED),
    ));

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

pub fn draw_tabs(f: &mut ratatui::Frame<'_>, area: Rect, nav: &NavigationState) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let label = format!("{} {}", i + 1, v.title());
            if v.permits(nav.role) {
                Line::from(label)
            } else {
                Line::from(Span::styled(format!("{label} (locked)"), Style::default().fg(LOCKED)))
            }
        })
        .collect();
    let selected = View::ALL
        .iter()
        .position(|v| *v == nav.active_view)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}
