//! Notification strip at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::context::{Notification, NotificationLevel};
use crate::ui::theme::notification_color;

/// Rows needed to show `n` notifications, borders included.
pub fn notify_height(n: usize) -> u16 {
    if n == 0 {
        0
    } else {
        n.min(4) as u16 + 2
    }
}

pub fn draw_notifications(f: &mut ratatui::Frame<'_>, area: Rect, items: &[Notification]) {
    if items.is_empty() || area.height == 0 {
        return;
    }
    let shown = items.len().min(4);
    let lines: Vec<Line> = items[items.len() - shown..]
        .iter()
        .rev()
        .map(|n| {
            let tag = match n.level {
                NotificationLevel::Info => "info",
                NotificationLevel::Error => "error",
            };
            Line::from(vec![
                Span::styled(format!("[{tag}] "), Style::default().fg(notification_color(n.level))),
                Span::raw(n.message.clone()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Notifications (x to dismiss)")),
        area,
    );
}
