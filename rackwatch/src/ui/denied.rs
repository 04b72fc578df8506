//! Access-denied panel shown after a rejected navigation.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::nav::NavigationState;

pub fn draw_denied(f: &mut ratatui::Frame<'_>, area: Rect, nav: &NavigationState) {
    let requested = nav.requested.as_deref().unwrap_or("?");
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Access Denied",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Role '{}' does not have permission to view '{requested}'.",
            nav.role
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press b to go back to the dashboard.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}
