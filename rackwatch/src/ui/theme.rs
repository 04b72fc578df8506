//! Shared UI theme constants and threshold colors.

use ratatui::style::Color;

use crate::context::NotificationLevel;
use crate::types::{Action, CoolingLevel, ServerStatus};

pub const ACCENT: Color = Color::Cyan;
pub const MUTED: Color = Color::DarkGray;
pub const LOCKED: Color = Color::Rgb(110, 110, 120);
pub const SYNTHETIC: Color = Color::Yellow;

/// Load percentages: green below 50, yellow below 80, red above.
pub fn load_color(pct: f64) -> Color {
    match pct {
        x if x < 50.0 => Color::Green,
        x if x < 80.0 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn status_color(s: ServerStatus) -> Color {
    match s {
        ServerStatus::Active => Color::Green,
        ServerStatus::Hibernating => Color::Blue,
        ServerStatus::Offline => Color::Red,
    }
}

pub fn level_color(l: CoolingLevel) -> Color {
    match l {
        CoolingLevel::Low => Color::Green,
        CoolingLevel::Medium => Color::Yellow,
        CoolingLevel::High => Color::Red,
    }
}

pub fn action_color(a: Action) -> Color {
    match a {
        Action::Hibernate => Color::Blue,
        Action::Activate => Color::Green,
        Action::MigrateWorkload => Color::Magenta,
        Action::NoAction => MUTED,
    }
}

pub fn notification_color(l: NotificationLevel) -> Color {
    match l {
        NotificationLevel::Info => ACCENT,
        NotificationLevel::Error => Color::Red,
    }
}

/// Heat-map cell background for a rack temperature in °C.
pub fn heat_color(t: f64) -> Color {
    match t {
        x if x < 38.0 => Color::Rgb(40, 90, 200),
        x if x < 42.0 => Color::Rgb(40, 160, 90),
        x if x < 46.0 => Color::Rgb(200, 170, 40),
        _ => Color::Rgb(200, 60, 40),
    }
}
