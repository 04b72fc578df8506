//! Small UI helpers: inner rects, sparkline windows, truncation.

use std::collections::VecDeque;

use ratatui::layout::Rect;

/// Area inside a one-cell border.
pub fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

/// The newest samples that fit in `width` columns.
pub fn tail(hist: &VecDeque<u64>, width: u16) -> Vec<u64> {
    let max_points = width as usize;
    let start = hist.len().saturating_sub(max_points);
    hist.iter().skip(start).copied().collect()
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{head}...{tail}")
}

pub fn signed(v: f64, decimals: usize) -> String {
    format!("{v:+.decimals$}")
}
