//! Palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};
use vigia_core::StatusKind;

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36

/// Downtime chart bars — the dashboard's fixed alert red.
pub const CHART_BAR: Color = Color::Rgb(220, 53, 69); // #dc3545

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hints in the footer bar.
pub fn key_hint() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

/// Dim descriptive text.
pub fn dim() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// The search input while it has focus.
pub fn search_active() -> Style {
    Style::default().fg(ELECTRIC_PURPLE).bg(BG_HIGHLIGHT)
}

/// Color for a status presentation class.
///
/// Known classes get the dashboard's fixed mapping; any backend-invented
/// class renders dim rather than failing.
pub fn status_color(kind: &StatusKind) -> Color {
    match kind {
        StatusKind::Up => SUCCESS_GREEN,
        StatusKind::Down => ERROR_RED,
        StatusKind::Forbidden => ELECTRIC_YELLOW,
        StatusKind::Loading => BORDER_GRAY,
        StatusKind::Erro => CORAL,
        StatusKind::Other(_) => DIM_WHITE,
    }
}

/// Style for a card's status line.
pub fn status_style(kind: &StatusKind) -> Style {
    Style::default()
        .fg(status_color(kind))
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_classes_have_distinct_colors() {
        let up = status_color(&StatusKind::classify("UP"));
        let down = status_color(&StatusKind::classify("DOWN"));
        let forbidden = status_color(&StatusKind::classify("FORBIDDEN"));
        let erro = status_color(&StatusKind::classify("ERRO"));

        assert_ne!(up, down);
        assert_ne!(down, forbidden);
        assert_ne!(down, erro);
    }

    #[test]
    fn unknown_class_renders_dim() {
        assert_eq!(status_color(&StatusKind::classify("MAINTENANCE")), DIM_WHITE);
        assert_eq!(status_color(&StatusKind::classify("")), DIM_WHITE);
    }
}
