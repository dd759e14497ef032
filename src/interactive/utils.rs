//! Colors and small formatting helpers for the interactive UI

use ratatui::style::{Color, Style};

use planner::state::{load_level, LoadLevel, WorkloadBand};
use planner::utils::format_percentage;

use super::messages::MessageType;

/// Capacity cell color: red from 80%, yellow from 50%, green below
pub fn load_color(load: f64) -> Color {
    match load_level(load) {
        LoadLevel::High => Color::Red,
        LoadLevel::Medium => Color::Yellow,
        LoadLevel::Low => Color::Green,
    }
}

pub fn band_color(band: WorkloadBand) -> Color {
    match band {
        WorkloadBand::Available => Color::Green,
        WorkloadBand::Moderate => Color::Yellow,
        WorkloadBand::Overloaded => Color::Red,
    }
}

pub fn get_message_style(message_type: MessageType) -> Style {
    match message_type {
        MessageType::Info => Style::default().fg(Color::Cyan),
        MessageType::Success => Style::default().fg(Color::Green),
        MessageType::Warning => Style::default().fg(Color::Yellow),
        MessageType::Error => Style::default().fg(Color::Red),
    }
}

/// Grid cell text; empty weeks print as a dot
pub fn load_cell(load: f64) -> String {
    if load <= 0.0 {
        "·".to_string()
    } else {
        format_percentage(load.round())
    }
}

/// Week number part of a `Mes_YY:Sem n` label
pub fn short_week(label: &str) -> &str {
    label.split(':').nth(1).unwrap_or(label)
}
