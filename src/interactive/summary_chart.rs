//! Bar summaries under the project list and the resource list

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::BTreeMap;

use planner::state::{project_statistics, resource_statistics, WorkloadBand};
use planner::utils::format_percentage;

use super::app::App;
use super::utils::{band_color, load_color};

const BAR_WIDTH: f64 = 30.0;

fn bar_line(label: &str, count: usize, total: usize, color: Color) -> Line<'static> {
    let share = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    };
    let bar = "█".repeat((share * BAR_WIDTH).round() as usize);
    Line::from(vec![
        Span::styled(format!("{:15} ", label), Style::default().fg(Color::White)),
        Span::styled(bar, Style::default().fg(color)),
        Span::styled(format!(" {} ({:.0}%)", count, share * 100.0), Style::default().fg(color)),
    ])
}

fn block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan))
}

fn by_count(map: &BTreeMap<String, usize>) -> Vec<(&String, &usize)> {
    let mut entries: Vec<_> = map.iter().collect();
    // Most frequent first, ties by name
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// Classification and complexity mix of the visible projects
pub fn render_projects(f: &mut Frame, app: &App, area: Rect) {
    let projects = app.visible_projects();
    let stats = project_statistics(projects.iter().copied());

    let mut lines = Vec::new();
    if stats.total == 0 {
        lines.push(Line::from(Span::styled(
            "No hay proyectos con estos filtros",
            Style::default().fg(Color::Gray),
        )));
    } else {
        for (classification, count) in by_count(&stats.by_classification) {
            lines.push(bar_line(classification, *count, stats.total, Color::Cyan));
        }
        lines.push(Line::from(""));
        for (complexity, count) in by_count(&stats.by_complexity) {
            lines.push(bar_line(complexity, *count, stats.total, Color::Magenta));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Con recurso: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{} / {}", stats.with_resource, stats.total),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block(" Resumen ")), area);
}

/// Workload bands across all resources
pub fn render_workload(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.state.snapshot;
    let stats = resource_statistics(&snapshot.availability_rows, &snapshot.capacity_weeks);

    let mut lines = vec![Line::from(vec![
        Span::styled("Carga promedio: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format_percentage(stats.average_load.round()),
            Style::default()
                .fg(load_color(stats.average_load))
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.push(Line::from(""));

    for (band, count) in [
        (WorkloadBand::Available, stats.available),
        (WorkloadBand::Moderate, stats.moderate),
        (WorkloadBand::Overloaded, stats.overloaded),
    ] {
        lines.push(bar_line(band.label(), count, stats.total, band_color(band)));
    }

    f.render_widget(Paragraph::new(lines).block(block(" Carga de trabajo ")), area);
}
