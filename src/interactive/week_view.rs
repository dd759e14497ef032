//! Week grids: load per resource (capacity) and per work type (resources screen)

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use planner::api::{PersonBucket, ALL};
use planner::state::{normalize_pct, visible_types};
use planner::utils::truncate_string;

use super::app::App;
use super::utils::{load_cell, load_color, short_week};

const NAME_WIDTH: u16 = 22;
const CELL_WIDTH: u16 = 7;

/// How many week columns fit next to the name column
fn column_budget(area: Rect) -> usize {
    let usable = area.width.saturating_sub(NAME_WIDTH + 3);
    (usable / (CELL_WIDTH + 1)).max(1) as usize
}

fn header_row<'a>(first: &'a str, labels: &[&'a String]) -> Row<'a> {
    let mut cells = vec![Cell::from(first)];
    cells.extend(labels.iter().map(|l| Cell::from(short_week(l.as_str()))));
    Row::new(cells).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn widths(columns: usize) -> Vec<Constraint> {
    let mut widths = vec![Constraint::Length(NAME_WIDTH)];
    widths.extend(std::iter::repeat(Constraint::Length(CELL_WIDTH)).take(columns));
    widths
}

/// Capacity grid with the month and classification filters applied
pub fn render_capacity(f: &mut Frame, app: &App, area: Rect) {
    let labels = app.state.visible_capacity_weeks();
    let labels: Vec<&String> = labels.into_iter().take(column_budget(area)).collect();
    let rows_data = app.state.filtered_capacity();

    let mut rows = Vec::new();
    for (i, row) in rows_data.iter().enumerate() {
        let mut cells = vec![Cell::from(truncate_string(&row.resource, NAME_WIDTH as usize))];
        for label in &labels {
            let load = row.load(label);
            cells.push(Cell::from(load_cell(load)).style(Style::default().fg(load_color(load))));
        }
        let style = if i == app.selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        rows.push(Row::new(cells).style(style));
    }

    let filter = &app.state.capacity_filter;
    let chips = if filter.classifications.is_empty() {
        ALL.to_string()
    } else {
        filter.classifications.join(", ")
    };
    let title = format!(
        " Capacidad - Mes: {} - Clasificación: {} - {} recursos ",
        filter.month,
        chips,
        rows_data.len()
    );

    let table = Table::new(rows, widths(labels.len()))
        .header(header_row("Recurso", &labels))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

/// Load by work type for one person
pub fn render_person(f: &mut Frame, app: &App, person: &str, bucket: Option<&PersonBucket>, area: Rect) {
    let grid = &app.state.snapshot.resources_vs;
    let labels: Vec<&String> = grid.labels.iter().take(column_budget(area)).collect();
    let types = visible_types(&grid.types, &app.state.resources_vs_filter);

    let mut rows = Vec::new();
    if let Some(bucket) = bucket {
        for work_type in types {
            let loads = bucket.load_by_type_week.get(work_type.as_str());
            let mut cells = vec![Cell::from(truncate_string(work_type, NAME_WIDTH as usize))];
            for label in &labels {
                let value = loads
                    .and_then(|m| m.get(label.as_str()))
                    .copied()
                    .map(normalize_pct)
                    .unwrap_or(0.0);
                cells.push(Cell::from(load_cell(value)).style(Style::default().fg(load_color(value))));
            }
            rows.push(Row::new(cells));
        }
    }

    let title = format!(
        " {} - Tipo: {} ",
        person, app.state.resources_vs_filter.work_type
    );
    let table = Table::new(rows, widths(labels.len()))
        .header(header_row("Tipo", &labels))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_budget() {
        let area = Rect::new(0, 0, 25, 10);
        assert_eq!(column_budget(area), 1);
        let wide = Rect::new(0, 0, 25 + 8 * 10, 10);
        assert_eq!(column_budget(wide), 10);
    }
}
