//! Rendering of the new assignment, project and resource forms

use chrono::Duration;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use planner::assignment::SubmitState;
use planner::utils::format_percentage;
use planner::weeks;

use super::app::App;
use super::form::{AssignmentField, ProjectField, TextInput};

fn label_style(is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn value_style(is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Text value with a block cursor when focused
fn text_value(input: &TextInput, is_current: bool) -> String {
    if !is_current {
        return if input.value.is_empty() {
            "<vacío>".to_string()
        } else {
            input.value.clone()
        };
    }
    let mut display: String = input.value.chars().take(input.cursor).collect();
    display.push('█');
    display.extend(input.value.chars().skip(input.cursor));
    display
}

/// Choice value; arrows mark the focused picker
fn choice_value(value: &str, is_current: bool) -> String {
    if is_current {
        format!("◀ {} ▶", value)
    } else {
        value.to_string()
    }
}

fn field_line(label: &str, value: String, is_current: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:15}", label), label_style(is_current)),
        Span::raw(": "),
        Span::styled(value, value_style(is_current)),
    ])
}

fn hint_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Gray),
    ))
}

fn resource_name(app: &App, id: Option<i64>) -> String {
    id.and_then(|id| app.state.snapshot.resources.iter().find(|r| r.id == id))
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "<sin recursos>".to_string())
}

pub fn render_assignment_form(f: &mut Frame, app: &App, area: Rect) {
    let Some(state) = &app.assignment_form else {
        return;
    };
    let form = &state.form;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut lines = vec![
        hint_line("Tab/↑↓: Campo | ←→: Cambiar | Enter: Crear | Esc: Cancelar"),
        Line::from(""),
    ];

    for field in state.visible_fields() {
        let is_current = state.field == field;
        let value = match field {
            AssignmentField::Project => choice_value(
                form.project.as_ref().map_or("<sin proyectos>", |p| p.name.as_str()),
                is_current,
            ),
            AssignmentField::Resource => choice_value(&resource_name(app, form.resource_id), is_current),
            AssignmentField::StartWeek => choice_value(&state.start_label(), is_current),
            AssignmentField::EndWeek => choice_value(&state.end_label(), is_current),
            AssignmentField::Percentage => format!("{}%", text_value(&state.percentage, is_current)),
        };
        lines.push(field_line(field.label(), value, is_current));
    }

    lines.push(Line::from(""));
    match form.tier() {
        Some(tier) if tier.has_schedule() => lines.push(Line::from(Span::styled(
            format!(
                "Complejidad {}: cronograma fijo de {} semanas desde {}",
                tier,
                tier.weeks(),
                weeks::week_label(weeks::start_week(app.today))
            ),
            Style::default().fg(Color::Blue),
        ))),
        Some(_) => lines.push(Line::from(Span::styled(
            "Complejidad Baja: rango de semanas con porcentaje fijo",
            Style::default().fg(Color::Blue),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Complejidad del proyecto no reconocida",
            Style::default().fg(Color::Red),
        ))),
    }

    if *form.state() == SubmitState::Submitting {
        lines.push(Line::from(Span::styled(
            "Creando asignación...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = form.error() {
        for line in error.lines() {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let title_style = if form.can_submit() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Nueva asignación ")
            .border_style(title_style),
    );
    f.render_widget(paragraph, chunks[0]);

    render_schedule_preview(f, app, chunks[1]);
}

/// Week-by-week preview of what the submission will create
fn render_schedule_preview(f: &mut Frame, app: &App, area: Rect) {
    let Some(state) = &app.assignment_form else {
        return;
    };

    let items: Vec<ListItem> = match state.form.tier() {
        Some(tier) if tier.has_schedule() => {
            let start = weeks::start_week(app.today);
            tier.schedule()
                .into_iter()
                .enumerate()
                .map(|(i, week)| {
                    let monday = start + Duration::days(7 * i as i64);
                    let style = if week.percentage == 0 {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(format!(
                        "{:<14} {:>3}%  {}",
                        weeks::week_label(monday),
                        week.percentage,
                        week.subprocess
                    ))
                    .style(style)
                })
                .collect()
        }
        _ => match (state.form.start_week, state.form.end_week) {
            (Some(start), Some(end)) if start <= end => {
                let pct = format_percentage(state.form.percentage as f64);
                weeks::week_window(start, ((end - start).num_days() / 7 + 1) as u32)
                    .into_iter()
                    .map(|monday| ListItem::new(format!("{:<14} {:>5}  General", weeks::week_label(monday), pct)))
                    .collect()
            }
            (Some(_), Some(_)) => vec![ListItem::new("La semana fin es anterior a la de inicio")
                .style(Style::default().fg(Color::Red))],
            _ => vec![ListItem::new("Selecciona el rango de semanas")],
        },
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Semanas a crear ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, area);
}

pub fn render_project_form(f: &mut Frame, app: &App, area: Rect) {
    let Some(state) = &app.project_form else {
        return;
    };
    let form = &state.form;

    let mut lines = vec![
        hint_line("Tab/↑↓: Campo | ←→/Espacio: Cambiar | Enter: Guardar | Esc: Cancelar"),
        Line::from(""),
    ];

    for field in state.visible_fields() {
        let is_current = state.field == field;
        let value = match field {
            ProjectField::Name => text_value(&state.name, is_current),
            ProjectField::Classification => choice_value(&form.classification, is_current),
            ProjectField::Phase => choice_value(&form.phase, is_current),
            ProjectField::Complexity => choice_value(&form.complexity, is_current),
            ProjectField::HasResource => {
                choice_value(if form.has_resource { "Sí" } else { "No" }, is_current)
            }
            ProjectField::Resource => choice_value(&resource_name(app, form.resource_id), is_current),
        };
        lines.push(field_line(field.label(), value, is_current));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Nuevo proyecto ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

pub fn render_resource_form(f: &mut Frame, app: &App, area: Rect) {
    let Some(state) = &app.resource_form else {
        return;
    };

    let lines = vec![
        hint_line("Enter: Guardar | Esc: Cancelar"),
        Line::from(""),
        field_line("Nombre", text_value(&state.name, true), true),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Nuevo recurso ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_value_places_cursor() {
        let mut input = TextInput::new("Ana");
        input.cursor = 1;
        assert_eq!(text_value(&input, true), "A█na");
        assert_eq!(text_value(&input, false), "Ana");
        assert_eq!(text_value(&TextInput::default(), false), "<vacío>");
    }

    #[test]
    fn test_choice_value_marks_focus() {
        assert_eq!(choice_value("Media", true), "◀ Media ▶");
        assert_eq!(choice_value("Media", false), "Media");
    }
}
