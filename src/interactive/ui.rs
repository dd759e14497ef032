//! Main UI rendering logic

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
    Frame,
};

use planner::api::ALL;
use planner::state::{current_load, LoadState, WorkloadBand};
use planner::utils::{format_percentage, truncate_string};

use super::app::{App, AppMode, Screen};
use super::messages::MessageType;
use super::utils::{band_color, get_message_style};
use super::{form_ui, summary_chart, week_view};

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(6), // Messages
            Constraint::Length(3), // Footer
        ])
        .split(size);

    render_header(f, app, chunks[0]);

    match app.mode {
        AppMode::Help => render_help(f, chunks[1]),
        AppMode::NewAssignment => form_ui::render_assignment_form(f, app, chunks[1]),
        AppMode::NewProject => form_ui::render_project_form(f, app, chunks[1]),
        AppMode::NewResource => form_ui::render_resource_form(f, app, chunks[1]),
        _ => render_screen(f, app, chunks[1]),
    }

    render_messages(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);

    if app.is_loading() {
        render_loading_overlay(f, app, size);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
        .collect();
    let selected = Screen::all()
        .iter()
        .position(|s| *s == app.screen)
        .unwrap_or(0);

    let status = match app.state.load_state() {
        LoadState::Ready => format!(" Planner - {} ", app.client.base_url()),
        LoadState::Failed(_) => " Planner - sin datos ".to_string(),
        LoadState::Uninitialized | LoadState::Loading => " Planner - cargando ".to_string(),
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, app: &App, area: Rect) {
    match app.screen {
        Screen::Projects => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(area);
            render_project_list(f, app, chunks[0]);
            summary_chart::render_projects(f, app, chunks[1]);
        }
        Screen::Capacity => week_view::render_capacity(f, app, area),
        Screen::Resources => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            let top = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[0]);
            render_resource_list(f, app, top[0]);
            summary_chart::render_workload(f, app, top[1]);

            let person = app.selected_resource_row().map(|r| r.resource.as_str());
            match person {
                Some(name) => {
                    let bucket = app.state.snapshot.resources_vs.by_person.get(name);
                    week_view::render_person(f, app, name, bucket, chunks[1]);
                }
                None => f.render_widget(
                    Paragraph::new("Sin recursos").block(Block::default().borders(Borders::ALL)),
                    chunks[1],
                ),
            }
        }
    }
}

fn filter_summary(values: &[String]) -> String {
    if values.is_empty() {
        ALL.to_string()
    } else {
        values.join(",")
    }
}

fn render_project_list(f: &mut Frame, app: &App, area: Rect) {
    let projects = app.visible_projects();
    let filter = &app.state.assignment_filter;

    let rows: Vec<Row> = projects
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if i == app.selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(p.id.to_string()),
                Cell::from(truncate_string(&p.name, 32)),
                Cell::from(p.classification.clone()),
                Cell::from(truncate_string(&p.phase, 18)),
                Cell::from(p.complexity.clone()),
                Cell::from(p.has_resource_label()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["ID", "Nombre", "Clasif.", "Fase", "Compl.", "Recurso"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let search = if app.mode == AppMode::Search {
        format!("{}█", filter.search)
    } else {
        filter.search.clone()
    };
    let title = format!(
        " Proyectos {}/{} - clasif: {} fase: {} compl: {} recurso: {} buscar: \"{}\" ",
        projects.len(),
        app.state.snapshot.projects.len(),
        filter_summary(&filter.classification),
        filter_summary(&filter.phase),
        filter_summary(&filter.complexity),
        filter.has_resource,
        search
    );

    let widths = [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Length(7),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_resource_list(f: &mut Frame, app: &App, area: Rect) {
    let labels = &app.state.snapshot.capacity_weeks;
    let rows: Vec<Row> = app
        .resource_rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let load = current_load(row, labels);
            let band = WorkloadBand::from_load(load);
            let style = if i == app.selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(truncate_string(&row.resource, 28)),
                Cell::from(format_percentage(load.round())),
                Cell::from(band.label()).style(Style::default().fg(band_color(band))),
            ])
            .style(style)
        })
        .collect();

    let band = app.workload.map_or(ALL, |b| b.label());
    let title = format!(" Recursos - carga: {} ", band);
    let widths = [
        Constraint::Min(16),
        Constraint::Length(7),
        Constraint::Length(13),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Recurso", "Carga", "Estado"]).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(table, area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )])
}

fn render_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "Atajos de teclado",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        )),
        Line::from(""),
        section("Navegación:"),
        Line::from("  Tab / Shift+Tab  Cambiar de pantalla"),
        Line::from("  1 2 3            Proyectos, Capacidad, Recursos"),
        Line::from("  ↑/↓ o k/j        Mover selección"),
        Line::from("  r                Recargar datos"),
        Line::from(""),
        section("Proyectos:"),
        Line::from("  a                Nueva asignación para el proyecto seleccionado"),
        Line::from("  n                Nuevo proyecto"),
        Line::from("  d                Eliminar proyecto"),
        Line::from("  c / p / x / s    Filtrar por clasificación, fase, complejidad, recurso"),
        Line::from("  /                Buscar      f  Limpiar filtros"),
        Line::from(""),
        section("Capacidad:"),
        Line::from("  ←/→              Cambiar mes      c  Clasificación"),
        Line::from(""),
        section("Recursos:"),
        Line::from("  ←/→              Tipo de proyecto w  Carga de trabajo"),
        Line::from("  n                Nuevo recurso    d  Eliminar recurso"),
        Line::from(""),
        section("General:"),
        Line::from("  q / Ctrl+C       Salir        ?  Ayuda        Esc  Cancelar"),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ayuda ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    for msg in app.messages.recent(4) {
        let mut style = get_message_style(msg.message_type);
        if app.mode == AppMode::ConfirmDelete && msg.message_type == MessageType::Warning {
            style = style.add_modifier(Modifier::SLOW_BLINK);
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", msg.icon()), style),
            Span::styled(msg.text.as_str(), style),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Listo",
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Mensajes ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match (app.mode, app.screen) {
        (AppMode::Normal, Screen::Projects) => {
            "[Tab] Pantalla  [↑↓] Mover  [a]signar  [n]uevo  [d] Eliminar  [c/p/x/s] Filtros  [/] Buscar  [r] Recargar  [?] Ayuda  [q] Salir"
        }
        (AppMode::Normal, Screen::Capacity) => {
            "[Tab] Pantalla  [↑↓] Mover  [←→] Mes  [c] Clasificación  [r] Recargar  [?] Ayuda  [q] Salir"
        }
        (AppMode::Normal, Screen::Resources) => {
            "[Tab] Pantalla  [↑↓] Mover  [←→] Tipo  [w] Carga  [n]uevo  [d] Eliminar  [r] Recargar  [?] Ayuda  [q] Salir"
        }
        (AppMode::Search, _) => "Escribe para buscar  [Enter/Esc] Terminar",
        (AppMode::NewAssignment, _) | (AppMode::NewProject, _) | (AppMode::NewResource, _) => {
            "[Enter] Guardar  [Esc] Cancelar"
        }
        (AppMode::ConfirmDelete, _) => "[y] Confirmar  [cualquier otra] Cancelar",
        (AppMode::Help, _) => "Cualquier tecla para volver",
    };

    let footer = Paragraph::new(shortcuts)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(footer, area);
}

fn render_loading_overlay(f: &mut Frame, app: &App, area: Rect) {
    use std::time::{SystemTime, UNIX_EPOCH};

    let popup_width = 50u16.min(area.width);
    let popup_height = 5u16.min(area.height);
    let popup_area = Rect {
        x: (area.width.saturating_sub(popup_width)) / 2,
        y: (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    let spinner_frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let spinner = spinner_frames[((now / 100) % spinner_frames.len() as u128) as usize];

    let loading_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(app.loading_message.as_str(), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];

    let paragraph = Paragraph::new(loading_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Cargando ")
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}
