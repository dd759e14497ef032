use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use planner::api::{ApiClient, ResourcesVsGrid, WeeklyAverages, ALL};
use planner::deliverables::{self, ComplexityTier};
use planner::state::{
    self, filter_by_workload, filter_capacity, filter_people, filter_projects, project_statistics,
    resource_statistics, visible_types, weeks_for_month, AssignmentFilter, CapacityFilter,
    ResourcesVsFilter, Snapshot, WorkloadBand,
};
use planner::utils::{fit, format_percentage, truncate_string};
use planner::weeks;

const NAME_WIDTH: usize = 24;
const CELL_WIDTH: usize = 7;

/// Resolves the `--start` option; defaults to the current week
pub fn window_start(start: Option<&str>) -> Result<NaiveDate> {
    match start {
        Some(s) => Ok(weeks::monday_of(weeks::parse_date(s)?)),
        None => Ok(weeks::monday_of(chrono::Local::now().date_naive())),
    }
}

fn print_header(labels: &[&String]) {
    let mut line = fit("", NAME_WIDTH);
    for label in labels {
        let short = label.split(':').nth(1).unwrap_or(label.as_str());
        line.push_str(&format!(" {:>width$}", short, width = CELL_WIDTH));
    }
    println!("{}", line);
}

fn month_banner(labels: &[&String]) {
    let months = state::unique_months(&labels.iter().map(|l| (*l).clone()).collect::<Vec<_>>());
    if !months.is_empty() {
        println!("Meses: {}", months.join(", "));
    }
}

pub async fn handle_projects(client: &ApiClient, filter: AssignmentFilter) -> Result<()> {
    let projects = client.projects_with_assignments().await?;
    let visible = filter_projects(&projects, &filter);

    println!("\n=== Proyectos ({} de {}) ===", visible.len(), projects.len());
    if visible.is_empty() {
        println!("No hay proyectos que coincidan con los filtros.");
        return Ok(());
    }

    println!(
        "{:>5}  {}  {:<14} {:<20} {:<8} {}",
        "ID",
        fit("Nombre", 30),
        "Clasificación",
        "Fase",
        "Compl.",
        "Recurso"
    );
    for p in &visible {
        println!(
            "{:>5}  {}  {:<14} {:<20} {:<8} {}",
            p.id,
            fit(&p.name, 30),
            p.classification,
            truncate_string(&p.phase, 20),
            p.complexity,
            p.has_resource_label()
        );
    }

    let stats = project_statistics(visible.iter().copied());
    println!("\nCon recurso: {} / {}", stats.with_resource, stats.total);
    for (classification, count) in &stats.by_classification {
        println!("  {:<14} {}", classification, count);
    }
    Ok(())
}

pub async fn handle_resources(client: &ApiClient) -> Result<()> {
    let resources = client.list_resources().await?;

    println!("\n=== Recursos ({}) ===", resources.len());
    for r in &resources {
        match r.unit.as_deref().filter(|u| !u.is_empty()) {
            Some(unit) => println!("{:>5}  {} ({})", r.id, r.name, unit),
            None => println!("{:>5}  {}", r.id, r.name),
        }
    }
    Ok(())
}

async fn capacity_snapshot(client: &ApiClient, start: NaiveDate, weeks: u32) -> Result<Snapshot> {
    let (resources, capacity) = tokio::try_join!(
        client.list_resources(),
        client.capacity_window(start, weeks)
    )?;
    Ok(Snapshot::build(
        resources,
        Vec::new(),
        capacity,
        ResourcesVsGrid::default(),
        WeeklyAverages::default(),
    ))
}

pub async fn handle_capacity(
    client: &ApiClient,
    start: NaiveDate,
    weeks: u32,
    month: Option<String>,
    resource: Option<String>,
) -> Result<()> {
    let snapshot = capacity_snapshot(client, start, weeks).await?;
    let filter = CapacityFilter {
        month: month.unwrap_or_else(|| ALL.to_string()),
        resource: resource.unwrap_or_else(|| ALL.to_string()),
        ..CapacityFilter::default()
    };

    let rows = filter_capacity(&snapshot.capacity_rows, &filter);
    let labels = weeks_for_month(&snapshot.capacity_weeks, &filter.month);

    println!("\n=== Capacidad: carga semanal por recurso ===");
    month_banner(&labels);
    print_header(&labels);
    for row in rows {
        let mut line = fit(&row.resource, NAME_WIDTH);
        for label in &labels {
            line.push_str(&format!(
                " {:>width$}",
                format_percentage(row.load(label).round()),
                width = CELL_WIDTH
            ));
        }
        println!("{}", line);
    }
    Ok(())
}

pub async fn handle_availability(
    client: &ApiClient,
    start: NaiveDate,
    weeks: u32,
    workload: Option<String>,
) -> Result<()> {
    let band = match workload.as_deref() {
        None | Some("all") | Some("Todos") => None,
        Some(other) => Some(
            WorkloadBand::parse(other).ok_or_else(|| anyhow!("Unknown workload band: {}", other))?,
        ),
    };

    let snapshot = capacity_snapshot(client, start, weeks).await?;
    let labels = &snapshot.capacity_weeks;
    let rows = filter_by_workload(&snapshot.availability_rows, labels, band);

    println!("\n=== Disponibilidad (promedio de las primeras 4 semanas) ===");
    for row in &rows {
        let load = state::current_load(row, labels);
        println!(
            "{} carga {:>6}  {:<12}",
            fit(&row.resource, NAME_WIDTH),
            format_percentage(load.round()),
            WorkloadBand::from_load(load).label()
        );
    }

    let stats = resource_statistics(&snapshot.availability_rows, labels);
    println!(
        "\nRecursos: {}  Carga promedio: {}  Disponibles: {}  Moderados: {}  Sobrecargados: {}",
        stats.total,
        format_percentage(stats.average_load.round()),
        stats.available,
        stats.moderate,
        stats.overloaded
    );
    Ok(())
}

pub async fn handle_resources_vs(
    client: &ApiClient,
    start: NaiveDate,
    weeks: u32,
    resource: Option<String>,
    work_type: Option<String>,
) -> Result<()> {
    let grid = client
        .resources_vs_weekly(start, weeks, resource.as_deref())
        .await?;
    let filter = ResourcesVsFilter {
        person: resource.unwrap_or_else(|| ALL.to_string()),
        work_type: work_type.unwrap_or_else(|| ALL.to_string()),
    };

    let labels: Vec<&String> = grid.labels.iter().collect();
    let types = visible_types(&grid.types, &filter);

    for (person, bucket) in filter_people(&grid.by_person, &filter) {
        println!("\n=== {} ===", person);
        print_header(&labels);
        for work_type in &types {
            let loads = bucket.load_by_type_week.get(*work_type);
            let mut line = fit(work_type, NAME_WIDTH);
            for label in &labels {
                let value = loads.and_then(|m| m.get(*label)).copied().unwrap_or(0.0);
                line.push_str(&format!(
                    " {:>width$}",
                    format_percentage(state::normalize_pct(value).round()),
                    width = CELL_WIDTH
                ));
            }
            println!("{}", line);

            if let Some(projects) = bucket.project_names_by_type.get(*work_type) {
                if !projects.is_empty() {
                    let names: Vec<&str> = projects.iter().map(|p| p.name()).collect();
                    println!("    {}", names.join(", "));
                }
            }
        }
    }
    Ok(())
}

pub async fn handle_weekly_avg(client: &ApiClient, start: NaiveDate, weeks: u32) -> Result<()> {
    let weekly = client.projects_weekly_avg(start, weeks).await?;
    let snapshot = Snapshot::build(
        Vec::new(),
        Vec::new(),
        Default::default(),
        ResourcesVsGrid::default(),
        weekly,
    );

    println!("\n=== Resumen de proyectos (promedio semanal) ===");
    for summary in &snapshot.project_summary {
        println!(
            "{} {:>7}",
            fit(&summary.name, 40),
            format_percentage((summary.avg_pct * 10.0).round() / 10.0)
        );
    }
    Ok(())
}

pub async fn handle_subprocesses(
    client: &ApiClient,
    project_id: i64,
    resource: Option<String>,
) -> Result<()> {
    let reply = client
        .project_subprocesses(project_id, resource.as_deref())
        .await?;

    println!(
        "\n=== Subprocesos de {} ({}) en {} ===",
        reply.project_name, reply.complexity, reply.current_month
    );
    if let Some(name) = &reply.resource_name {
        println!("Recurso: {}", name);
    }
    if reply.subprocesses.is_empty() {
        println!("Sin subprocesos en el mes actual.");
    }
    for sp in &reply.subprocesses {
        println!("  {:<40} {}", sp.name, sp.count);
    }
    Ok(())
}

pub async fn handle_assignment_weeks(client: &ApiClient, assignment_id: i64) -> Result<()> {
    let rows = client.assignment_weeks(assignment_id).await?;

    println!("\n=== Semanas de la asignación {} ===", assignment_id);
    for w in &rows {
        println!(
            "{}  {}:{}  {:>6}  {}",
            w.week_monday,
            w.month_label,
            w.week_label,
            format_percentage(w.speculative_pct),
            w.subprocess
        );
    }
    Ok(())
}

/// Prints a tier's schedule; no backend needed
pub fn handle_schedule(tier: ComplexityTier, names: bool) -> Result<()> {
    let table = tier
        .table()
        .ok_or_else(|| anyhow!("{} complexity has no fixed schedule", tier))?;

    println!("\n=== Cronograma complejidad {} ({} semanas) ===", tier, tier.weeks());
    let mut total = 0;
    for (m, month) in deliverables::schedule_with_names(table).iter().enumerate() {
        for (w, week) in month.iter().enumerate() {
            total += week.percentage;
            println!(
                "Mes {:>2} Sem {}  {:>3}%  {}",
                m + 1,
                w + 1,
                week.percentage,
                week.subprocess
            );
            if names && !week.deliverable_names.is_empty() {
                println!("               {}", week.deliverable_names.join(" | "));
            }
        }
    }
    println!("\nSuma de porcentajes: {}%", total);
    Ok(())
}

pub fn handle_start_week(date: Option<String>) -> Result<()> {
    let today = match date {
        Some(d) => weeks::parse_date(&d)?,
        None => chrono::Local::now().date_naive(),
    };
    let start = weeks::start_week(today);
    println!(
        "{} -> {} ({})",
        weeks::format_api_date(today),
        weeks::format_api_date(start),
        weeks::week_label(start)
    );
    Ok(())
}
