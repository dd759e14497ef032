use anyhow::{anyhow, Result};
use std::path::Path;

use planner::api::ApiClient;
use planner::assignment::{self, AssignmentForm, AssignmentPlan, SubmitOutcome};
use planner::forms::{ProjectForm, ResourceForm, CLASSIFICATIONS, COMPLEXITIES, PHASES};
use planner::utils::{confirm, format_percentage};
use planner::weeks;

pub struct ProjectArgs {
    pub name: String,
    pub classification: Option<String>,
    pub phase: Option<String>,
    pub complexity: Option<String>,
    pub resource: Option<i64>,
}

fn pick(options: &[&str], value: Option<String>, default: &str, what: &str) -> Result<String> {
    match value {
        None => Ok(default.to_string()),
        Some(v) => options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(v.trim()))
            .map(|o| o.to_string())
            .ok_or_else(|| anyhow!("Invalid {}: {}. Expected one of: {}", what, v, options.join(", "))),
    }
}

pub async fn handle_add_project(client: &ApiClient, args: ProjectArgs) -> Result<()> {
    let defaults = ProjectForm::new();
    let form = ProjectForm {
        name: args.name,
        classification: pick(&CLASSIFICATIONS, args.classification, &defaults.classification, "classification")?,
        phase: pick(&PHASES, args.phase, &defaults.phase, "phase")?,
        complexity: pick(&COMPLEXITIES, args.complexity, &defaults.complexity, "complexity")?,
        has_resource: args.resource.is_some(),
        resource_id: args.resource,
    };

    let request = form.build()?;
    let created = client.create_project(&request).await?;

    println!("✅ Proyecto creado: {} (id {})", created.name, created.id);
    println!(
        "   {} / {} / complejidad {}",
        created.classification, created.phase, created.complexity
    );
    Ok(())
}

pub async fn handle_add_resource(client: &ApiClient, name: String) -> Result<()> {
    let form = ResourceForm { name };
    let created = client.create_resource(&form.build()?).await?;
    println!("✅ Recurso creado: {} (id {})", created.name, created.id);
    Ok(())
}

pub struct AssignmentArgs {
    pub project: i64,
    pub resource: i64,
    pub from: Option<String>,
    pub to: Option<String>,
    pub percentage: Option<i64>,
    pub yes: bool,
}

fn print_plan(plan: &AssignmentPlan) {
    match plan {
        AssignmentPlan::Scheduled(req) => {
            println!("\n=== Asignación por cronograma ({}) ===", req.complexity_type);
            println!("Inicio: {}  Semanas: {}", req.start_date, req.percentages.len());
            let start = weeks::parse_date(&req.start_date).ok();
            for (i, (pct, sp)) in req.percentages.iter().zip(&req.subprocesses).enumerate() {
                let label = start
                    .map(|s| weeks::week_label(s + chrono::Duration::days(7 * i as i64)))
                    .unwrap_or_default();
                println!("  {:>2}. {:<22} {:>3}%  {}", i + 1, label, pct, sp);
            }
        }
        AssignmentPlan::Range(req) => {
            println!("\n=== Asignación por rango ===");
            println!(
                "Semanas {} a {} al {} ({})",
                req.start_week_monday,
                req.end_week_monday,
                format_percentage(req.percentage),
                req.subprocess
            );
        }
    }
}

pub async fn handle_add_assignment(client: &ApiClient, args: AssignmentArgs) -> Result<()> {
    let projects = client.list_projects().await?;
    let project = projects
        .into_iter()
        .find(|p| p.id == args.project)
        .ok_or_else(|| anyhow!("Project {} not found", args.project))?;

    let today = chrono::Local::now().date_naive();
    let mut form = AssignmentForm::with_default_range(today);
    form.select_project(project);
    form.select_resource(args.resource);
    if let Some(from) = args.from.as_deref() {
        form.start_week = Some(weeks::parse_date(from)?);
    }
    if let Some(to) = args.to.as_deref() {
        form.end_week = Some(weeks::parse_date(to)?);
    }
    if let Some(pct) = args.percentage {
        form.percentage = pct;
    }

    let plan = form.begin_submit(today)?;
    print_plan(&plan);

    if !args.yes && !confirm("\n🚀 ¿Crear la asignación?")? {
        println!("❌ Operación cancelada.");
        return Ok(());
    }

    let result = assignment::submit(client, &plan).await;
    match form.complete(result) {
        SubmitOutcome::Succeeded(message) => {
            println!("{}", message);
            Ok(())
        }
        SubmitOutcome::Failed(message) => Err(anyhow!(message)),
    }
}

pub async fn handle_import(client: &ApiClient, file: &Path) -> Result<()> {
    if !file.exists() {
        return Err(anyhow!("File not found: {}", file.display()));
    }

    let reply = client.import_excel(file).await?;
    let stats = &reply.stats;
    println!("✅ Importación exitosa!");
    println!(
        "Proyectos: {}, Recursos: {}, Asignaciones: {}, Semanas: {}",
        stats.projects_created, stats.resources_created, stats.assignments_created, stats.weeks_created
    );
    if let Some(message) = &reply.message {
        println!("{}", message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_matches_case_insensitively() {
        assert_eq!(pick(&COMPLEXITIES, Some("alta".to_string()), "Media", "complexity").unwrap(), "Alta");
        assert_eq!(pick(&COMPLEXITIES, None, "Media", "complexity").unwrap(), "Media");
        assert!(pick(&COMPLEXITIES, Some("extrema".to_string()), "Media", "complexity").is_err());
        assert_eq!(
            pick(&PHASES, Some("planeación py".to_string()), "Viabilidad", "phase").unwrap(),
            "Planeación PY"
        );
    }
}
