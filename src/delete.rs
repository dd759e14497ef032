use anyhow::Result;

use planner::api::ApiClient;
use planner::utils::confirm;

/// What a delete command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Project,
    Resource,
    Assignment,
}

impl DeleteTarget {
    fn noun(&self) -> &'static str {
        match self {
            DeleteTarget::Project => "proyecto",
            DeleteTarget::Resource => "recurso",
            DeleteTarget::Assignment => "asignación",
        }
    }
}

pub async fn handle_delete_command(
    client: &ApiClient,
    target: DeleteTarget,
    id: i64,
    yes: bool,
) -> Result<()> {
    println!("\n=== Eliminar {} ===", target.noun());

    // Show what is about to go before asking
    match target {
        DeleteTarget::Project => match client.list_projects().await {
            Ok(projects) => match projects.iter().find(|p| p.id == id) {
                Some(p) => println!(
                    "📋 {} ({} / {} / {})",
                    p.name, p.classification, p.phase, p.complexity
                ),
                None => {
                    println!("❌ No existe un proyecto con id {}.", id);
                    return Ok(());
                }
            },
            Err(e) => println!("⚠️  No se pudo consultar el proyecto: {}", e),
        },
        DeleteTarget::Resource => match client.list_resources().await {
            Ok(resources) => match resources.iter().find(|r| r.id == id) {
                Some(r) => println!("📋 {}", r.name),
                None => {
                    println!("❌ No existe un recurso con id {}.", id);
                    return Ok(());
                }
            },
            Err(e) => println!("⚠️  No se pudo consultar el recurso: {}", e),
        },
        DeleteTarget::Assignment => match client.assignment_weeks(id).await {
            Ok(weeks) => println!("📋 Asignación {} con {} semanas", id, weeks.len()),
            Err(e) => println!("⚠️  No se pudo consultar la asignación: {}", e),
        },
    }

    println!("Se eliminarán también todas las asignaciones asociadas.");
    if !yes && !confirm("¿Desea continuar?")? {
        println!("❌ Operación cancelada.");
        return Ok(());
    }

    let message = match target {
        DeleteTarget::Project => client.delete_project(id).await?,
        DeleteTarget::Resource => client.delete_resource(id).await?,
        DeleteTarget::Assignment => client.delete_assignment(id).await?,
    };

    println!("✅ {}", message);
    Ok(())
}
