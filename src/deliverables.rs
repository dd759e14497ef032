//! Deliverable catalog and complexity schedules
//!
//! Medium and high complexity projects follow a fixed calendar. Each week of
//! the calendar lists the deliverables being worked on; a week's load is the
//! sum of their percentages and its subprocess is their labels joined with
//! `", "`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{PlannerError, Result, ValidationError};

/// Subprocess used when no known deliverable is active in a week
pub const GENERAL_SUBPROCESS: &str = "General";

/// A unit of project work with a fixed effort share
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deliverable {
    pub id: u32,
    pub percentage: u32,
    pub name: &'static str,
    pub subprocess: &'static str,
}

impl Deliverable {
    const fn new(id: u32, percentage: u32, name: &'static str, subprocess: &'static str) -> Self {
        Self {
            id,
            percentage,
            name,
            subprocess,
        }
    }
}

const CATALOG: [Deliverable; 17] = [
    Deliverable::new(1, 5, "Documento Diagnóstico", "Diagnóstico"),
    Deliverable::new(2, 7, "Doc. Especificación", "Especificación"),
    Deliverable::new(3, 7, "Modelo operativo V1", "Modelo Operativo"),
    Deliverable::new(4, 2, "Riesgos preliminares", "Análisis de Riesgos"),
    Deliverable::new(5, 9, "RFP", "RFP"),
    Deliverable::new(6, 2, "Estimaciones costo y tiempo", "Estimaciones"),
    Deliverable::new(7, 10, "Caso de Negocio", "Caso Negocio"),
    Deliverable::new(8, 10, "Gestión Jurídica", "Jurídico"),
    Deliverable::new(9, 5, "Desarrollo", "Desarrollo"),
    Deliverable::new(10, 8, "Pruebas", "Pruebas"),
    Deliverable::new(11, 5, "Producción", "Producción"),
    Deliverable::new(12, 10, "Estabilización", "Estabilización"),
    Deliverable::new(13, 5, "Gestión de Riesgos", "Gestión Riesgos"),
    Deliverable::new(14, 8, "Gestión de Procesos", "Gestión Procesos"),
    Deliverable::new(15, 10, "Gestión del Cambio", "Gestión Cambio"),
    Deliverable::new(16, 10, "Entrega operación y soporte", "Entrega Operación"),
    Deliverable::new(17, 8, "Recorrido Modelo Operativo", "Recorrido Modelo"),
];

/// One week: the deliverable ids active in it, in table order
pub type WeekEntry = &'static [u32];

/// One month: always four weeks
pub type Month = [WeekEntry; 4];

/// 12 months / 48 weeks
pub const HIGH_COMPLEXITY_SCHEDULE: [Month; 12] = [
    [&[1], &[1], &[1], &[1]],
    [&[1, 2], &[3, 2], &[4, 3, 2], &[3, 2]],
    [&[5], &[5], &[7, 5], &[5]],
    [&[5], &[7, 6], &[6], &[7]],
    // rest week opens the month
    [&[], &[8], &[8], &[8]],
    [&[8], &[8], &[8], &[9]],
    [&[14, 13, 9], &[9], &[13, 9], &[15, 9]],
    [&[13, 9], &[9], &[9], &[16, 9]],
    [&[9], &[14, 9], &[9], &[15, 10]],
    [&[15, 10], &[10], &[10], &[10]],
    [&[10], &[11], &[15, 11], &[16, 15, 14, 12]],
    [&[16, 12], &[17, 16, 12], &[12], &[]],
];

/// 9 months / 36 weeks
pub const MEDIUM_COMPLEXITY_SCHEDULE: [Month; 9] = [
    [&[1], &[1], &[1], &[2, 3]],
    [&[2, 3, 4], &[3], &[5], &[5, 7]],
    [&[5], &[6], &[6], &[7]],
    [&[], &[8], &[8], &[8]],
    [&[8], &[8], &[8], &[9]],
    [&[9], &[9, 13], &[9, 14], &[9, 13]],
    [&[14, 9], &[9], &[9], &[10, 15]],
    [&[10, 15], &[10], &[11, 15], &[12, 14, 15]],
    [&[12, 16], &[12, 14], &[12, 16, 17], &[]],
];

/// The whole catalog, ordered by id
pub fn catalog() -> &'static [Deliverable] {
    &CATALOG
}

/// Looks up a deliverable by id
pub fn lookup(id: u32) -> Result<&'static Deliverable> {
    find(id).ok_or_else(|| PlannerError::NotFound(format!("deliverable {}", id)))
}

fn find(id: u32) -> Option<&'static Deliverable> {
    CATALOG.iter().find(|d| d.id == id)
}

/// Load and subprocess label for one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekResult {
    pub percentage: u32,
    pub subprocess: String,
}

/// Reduces one week's deliverables to a total percentage and joined label.
///
/// Ids missing from the catalog count as 0% and are left out of the label.
/// The sum is not clamped.
pub fn reduce_week(week: &[u32]) -> WeekResult {
    let known: Vec<&Deliverable> = week.iter().filter_map(|id| find(*id)).collect();

    let percentage = known.iter().map(|d| d.percentage).sum();
    let labels: Vec<&str> = known
        .iter()
        .map(|d| d.subprocess)
        .filter(|s| !s.is_empty())
        .collect();

    let subprocess = if labels.is_empty() {
        GENERAL_SUBPROCESS.to_string()
    } else {
        labels.join(", ")
    };

    WeekResult {
        percentage,
        subprocess,
    }
}

/// Flattens a schedule month-major, week-minor and reduces every week
pub fn flatten(schedule: &[Month]) -> Vec<WeekResult> {
    schedule
        .iter()
        .flat_map(|month| month.iter())
        .map(|week| reduce_week(week))
        .collect()
}

pub fn high_complexity_schedule() -> Vec<WeekResult> {
    flatten(&HIGH_COMPLEXITY_SCHEDULE)
}

pub fn medium_complexity_schedule() -> Vec<WeekResult> {
    flatten(&MEDIUM_COMPLEXITY_SCHEDULE)
}

pub fn high_complexity_percentages() -> Vec<u32> {
    percentages(&high_complexity_schedule())
}

pub fn medium_complexity_percentages() -> Vec<u32> {
    percentages(&medium_complexity_schedule())
}

pub fn high_complexity_subprocesses() -> Vec<String> {
    subprocesses(&high_complexity_schedule())
}

pub fn medium_complexity_subprocesses() -> Vec<String> {
    subprocesses(&medium_complexity_schedule())
}

fn percentages(weeks: &[WeekResult]) -> Vec<u32> {
    weeks.iter().map(|w| w.percentage).collect()
}

fn subprocesses(weeks: &[WeekResult]) -> Vec<String> {
    weeks.iter().map(|w| w.subprocess.clone()).collect()
}

/// Display names for a week's deliverables; unknown ids render as `Entregable {id}`
pub fn deliverable_names(week: &[u32]) -> Vec<String> {
    week.iter()
        .map(|id| match find(*id) {
            Some(d) => d.name.to_string(),
            None => format!("Entregable {}", id),
        })
        .collect()
}

/// A schedule week annotated for previews
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledWeek {
    pub deliverables: Vec<u32>,
    pub deliverable_names: Vec<String>,
    pub percentage: u32,
    pub subprocess: String,
}

/// The schedule, month by month, with names and reduced values per week
pub fn schedule_with_names(schedule: &[Month]) -> Vec<Vec<ScheduledWeek>> {
    schedule
        .iter()
        .map(|month| {
            month
                .iter()
                .map(|week| {
                    let WeekResult {
                        percentage,
                        subprocess,
                    } = reduce_week(week);
                    ScheduledWeek {
                        deliverables: week.to_vec(),
                        deliverable_names: deliverable_names(week),
                        percentage,
                        subprocess,
                    }
                })
                .collect()
        })
        .collect()
}

/// Project complexity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplexityTier {
    Baja,
    Media,
    Alta,
}

impl ComplexityTier {
    /// Parses the backend's complexity text, ignoring case and surrounding spaces
    pub fn from_project(complexity: &str) -> Option<Self> {
        match complexity.trim().to_lowercase().as_str() {
            "baja" => Some(ComplexityTier::Baja),
            "media" => Some(ComplexityTier::Media),
            "alta" => Some(ComplexityTier::Alta),
            _ => None,
        }
    }

    /// Label stored on projects
    pub fn label(&self) -> &'static str {
        match self {
            ComplexityTier::Baja => "Baja",
            ComplexityTier::Media => "Media",
            ComplexityTier::Alta => "Alta",
        }
    }

    /// `complexity_type` value for bulk requests
    pub fn wire_name(&self) -> &'static str {
        match self {
            ComplexityTier::Baja => "baja",
            ComplexityTier::Media => "media",
            ComplexityTier::Alta => "alta",
        }
    }

    /// The governing schedule table; low complexity has none
    pub fn table(&self) -> Option<&'static [Month]> {
        match self {
            ComplexityTier::Baja => None,
            ComplexityTier::Media => Some(&MEDIUM_COMPLEXITY_SCHEDULE),
            ComplexityTier::Alta => Some(&HIGH_COMPLEXITY_SCHEDULE),
        }
    }

    pub fn has_schedule(&self) -> bool {
        self.table().is_some()
    }

    pub fn schedule(&self) -> Vec<WeekResult> {
        self.table().map(flatten).unwrap_or_default()
    }

    pub fn percentages(&self) -> Vec<u32> {
        percentages(&self.schedule())
    }

    pub fn subprocesses(&self) -> Vec<String> {
        subprocesses(&self.schedule())
    }

    /// Number of scheduled weeks (0 for low complexity)
    pub fn weeks(&self) -> usize {
        self.table().map(|t| t.len() * 4).unwrap_or(0)
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComplexityTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ComplexityTier::from_project(s).ok_or_else(|| ValidationError::InvalidComplexity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        let d = lookup(8).unwrap();
        assert_eq!(d.percentage, 10);
        assert_eq!(d.subprocess, "Jurídico");
        assert!(matches!(lookup(18), Err(PlannerError::NotFound(_))));
        assert!(lookup(0).is_err());
    }

    #[test]
    fn test_catalog_ids_are_unique_and_ordered() {
        let ids: Vec<u32> = catalog().iter().map(|d| d.id).collect();
        assert_eq!(ids, (1..=17).collect::<Vec<_>>());
        assert!(catalog().iter().all(|d| d.percentage <= 100));
    }

    #[test]
    fn test_reduce_single_and_multiple() {
        let week = reduce_week(&[4, 3, 2]);
        assert_eq!(week.percentage, 16);
        assert_eq!(
            week.subprocess,
            "Análisis de Riesgos, Modelo Operativo, Especificación"
        );
    }

    #[test]
    fn test_reduce_empty_week_is_general() {
        let week = reduce_week(&[]);
        assert_eq!(week.percentage, 0);
        assert_eq!(week.subprocess, GENERAL_SUBPROCESS);
    }

    #[test]
    fn test_reduce_unknown_id_is_lenient() {
        let week = reduce_week(&[99, 5]);
        assert_eq!(week.percentage, 9);
        assert_eq!(week.subprocess, "RFP");

        let only_unknown = reduce_week(&[42, 99]);
        assert_eq!(only_unknown.percentage, 0);
        assert_eq!(only_unknown.subprocess, GENERAL_SUBPROCESS);
    }

    #[test]
    fn test_reduce_keeps_duplicates() {
        let week = reduce_week(&[9, 9]);
        assert_eq!(week.percentage, 10);
        assert_eq!(week.subprocess, "Desarrollo, Desarrollo");
    }

    #[test]
    fn test_flatten_preserves_order() {
        let weeks = medium_complexity_schedule();
        assert_eq!(weeks[0].subprocess, "Diagnóstico");
        assert_eq!(weeks[3].subprocess, "Especificación, Modelo Operativo");
        assert_eq!(weeks[3].percentage, 14);
        // month 4, week 1 is the rest week
        assert_eq!(weeks[12].percentage, 0);
        assert_eq!(weeks[35].subprocess, GENERAL_SUBPROCESS);
    }

    #[test]
    fn test_high_schedule_known_weeks() {
        let weeks = high_complexity_schedule();
        assert_eq!(weeks.len(), 48);
        // month 11, week 4: 16, 15, 14, 12
        assert_eq!(weeks[43].percentage, 38);
        assert_eq!(
            weeks[43].subprocess,
            "Entrega Operación, Gestión Cambio, Gestión Procesos, Estabilización"
        );
        assert_eq!(weeks[16].subprocess, GENERAL_SUBPROCESS);
    }

    #[test]
    fn test_deliverable_names_fallback() {
        assert_eq!(
            deliverable_names(&[5, 77]),
            vec!["RFP".to_string(), "Entregable 77".to_string()]
        );
    }

    #[test]
    fn test_schedule_with_names_shape() {
        let named = schedule_with_names(&MEDIUM_COMPLEXITY_SCHEDULE);
        assert_eq!(named.len(), 9);
        assert!(named.iter().all(|m| m.len() == 4));
        let week = &named[1][0];
        assert_eq!(week.deliverables, vec![2, 3, 4]);
        assert_eq!(week.deliverable_names.len(), 3);
        assert_eq!(week.percentage, 16);
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!(ComplexityTier::from_project("MEDIA"), Some(ComplexityTier::Media));
        assert_eq!(ComplexityTier::from_project(" alta "), Some(ComplexityTier::Alta));
        assert_eq!(ComplexityTier::from_project("Baja"), Some(ComplexityTier::Baja));
        assert_eq!(ComplexityTier::from_project("extrema"), None);
        assert!("nada".parse::<ComplexityTier>().is_err());
    }

    #[test]
    fn test_tier_tables() {
        assert_eq!(ComplexityTier::Media.weeks(), 36);
        assert_eq!(ComplexityTier::Alta.weeks(), 48);
        assert_eq!(ComplexityTier::Baja.weeks(), 0);
        assert!(ComplexityTier::Baja.schedule().is_empty());
        assert!(!ComplexityTier::Baja.has_schedule());
        assert_eq!(ComplexityTier::Alta.wire_name(), "alta");
    }
}
