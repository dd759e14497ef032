//! Client-side state: the latest backend snapshot, load tracking and filters
//!
//! A [`Snapshot`] is built in one go from the backend replies and replaces the
//! previous one wholesale. Everything the screens show is derived from it by
//! the pure selectors at the bottom of this module.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::api::{
    ApiClient, CapacityGrid, PersonBucket, Project, Resource, ResourcesVsGrid, WeeklyAverages, ALL,
};
use crate::error::Result;
use crate::weeks;

/// Backend values below 1 are fractions; scale them to percent
pub fn normalize_pct(value: f64) -> f64 {
    if value < 1.0 {
        value * 100.0
    } else {
        value
    }
}

/// Free capacity for a load, floored at zero
pub fn availability(load: f64) -> f64 {
    (100.0 - normalize_pct(load)).max(0.0)
}

// ===== LOAD STATE =====

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

// ===== SNAPSHOT =====

#[derive(Debug, Clone, PartialEq)]
pub struct CapacityRow {
    pub id: Option<i64>,
    pub resource: String,
    pub classification: String,
    pub values: HashMap<String, f64>,
}

impl CapacityRow {
    pub fn load(&self, label: &str) -> f64 {
        self.values.get(label).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRow {
    pub id: Option<i64>,
    pub resource: String,
    pub by_week: HashMap<String, f64>,
}

impl AvailabilityRow {
    pub fn available(&self, label: &str) -> f64 {
        self.by_week.get(label).copied().unwrap_or(100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLoadRow {
    pub id: Option<i64>,
    pub name: String,
    pub values: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub id: Option<i64>,
    pub name: String,
    pub avg_pct: f64,
    pub by_week: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub resources: Vec<Resource>,
    pub projects: Vec<Project>,
    pub resource_ids: HashMap<String, i64>,
    pub project_ids: HashMap<String, i64>,
    pub capacity_weeks: Vec<String>,
    pub capacity_rows: Vec<CapacityRow>,
    pub availability_rows: Vec<AvailabilityRow>,
    pub resources_vs: ResourcesVsGrid,
    pub months: Vec<String>,
    pub project_weeks: Vec<String>,
    pub project_rows: Vec<ProjectLoadRow>,
    pub project_summary: Vec<ProjectSummary>,
}

impl Snapshot {
    /// Assembles a snapshot from the raw backend replies
    pub fn build(
        resources: Vec<Resource>,
        projects: Vec<Project>,
        capacity: CapacityGrid,
        resources_vs: ResourcesVsGrid,
        weekly: WeeklyAverages,
    ) -> Self {
        let resource_ids: HashMap<String, i64> =
            resources.iter().map(|r| (r.name.clone(), r.id)).collect();
        let project_ids: HashMap<String, i64> =
            projects.iter().map(|p| (p.name.clone(), p.id)).collect();

        // by_resource is a BTreeMap, so iteration is already sorted by name
        let capacity_rows: Vec<CapacityRow> = capacity
            .by_resource
            .iter()
            .map(|(name, values)| CapacityRow {
                id: resource_ids.get(name).copied(),
                resource: name.clone(),
                classification: ALL.to_string(),
                values: values.iter().map(|(k, v)| (k.clone(), normalize_pct(*v))).collect(),
            })
            .collect();

        let availability_rows: Vec<AvailabilityRow> = capacity
            .by_resource
            .iter()
            .map(|(name, values)| AvailabilityRow {
                id: resource_ids.get(name).copied(),
                resource: name.clone(),
                by_week: values.iter().map(|(k, v)| (k.clone(), availability(*v))).collect(),
            })
            .collect();

        let month_source = if resources_vs.labels.is_empty() {
            &capacity.labels
        } else {
            &resources_vs.labels
        };
        let months = unique_months(month_source);

        let project_weeks = if weekly.labels.is_empty() {
            capacity.labels.clone()
        } else {
            weekly.labels.clone()
        };

        let mut project_rows: Vec<ProjectLoadRow> = weekly
            .projects
            .iter()
            .map(|p| {
                let mut values: HashMap<String, f64> = p
                    .by_week
                    .iter()
                    .map(|(k, v)| (k.clone(), normalize_pct(*v)))
                    .collect();
                for label in &project_weeks {
                    values.entry(label.clone()).or_insert(0.0);
                }
                ProjectLoadRow {
                    id: project_ids.get(&p.name).copied(),
                    name: p.name.clone(),
                    values,
                }
            })
            .collect();
        project_rows.sort_by(|a, b| a.name.cmp(&b.name));

        let mut project_summary: Vec<ProjectSummary> = weekly
            .projects
            .iter()
            .map(|p| ProjectSummary {
                id: project_ids.get(&p.name).copied(),
                name: p.name.clone(),
                avg_pct: normalize_pct(p.avg_pct),
                by_week: p
                    .by_week
                    .iter()
                    .map(|(k, v)| (k.clone(), normalize_pct(*v)))
                    .collect(),
            })
            .collect();
        project_summary.sort_by(|a, b| b.avg_pct.total_cmp(&a.avg_pct));

        Snapshot {
            resources,
            projects,
            resource_ids,
            project_ids,
            capacity_weeks: capacity.labels,
            capacity_rows,
            availability_rows,
            resources_vs,
            months,
            project_weeks,
            project_rows,
            project_summary,
        }
    }
}

/// Month keys of `labels`, unique, in first-seen order
pub fn unique_months(labels: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .map(|l| weeks::month_key(l).to_string())
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

/// Fetches everything the screens need for one window
pub async fn fetch_snapshot(client: &ApiClient, start: NaiveDate, weeks: u32) -> Result<Snapshot> {
    debug!(start = %start, weeks, "Fetching snapshot");

    let (resources, projects, capacity, resources_vs, weekly) = tokio::try_join!(
        client.list_resources(),
        client.list_projects(),
        client.capacity_window(start, weeks),
        client.resources_vs_weekly(start, weeks, None),
        client.projects_weekly_avg(start, weeks),
    )?;

    Ok(Snapshot::build(resources, projects, capacity, resources_vs, weekly))
}

// ===== APP STATE =====

#[derive(Debug, Clone)]
pub struct AppState {
    load: LoadState,
    pub snapshot: Snapshot,
    pub window_start: NaiveDate,
    pub window_weeks: u32,
    pub assignment_filter: AssignmentFilter,
    pub capacity_filter: CapacityFilter,
    pub resources_vs_filter: ResourcesVsFilter,
}

impl AppState {
    pub fn new(window_start: NaiveDate, window_weeks: u32) -> Self {
        Self {
            load: LoadState::Uninitialized,
            snapshot: Snapshot::default(),
            window_start: weeks::monday_of(window_start),
            window_weeks,
            assignment_filter: AssignmentFilter::default(),
            capacity_filter: CapacityFilter::default(),
            resources_vs_filter: ResourcesVsFilter::default(),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_ready(&self) -> bool {
        self.load == LoadState::Ready
    }

    /// Claims the initial load. Returns false when a load already ran or is running.
    pub fn begin_load(&mut self) -> bool {
        match self.load {
            LoadState::Uninitialized | LoadState::Failed(_) => {
                self.load = LoadState::Loading;
                true
            }
            LoadState::Loading | LoadState::Ready => false,
        }
    }

    /// Explicit user refresh; only refused while a load is in flight
    pub fn force_refresh(&mut self) -> bool {
        if self.load == LoadState::Loading {
            return false;
        }
        self.load = LoadState::Loading;
        true
    }

    /// Stores a fetch result. A failure keeps the previous snapshot.
    pub fn finish_load(&mut self, result: Result<Snapshot>) {
        match result {
            Ok(snapshot) => {
                info!(
                    resources = snapshot.resources.len(),
                    projects = snapshot.projects.len(),
                    weeks = snapshot.capacity_weeks.len(),
                    "Snapshot loaded"
                );
                self.snapshot = snapshot;
                self.load = LoadState::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Snapshot load failed");
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Runs the initial load once; later calls are no-ops until a failure
    pub async fn ensure_loaded(&mut self, client: &ApiClient) {
        if self.begin_load() {
            let result = fetch_snapshot(client, self.window_start, self.window_weeks).await;
            self.finish_load(result);
        }
    }

    pub async fn refresh(&mut self, client: &ApiClient) {
        if self.force_refresh() {
            let result = fetch_snapshot(client, self.window_start, self.window_weeks).await;
            self.finish_load(result);
        }
    }

    pub fn filtered_projects(&self) -> Vec<&Project> {
        filter_projects(&self.snapshot.projects, &self.assignment_filter)
    }

    pub fn filtered_capacity(&self) -> Vec<&CapacityRow> {
        filter_capacity(&self.snapshot.capacity_rows, &self.capacity_filter)
    }

    pub fn visible_capacity_weeks(&self) -> Vec<&String> {
        weeks_for_month(&self.snapshot.capacity_weeks, &self.capacity_filter.month)
    }

    pub fn filtered_people(&self) -> Vec<(&String, &PersonBucket)> {
        filter_people(&self.snapshot.resources_vs.by_person, &self.resources_vs_filter)
    }
}

// ===== FILTERS =====

fn is_all(value: &str) -> bool {
    value.is_empty() || value == ALL
}

/// Project list filter; empty lists and `Todos` mean no restriction
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentFilter {
    pub phase: Vec<String>,
    pub classification: Vec<String>,
    pub complexity: Vec<String>,
    pub has_resource: String,
    pub search: String,
}

impl Default for AssignmentFilter {
    fn default() -> Self {
        Self {
            phase: Vec::new(),
            classification: Vec::new(),
            complexity: Vec::new(),
            has_resource: ALL.to_string(),
            search: String::new(),
        }
    }
}

impl AssignmentFilter {
    pub fn matches(&self, project: &Project) -> bool {
        if !self.phase.is_empty() && !self.phase.contains(&project.phase) {
            return false;
        }
        if !self.classification.is_empty() && !self.classification.contains(&project.classification) {
            return false;
        }
        if !self.complexity.is_empty()
            && !self
                .complexity
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(project.complexity.trim()))
        {
            return false;
        }
        if !is_all(&self.has_resource) && self.has_resource != project.has_resource_label() {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() {
            let hit = [&project.name, &project.classification, &project.phase]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn toggle(list: &mut Vec<String>, value: &str) {
        if let Some(pos) = list.iter().position(|v| v == value) {
            list.remove(pos);
        } else {
            list.push(value.to_string());
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub fn filter_projects<'a>(projects: &'a [Project], filter: &AssignmentFilter) -> Vec<&'a Project> {
    projects.iter().filter(|p| filter.matches(p)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapacityFilter {
    pub month: String,
    pub classifications: Vec<String>,
    pub resource: String,
}

impl Default for CapacityFilter {
    fn default() -> Self {
        Self {
            month: ALL.to_string(),
            classifications: Vec::new(),
            resource: ALL.to_string(),
        }
    }
}

impl CapacityFilter {
    pub fn matches(&self, row: &CapacityRow) -> bool {
        if !is_all(&self.month) && !row.values.keys().any(|label| label.contains(&self.month)) {
            return false;
        }
        // Rows not tied to one classification pass every chip
        if !self.classifications.is_empty()
            && row.classification != ALL
            && !self.classifications.contains(&row.classification)
        {
            return false;
        }
        if !is_all(&self.resource) && row.resource != self.resource {
            return false;
        }
        true
    }
}

pub fn filter_capacity<'a>(rows: &'a [CapacityRow], filter: &CapacityFilter) -> Vec<&'a CapacityRow> {
    rows.iter().filter(|r| filter.matches(r)).collect()
}

/// Labels belonging to `month` (`Todos` keeps all)
pub fn weeks_for_month<'a>(labels: &'a [String], month: &str) -> Vec<&'a String> {
    labels
        .iter()
        .filter(|l| is_all(month) || weeks::month_key(l) == month)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourcesVsFilter {
    pub person: String,
    pub work_type: String,
}

impl Default for ResourcesVsFilter {
    fn default() -> Self {
        Self {
            person: ALL.to_string(),
            work_type: ALL.to_string(),
        }
    }
}

pub fn filter_people<'a>(
    by_person: &'a BTreeMap<String, PersonBucket>,
    filter: &ResourcesVsFilter,
) -> Vec<(&'a String, &'a PersonBucket)> {
    by_person
        .iter()
        .filter(|(name, _)| is_all(&filter.person) || **name == filter.person)
        .collect()
}

/// Project types to show for the current filter
pub fn visible_types<'a>(types: &'a [String], filter: &ResourcesVsFilter) -> Vec<&'a String> {
    types
        .iter()
        .filter(|t| is_all(&filter.work_type) || **t == filter.work_type)
        .collect()
}

// ===== LOAD BANDS & STATISTICS =====

/// Cell color band on the capacity grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadLevel {
    Low,
    Medium,
    High,
}

pub fn load_level(load: f64) -> LoadLevel {
    if load >= 80.0 {
        LoadLevel::High
    } else if load >= 50.0 {
        LoadLevel::Medium
    } else {
        LoadLevel::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadBand {
    Available,
    Moderate,
    Overloaded,
}

impl WorkloadBand {
    pub fn from_load(load: f64) -> Self {
        if load >= 80.0 {
            WorkloadBand::Overloaded
        } else if load >= 50.0 {
            WorkloadBand::Moderate
        } else {
            WorkloadBand::Available
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkloadBand::Available => "Disponible",
            WorkloadBand::Moderate => "Moderado",
            WorkloadBand::Overloaded => "Sobrecargado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" | "disponible" => Some(WorkloadBand::Available),
            "moderate" | "moderado" => Some(WorkloadBand::Moderate),
            "overloaded" | "sobrecargado" => Some(WorkloadBand::Overloaded),
            _ => None,
        }
    }
}

/// Weeks averaged for a resource's current workload
pub const WORKLOAD_WEEKS: usize = 4;

/// Mean load over the first four weeks of the window
pub fn current_load(row: &AvailabilityRow, labels: &[String]) -> f64 {
    let window: Vec<&String> = labels.iter().take(WORKLOAD_WEEKS).collect();
    if window.is_empty() {
        return 0.0;
    }
    let total: f64 = window.iter().map(|l| 100.0 - row.available(l)).sum();
    total / window.len() as f64
}

pub fn filter_by_workload<'a>(
    rows: &'a [AvailabilityRow],
    labels: &[String],
    band: Option<WorkloadBand>,
) -> Vec<&'a AvailabilityRow> {
    rows.iter()
        .filter(|r| band.map_or(true, |b| WorkloadBand::from_load(current_load(r, labels)) == b))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectStats {
    pub total: usize,
    pub with_resource: usize,
    pub by_classification: BTreeMap<String, usize>,
    pub by_phase: BTreeMap<String, usize>,
    pub by_complexity: BTreeMap<String, usize>,
}

pub fn project_statistics<'a>(projects: impl IntoIterator<Item = &'a Project>) -> ProjectStats {
    let mut stats = ProjectStats::default();
    for p in projects {
        stats.total += 1;
        if p.has_resource {
            stats.with_resource += 1;
        }
        *stats.by_classification.entry(p.classification.clone()).or_default() += 1;
        *stats.by_phase.entry(p.phase.clone()).or_default() += 1;
        *stats.by_complexity.entry(p.complexity.clone()).or_default() += 1;
    }
    stats
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceStats {
    pub total: usize,
    pub average_load: f64,
    pub available: usize,
    pub moderate: usize,
    pub overloaded: usize,
}

pub fn resource_statistics(rows: &[AvailabilityRow], labels: &[String]) -> ResourceStats {
    let mut stats = ResourceStats {
        total: rows.len(),
        ..ResourceStats::default()
    };
    if rows.is_empty() {
        return stats;
    }

    let mut sum = 0.0;
    for row in rows {
        let load = current_load(row, labels);
        sum += load;
        match WorkloadBand::from_load(load) {
            WorkloadBand::Available => stats.available += 1,
            WorkloadBand::Moderate => stats.moderate += 1,
            WorkloadBand::Overloaded => stats.overloaded += 1,
        }
    }
    stats.average_load = sum / rows.len() as f64;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProjectAverage;

    fn labels() -> Vec<String> {
        vec![
            "Agosto_25:Sem 1".to_string(),
            "Agosto_25:Sem 2".to_string(),
            "Agosto_25:Sem 3".to_string(),
            "Agosto_25:Sem 4".to_string(),
            "Septiembre_25:Sem 1".to_string(),
        ]
    }

    fn project(id: i64, name: &str, classification: &str, phase: &str, complexity: &str, has: bool) -> Project {
        Project {
            id,
            name: name.to_string(),
            classification: classification.to_string(),
            phase: phase.to_string(),
            complexity: complexity.to_string(),
            has_resource: has,
            created_at: None,
        }
    }

    fn sample_snapshot() -> Snapshot {
        let resources = vec![
            Resource { id: 1, name: "Luis".to_string(), unit: None },
            Resource { id: 2, name: "Ana".to_string(), unit: Some(String::new()) },
        ];
        let projects = vec![
            project(10, "Core", "Proyecto", "Ejecución", "Alta", true),
            project(11, "Pagos", "Estrategia", "Viabilidad", "Media", false),
        ];

        let mut by_resource = BTreeMap::new();
        by_resource.insert(
            "Luis".to_string(),
            labels().into_iter().zip([0.75, 0.5, 40.0, 120.0, 0.0]).collect(),
        );
        by_resource.insert(
            "Ana".to_string(),
            labels().into_iter().zip([10.0, 20.0, 30.0, 40.0, 50.0]).collect(),
        );
        let capacity = CapacityGrid { labels: labels(), by_resource };

        let weekly = WeeklyAverages {
            labels: labels(),
            projects: vec![
                ProjectAverage {
                    name: "Pagos".to_string(),
                    avg_pct: 0.25,
                    by_week: [("Agosto_25:Sem 1".to_string(), 0.5)].into_iter().collect(),
                },
                ProjectAverage {
                    name: "Core".to_string(),
                    avg_pct: 40.0,
                    by_week: HashMap::new(),
                },
            ],
        };

        Snapshot::build(resources, projects, capacity, ResourcesVsGrid::default(), weekly)
    }

    #[test]
    fn test_normalize_heuristic() {
        assert_eq!(normalize_pct(0.5), 50.0);
        assert_eq!(normalize_pct(0.0), 0.0);
        assert_eq!(normalize_pct(1.0), 1.0);
        assert_eq!(normalize_pct(75.0), 75.0);
        assert_eq!(availability(120.0), 0.0);
        assert_eq!(availability(0.25), 75.0);
    }

    #[test]
    fn test_snapshot_capacity_sorted_and_normalized() {
        let snap = sample_snapshot();
        let names: Vec<&str> = snap.capacity_rows.iter().map(|r| r.resource.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Luis"]);

        let luis = &snap.capacity_rows[1];
        assert_eq!(luis.id, Some(1));
        assert_eq!(luis.load("Agosto_25:Sem 1"), 75.0);
        assert_eq!(luis.load("Agosto_25:Sem 2"), 50.0);

        let avail = &snap.availability_rows[1];
        assert_eq!(avail.available("Agosto_25:Sem 1"), 25.0);
        assert_eq!(avail.available("Agosto_25:Sem 4"), 0.0);
        assert_eq!(avail.available("Septiembre_25:Sem 1"), 100.0);
    }

    #[test]
    fn test_snapshot_months_and_projects() {
        let snap = sample_snapshot();
        assert_eq!(snap.months, vec!["Agosto_25", "Septiembre_25"]);

        let names: Vec<&str> = snap.project_rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Core", "Pagos"]);
        assert_eq!(snap.project_rows[0].values.len(), 5);
        assert_eq!(snap.project_rows[0].values["Agosto_25:Sem 3"], 0.0);
        assert_eq!(snap.project_rows[1].values["Agosto_25:Sem 1"], 50.0);

        assert_eq!(snap.project_summary[0].name, "Core");
        assert_eq!(snap.project_summary[1].avg_pct, 25.0);
        assert_eq!(snap.project_ids["Pagos"], 11);
    }

    #[test]
    fn test_load_state_machine() {
        let mut state = AppState::new(NaiveDate::from_ymd_opt(2025, 8, 13).unwrap(), 12);
        assert_eq!(state.window_start, NaiveDate::from_ymd_opt(2025, 8, 11).unwrap());
        assert!(state.begin_load());
        assert!(!state.begin_load());

        state.finish_load(Err(crate::error::PlannerError::Other("down".to_string())));
        assert_eq!(state.load_state(), &LoadState::Failed("down".to_string()));
        assert!(state.begin_load());

        state.finish_load(Ok(sample_snapshot()));
        assert!(state.is_ready());
        assert!(!state.begin_load());
        assert!(state.force_refresh());
        assert!(!state.force_refresh());
    }

    #[test]
    fn test_failed_refresh_keeps_snapshot() {
        let mut state = AppState::new(NaiveDate::from_ymd_opt(2025, 8, 13).unwrap(), 12);
        state.begin_load();
        state.finish_load(Ok(sample_snapshot()));
        state.force_refresh();
        state.finish_load(Err(crate::error::PlannerError::Other("timeout".to_string())));
        assert_eq!(state.snapshot.resources.len(), 2);
    }

    #[test]
    fn test_assignment_filter() {
        let snap = sample_snapshot();
        let mut filter = AssignmentFilter::default();
        assert_eq!(filter_projects(&snap.projects, &filter).len(), 2);

        filter.complexity = vec!["alta".to_string()];
        let hits = filter_projects(&snap.projects, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Core");

        filter.clear();
        filter.has_resource = "No".to_string();
        assert_eq!(filter_projects(&snap.projects, &filter)[0].name, "Pagos");

        filter.clear();
        filter.search = "VIAB".to_string();
        assert_eq!(filter_projects(&snap.projects, &filter)[0].name, "Pagos");

        filter.clear();
        AssignmentFilter::toggle(&mut filter.phase, "Gestión");
        assert!(filter_projects(&snap.projects, &filter).is_empty());
        AssignmentFilter::toggle(&mut filter.phase, "Gestión");
        assert!(filter.phase.is_empty());
    }

    #[test]
    fn test_capacity_filter() {
        let snap = sample_snapshot();
        let mut filter = CapacityFilter::default();
        assert_eq!(filter_capacity(&snap.capacity_rows, &filter).len(), 2);

        filter.resource = "Luis".to_string();
        assert_eq!(filter_capacity(&snap.capacity_rows, &filter).len(), 1);

        filter.resource = ALL.to_string();
        filter.month = "Octubre_25".to_string();
        assert!(filter_capacity(&snap.capacity_rows, &filter).is_empty());

        filter.month = "Agosto_25".to_string();
        filter.classifications = vec!["Proyecto".to_string()];
        assert_eq!(filter_capacity(&snap.capacity_rows, &filter).len(), 2);

        let weeks = weeks_for_month(&snap.capacity_weeks, "Septiembre_25");
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks_for_month(&snap.capacity_weeks, ALL).len(), 5);
    }

    #[test]
    fn test_people_filter() {
        let mut by_person = BTreeMap::new();
        by_person.insert("Ana".to_string(), PersonBucket::default());
        by_person.insert("Luis".to_string(), PersonBucket::default());

        let mut filter = ResourcesVsFilter::default();
        assert_eq!(filter_people(&by_person, &filter).len(), 2);
        filter.person = "Ana".to_string();
        let hits = filter_people(&by_person, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "Ana");

        let types = vec!["Proyecto".to_string(), "Admon".to_string()];
        filter.work_type = "Admon".to_string();
        assert_eq!(visible_types(&types, &filter), vec![&types[1]]);
    }

    #[test]
    fn test_bands_and_statistics() {
        assert_eq!(load_level(80.0), LoadLevel::High);
        assert_eq!(load_level(50.0), LoadLevel::Medium);
        assert_eq!(load_level(49.9), LoadLevel::Low);
        assert_eq!(WorkloadBand::parse("overloaded"), Some(WorkloadBand::Overloaded));

        let snap = sample_snapshot();
        let labels = snap.capacity_weeks.clone();
        // Ana: loads 10, 20, 30, 40 -> 25
        assert_eq!(current_load(&snap.availability_rows[0], &labels), 25.0);
        // Luis: 75, 50, 40, 100 -> 66.25
        assert_eq!(current_load(&snap.availability_rows[1], &labels), 66.25);

        let moderate = filter_by_workload(&snap.availability_rows, &labels, Some(WorkloadBand::Moderate));
        assert_eq!(moderate.len(), 1);
        assert_eq!(moderate[0].resource, "Luis");

        let stats = resource_statistics(&snap.availability_rows, &labels);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.available, 1);
        assert_eq!(stats.moderate, 1);
        assert_eq!(stats.average_load, 45.625);

        let pstats = project_statistics(&snap.projects);
        assert_eq!(pstats.total, 2);
        assert_eq!(pstats.with_resource, 1);
        assert_eq!(pstats.by_classification["Estrategia"], 1);
    }
}
