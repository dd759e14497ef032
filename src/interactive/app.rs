//! Application state and key handling for the interactive UI

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use planner::api::{ApiClient, Project, ALL};
use planner::assignment::{self, SubmitOutcome};
use planner::forms::{CLASSIFICATIONS, COMPLEXITIES, HAS_RESOURCE_OPTIONS, PHASES};
use planner::state::{filter_by_workload, AppState, AvailabilityRow, LoadState, WorkloadBand};
use planner::weeks::DEFAULT_WINDOW_WEEKS;

use super::events::AppEvent;
use super::form::{
    AssignmentField, AssignmentFormState, ProjectField, ProjectFormState, ResourceFormState, TextInput,
};
use super::messages::{MessageLog, MessageType};

/// Top-level screens, switched with Tab or 1-3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Projects,
    Capacity,
    Resources,
}

impl Screen {
    pub fn all() -> [Screen; 3] {
        [Screen::Projects, Screen::Capacity, Screen::Resources]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Projects => "Proyectos",
            Screen::Capacity => "Capacidad",
            Screen::Resources => "Recursos",
        }
    }

    fn next(&self) -> Screen {
        match self {
            Screen::Projects => Screen::Capacity,
            Screen::Capacity => Screen::Resources,
            Screen::Resources => Screen::Projects,
        }
    }

    fn previous(&self) -> Screen {
        match self {
            Screen::Projects => Screen::Resources,
            Screen::Capacity => Screen::Projects,
            Screen::Resources => Screen::Capacity,
        }
    }
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    /// Typing into the project search box
    Search,
    NewAssignment,
    NewProject,
    NewResource,
    ConfirmDelete,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteRequest {
    Project { id: i64, name: String },
    Resource { id: i64, name: String },
}

impl DeleteRequest {
    pub fn describe(&self) -> String {
        match self {
            DeleteRequest::Project { name, .. } => format!("el proyecto \"{}\"", name),
            DeleteRequest::Resource { name, .. } => format!("el recurso \"{}\"", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Load,
    Refresh,
}

pub struct App {
    pub client: ApiClient,
    pub state: AppState,
    pub screen: Screen,
    pub mode: AppMode,
    pub messages: MessageLog,
    /// Highlighted row of the current screen's list
    pub selected: usize,
    pub today: NaiveDate,
    pub loading_message: String,
    /// Workload band filter on the resources screen
    pub workload: Option<WorkloadBand>,
    pub assignment_form: Option<AssignmentFormState>,
    pub project_form: Option<ProjectFormState>,
    pub resource_form: Option<ResourceFormState>,
    pub delete_request: Option<DeleteRequest>,
    pending: Option<Pending>,
}

impl App {
    /// The initial load runs on the first pass of the event loop
    pub fn new(client: ApiClient) -> Self {
        let today = Local::now().date_naive();
        let mut messages = MessageLog::new();
        messages.push(MessageType::Info, format!("Conectando a {}", client.base_url()));

        App {
            client,
            state: AppState::new(today, DEFAULT_WINDOW_WEEKS),
            screen: Screen::Projects,
            mode: AppMode::Normal,
            messages,
            selected: 0,
            today,
            loading_message: "Cargando datos...".to_string(),
            workload: None,
            assignment_form: None,
            project_form: None,
            resource_form: None,
            delete_request: None,
            pending: Some(Pending::Load),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some() || *self.state.load_state() == LoadState::Loading
    }

    pub fn has_pending_load(&self) -> bool {
        self.pending.is_some()
    }

    /// Asks the loop for a fresh snapshot after the next draw
    pub fn request_refresh(&mut self) {
        self.pending = Some(Pending::Refresh);
        self.loading_message = "Actualizando datos...".to_string();
    }

    /// Runs the queued load, if any, and reports how it went
    pub async fn run_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending {
            Pending::Load => self.state.ensure_loaded(&self.client).await,
            Pending::Refresh => self.state.refresh(&self.client).await,
        }

        match self.state.load_state() {
            LoadState::Ready => {
                let snapshot = &self.state.snapshot;
                self.messages.push(
                    MessageType::Success,
                    format!(
                        "Datos cargados: {} proyectos, {} recursos, {} semanas",
                        snapshot.projects.len(),
                        snapshot.resources.len(),
                        snapshot.capacity_weeks.len()
                    ),
                );
            }
            LoadState::Failed(e) => {
                let text = format!("No se pudieron cargar los datos: {}", e);
                self.messages.push(MessageType::Error, text);
            }
            LoadState::Uninitialized | LoadState::Loading => {}
        }
        self.clamp_selection();
    }

    // ===== SELECTORS =====

    pub fn visible_projects(&self) -> Vec<&Project> {
        self.state.filtered_projects()
    }

    pub fn resource_rows(&self) -> Vec<&AvailabilityRow> {
        filter_by_workload(
            &self.state.snapshot.availability_rows,
            &self.state.snapshot.capacity_weeks,
            self.workload,
        )
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.visible_projects().get(self.selected).copied()
    }

    pub fn selected_resource_row(&self) -> Option<&AvailabilityRow> {
        self.resource_rows().get(self.selected).copied()
    }

    fn list_len(&self) -> usize {
        match self.screen {
            Screen::Projects => self.visible_projects().len(),
            Screen::Capacity => self.state.filtered_capacity().len(),
            Screen::Resources => self.resource_rows().len(),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.list_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // ===== EVENTS =====

    /// Returns false when the app should exit
    pub async fn handle_event(&mut self, event: AppEvent) -> Result<bool> {
        let key = match event {
            AppEvent::Key(key) => key,
            AppEvent::Resize => return Ok(true),
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(false);
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_mode(key),
            AppMode::Search => self.handle_search_mode(key),
            AppMode::Help => {
                self.mode = AppMode::Normal;
                Ok(true)
            }
            AppMode::NewAssignment => self.handle_assignment_mode(key).await,
            AppMode::NewProject => self.handle_project_mode(key).await,
            AppMode::NewResource => self.handle_resource_mode(key).await,
            AppMode::ConfirmDelete => self.handle_delete_mode(key).await,
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(false),
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Tab => self.switch_screen(self.screen.next()),
            KeyCode::BackTab => self.switch_screen(self.screen.previous()),
            KeyCode::Char('1') => self.switch_screen(Screen::Projects),
            KeyCode::Char('2') => self.switch_screen(Screen::Capacity),
            KeyCode::Char('3') => self.switch_screen(Screen::Resources),
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.list_len() {
                    self.selected += 1;
                }
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if *self.state.load_state() == LoadState::Loading {
                    self.messages.push(MessageType::Warning, "Ya hay una carga en curso");
                } else {
                    self.request_refresh();
                }
            }
            _ => match self.screen {
                Screen::Projects => self.handle_projects_key(key),
                Screen::Capacity => self.handle_capacity_key(key),
                Screen::Resources => self.handle_resources_key(key),
            },
        }
        Ok(true)
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.selected = 0;
    }

    fn handle_projects_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.open_assignment_form(),
            KeyCode::Char('n') => {
                self.project_form = Some(ProjectFormState::new());
                self.mode = AppMode::NewProject;
            }
            KeyCode::Char('d') => {
                let request = self.selected_project().map(|p| DeleteRequest::Project {
                    id: p.id,
                    name: p.name.clone(),
                });
                if let Some(request) = request {
                    self.confirm_delete(request);
                }
            }
            KeyCode::Char('/') => self.mode = AppMode::Search,
            code => {
                let filter = &mut self.state.assignment_filter;
                match code {
                    KeyCode::Char('c') => cycle_chip(&mut filter.classification, &CLASSIFICATIONS),
                    KeyCode::Char('p') => cycle_chip(&mut filter.phase, &PHASES),
                    KeyCode::Char('x') => cycle_chip(&mut filter.complexity, &COMPLEXITIES),
                    KeyCode::Char('s') => {
                        filter.has_resource = cycle_value(&HAS_RESOURCE_OPTIONS, &filter.has_resource)
                    }
                    KeyCode::Char('f') => {
                        filter.clear();
                        self.messages.push(MessageType::Info, "Filtros limpiados");
                    }
                    _ => {}
                }
            }
        }
        self.clamp_selection();
    }

    fn handle_capacity_key(&mut self, key: KeyEvent) {
        let months: Vec<&str> = self.state.snapshot.months.iter().map(String::as_str).collect();
        let filter = &mut self.state.capacity_filter;
        match key.code {
            KeyCode::Right | KeyCode::Char('l') => filter.month = cycle_value(&months, &filter.month),
            KeyCode::Left | KeyCode::Char('h') => {
                filter.month = cycle_value_back(&months, &filter.month)
            }
            KeyCode::Char('c') => cycle_chip(&mut filter.classifications, &CLASSIFICATIONS),
            _ => {}
        }
        self.clamp_selection();
    }

    fn handle_resources_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Left | KeyCode::Char('h') => {
                let types: Vec<&str> = self
                    .state
                    .snapshot
                    .resources_vs
                    .types
                    .iter()
                    .map(String::as_str)
                    .collect();
                let current = &self.state.resources_vs_filter.work_type;
                let forward = matches!(key.code, KeyCode::Right | KeyCode::Char('l'));
                let next = if forward {
                    cycle_value(&types, current)
                } else {
                    cycle_value_back(&types, current)
                };
                self.state.resources_vs_filter.work_type = next;
            }
            KeyCode::Char('w') => {
                self.workload = match self.workload {
                    None => Some(WorkloadBand::Available),
                    Some(WorkloadBand::Available) => Some(WorkloadBand::Moderate),
                    Some(WorkloadBand::Moderate) => Some(WorkloadBand::Overloaded),
                    Some(WorkloadBand::Overloaded) => None,
                };
            }
            KeyCode::Char('n') => {
                self.resource_form = Some(ResourceFormState::default());
                self.mode = AppMode::NewResource;
            }
            KeyCode::Char('d') => {
                let request = self.selected_resource_row().and_then(|row| {
                    row.id.map(|id| DeleteRequest::Resource {
                        id,
                        name: row.resource.clone(),
                    })
                });
                if let Some(request) = request {
                    self.confirm_delete(request);
                }
            }
            _ => {}
        }
        self.clamp_selection();
    }

    fn handle_search_mode(&mut self, key: KeyEvent) -> Result<bool> {
        let search = &mut self.state.assignment_filter.search;
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.mode = AppMode::Normal,
            KeyCode::Backspace => {
                search.pop();
            }
            KeyCode::Char(c) => search.push(c),
            _ => {}
        }
        self.clamp_selection();
        Ok(true)
    }

    fn confirm_delete(&mut self, request: DeleteRequest) {
        self.messages.clear();
        self.messages.push(
            MessageType::Warning,
            format!(
                "¿Eliminar {} y todas sus asignaciones? Presiona 'y' para confirmar",
                request.describe()
            ),
        );
        self.delete_request = Some(request);
        self.mode = AppMode::ConfirmDelete;
    }

    async fn handle_delete_mode(&mut self, key: KeyEvent) -> Result<bool> {
        self.mode = AppMode::Normal;
        let Some(request) = self.delete_request.take() else {
            return Ok(true);
        };

        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let result = match &request {
                    DeleteRequest::Project { id, .. } => self.client.delete_project(*id).await,
                    DeleteRequest::Resource { id, .. } => self.client.delete_resource(*id).await,
                };
                match result {
                    Ok(message) => {
                        info!(request = ?request, "Deleted");
                        self.messages.push(MessageType::Success, message);
                        self.request_refresh();
                    }
                    Err(e) => {
                        self.messages.push(MessageType::Error, format!("Error eliminando: {}", e));
                    }
                }
            }
            _ => self.messages.push(MessageType::Info, "Eliminación cancelada"),
        }
        Ok(true)
    }

    // ===== NEW ASSIGNMENT =====

    fn open_assignment_form(&mut self) {
        let projects = self.visible_projects();
        if projects.is_empty() {
            self.messages.push(MessageType::Warning, "No hay proyectos para asignar");
            return;
        }
        let selected = projects.get(self.selected).map(|p| p.id);
        let form = AssignmentFormState::new(
            self.today,
            &projects,
            selected,
            &self.state.snapshot.resources,
        );
        self.assignment_form = Some(form);
        self.mode = AppMode::NewAssignment;
    }

    async fn handle_assignment_mode(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Esc => {
                self.assignment_form = None;
                self.mode = AppMode::Normal;
                self.messages.push(MessageType::Info, "Asignación cancelada");
                return Ok(true);
            }
            KeyCode::Enter => {
                self.submit_assignment().await;
                return Ok(true);
            }
            _ => {}
        }

        let projects = self.state.filtered_projects();
        let resources = &self.state.snapshot.resources;
        let Some(form) = self.assignment_form.as_mut() else {
            self.mode = AppMode::Normal;
            return Ok(true);
        };
        let on_percentage = form.field == AssignmentField::Percentage;

        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if on_percentage => form.percentage.move_cursor_left(),
            KeyCode::Right if on_percentage => form.percentage.move_cursor_right(),
            KeyCode::Left => form.cycle(false, &projects, resources),
            KeyCode::Right => form.cycle(true, &projects, resources),
            KeyCode::Char(c) if on_percentage && c.is_ascii_digit() => form.percentage.insert_char(c),
            KeyCode::Backspace if on_percentage => form.percentage.delete_char_before(),
            KeyCode::Delete if on_percentage => form.percentage.delete_char_at(),
            _ => {}
        }
        Ok(true)
    }

    async fn submit_assignment(&mut self) {
        let Some(form) = self.assignment_form.as_mut() else {
            return;
        };
        form.sync();

        if !form.form.can_submit() {
            self.messages
                .push(MessageType::Warning, "Completa proyecto, recurso y semanas antes de crear");
            return;
        }

        let plan = match form.form.begin_submit(self.today) {
            Ok(plan) => plan,
            Err(e) => {
                self.messages.push(MessageType::Error, e.to_string());
                return;
            }
        };

        debug!(weeks = plan.week_count(), "Submitting assignment");
        let result = assignment::submit(&self.client, &plan).await;

        match form.form.complete(result) {
            SubmitOutcome::Succeeded(message) => {
                self.messages.push(MessageType::Success, message);
                self.assignment_form = None;
                self.mode = AppMode::Normal;
                self.request_refresh();
            }
            // The form stays open with every field intact
            SubmitOutcome::Failed(message) => self.messages.push_lines(MessageType::Error, &message),
        }
    }

    // ===== NEW PROJECT / RESOURCE =====

    async fn handle_project_mode(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Esc => {
                self.project_form = None;
                self.mode = AppMode::Normal;
                self.messages.push(MessageType::Info, "Creación de proyecto cancelada");
                return Ok(true);
            }
            KeyCode::Enter => {
                self.submit_project().await;
                return Ok(true);
            }
            _ => {}
        }

        let resources = &self.state.snapshot.resources;
        let Some(form) = self.project_form.as_mut() else {
            self.mode = AppMode::Normal;
            return Ok(true);
        };
        let on_name = form.field == ProjectField::Name;

        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            _ if on_name => edit_text(&mut form.name, key.code),
            KeyCode::Left => form.cycle(false, resources),
            KeyCode::Right | KeyCode::Char(' ') => form.cycle(true, resources),
            _ => {}
        }
        Ok(true)
    }

    async fn submit_project(&mut self) {
        let Some(form) = self.project_form.as_mut() else {
            return;
        };
        form.sync();

        let request = match form.form.build() {
            Ok(request) => request,
            Err(e) => {
                self.messages.push(MessageType::Error, e.to_string());
                return;
            }
        };

        match self.client.create_project(&request).await {
            Ok(created) => {
                self.messages
                    .push(MessageType::Success, format!("Proyecto creado: {}", created.name));
                self.project_form = None;
                self.mode = AppMode::Normal;
                self.request_refresh();
            }
            Err(e) => self
                .messages
                .push(MessageType::Error, format!("Error creando proyecto: {}", e)),
        }
    }

    async fn handle_resource_mode(&mut self, key: KeyEvent) -> Result<bool> {
        let Some(form) = self.resource_form.as_mut() else {
            self.mode = AppMode::Normal;
            return Ok(true);
        };

        match key.code {
            KeyCode::Esc => {
                self.resource_form = None;
                self.mode = AppMode::Normal;
                self.messages.push(MessageType::Info, "Creación de recurso cancelada");
            }
            KeyCode::Enter => self.submit_resource().await,
            code => edit_text(&mut form.name, code),
        }
        Ok(true)
    }

    async fn submit_resource(&mut self) {
        let Some(form) = self.resource_form.as_ref() else {
            return;
        };

        let request = match form.form().build() {
            Ok(request) => request,
            Err(e) => {
                self.messages.push(MessageType::Error, e.to_string());
                return;
            }
        };

        match self.client.create_resource(&request).await {
            Ok(created) => {
                self.messages
                    .push(MessageType::Success, format!("Recurso creado: {}", created.name));
                self.resource_form = None;
                self.mode = AppMode::Normal;
                self.request_refresh();
            }
            Err(e) => self
                .messages
                .push(MessageType::Error, format!("Error creando recurso: {}", e)),
        }
    }
}

fn edit_text(input: &mut TextInput, code: KeyCode) {
    match code {
        KeyCode::Char(c) => input.insert_char(c),
        KeyCode::Backspace => input.delete_char_before(),
        KeyCode::Delete => input.delete_char_at(),
        KeyCode::Left => input.move_cursor_left(),
        KeyCode::Right => input.move_cursor_right(),
        KeyCode::Home => input.move_cursor_to_start(),
        KeyCode::End => input.move_cursor_to_end(),
        _ => {}
    }
}

/// Steps a single-chip filter: none, then each option in turn, then none again
fn cycle_chip(chips: &mut Vec<String>, options: &[&str]) {
    let next = match chips.as_slice() {
        [] => options.first().map(|o| o.to_string()),
        [only] => options
            .iter()
            .position(|o| o == only)
            .and_then(|i| options.get(i + 1))
            .map(|o| o.to_string()),
        _ => None,
    };
    chips.clear();
    chips.extend(next);
}

/// `Todos` followed by `options`, advanced by one
fn cycle_value(options: &[&str], current: &str) -> String {
    let mut all = vec![ALL];
    all.extend_from_slice(options);
    let pos = all.iter().position(|o| *o == current).unwrap_or(0);
    all[(pos + 1) % all.len()].to_string()
}

fn cycle_value_back(options: &[&str], current: &str) -> String {
    let mut all = vec![ALL];
    all.extend_from_slice(options);
    let pos = all.iter().position(|o| *o == current).unwrap_or(0);
    all[(pos + all.len() - 1) % all.len()].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::api::{CapacityGrid, Resource, ResourcesVsGrid, WeeklyAverages};
    use planner::state::Snapshot;
    use std::collections::HashMap;
    use std::time::Duration;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn project(id: i64, name: &str, classification: &str, complexity: &str) -> Project {
        Project {
            id,
            name: name.to_string(),
            classification: classification.to_string(),
            phase: "Viabilidad".to_string(),
            complexity: complexity.to_string(),
            has_resource: false,
            created_at: None,
        }
    }

    fn loaded_app() -> App {
        let client = ApiClient::with_base_url("http://127.0.0.1:9/api", Some(Duration::from_secs(1))).unwrap();
        let mut app = App::new(client);

        let resources = vec![
            Resource {
                id: 1,
                name: "Ana".to_string(),
                unit: None,
            },
            Resource {
                id: 2,
                name: "Luis".to_string(),
                unit: None,
            },
        ];
        let projects = vec![
            project(10, "Portal", "Proyecto", "Alta"),
            project(11, "Soporte", "Admon", "Baja"),
            project(12, "Plan anual", "Estrategia", "Media"),
        ];
        let mut by_resource = std::collections::BTreeMap::new();
        by_resource.insert(
            "Ana".to_string(),
            HashMap::from([("Ago_25:Sem 2".to_string(), 90.0)]),
        );
        by_resource.insert(
            "Luis".to_string(),
            HashMap::from([("Ago_25:Sem 2".to_string(), 20.0)]),
        );
        let capacity = CapacityGrid {
            labels: vec!["Ago_25:Sem 2".to_string()],
            by_resource,
        };

        app.state.finish_load(Ok(Snapshot::build(
            resources,
            projects,
            capacity,
            ResourcesVsGrid::default(),
            WeeklyAverages::default(),
        )));
        app.pending = None;
        app
    }

    #[test]
    fn test_new_app_queues_initial_load() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9/api", Some(Duration::from_secs(1))).unwrap();
        let app = App::new(client);
        assert!(app.has_pending_load());
        assert!(app.is_loading());
        assert_eq!(app.screen, Screen::Projects);
    }

    #[tokio::test]
    async fn test_screen_switching_and_quit() {
        let mut app = loaded_app();
        assert!(app.handle_event(key(KeyCode::Tab)).await.unwrap());
        assert_eq!(app.screen, Screen::Capacity);
        app.handle_event(key(KeyCode::Char('3'))).await.unwrap();
        assert_eq!(app.screen, Screen::Resources);
        app.handle_event(key(KeyCode::BackTab)).await.unwrap();
        assert_eq!(app.screen, Screen::Capacity);

        app.handle_event(key(KeyCode::Char('?'))).await.unwrap();
        assert_eq!(app.mode, AppMode::Help);
        app.handle_event(key(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(app.mode, AppMode::Normal);

        assert!(!app.handle_event(key(KeyCode::Char('q'))).await.unwrap());
    }

    #[tokio::test]
    async fn test_project_filters_and_search() {
        let mut app = loaded_app();
        assert_eq!(app.visible_projects().len(), 3);

        // Alta
        app.handle_event(key(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(app.visible_projects().len(), 1);
        // Media
        app.handle_event(key(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(app.visible_projects()[0].name, "Plan anual");

        app.handle_event(key(KeyCode::Char('f'))).await.unwrap();
        assert_eq!(app.visible_projects().len(), 3);

        app.handle_event(key(KeyCode::Char('/'))).await.unwrap();
        assert_eq!(app.mode, AppMode::Search);
        for c in "sop".chars() {
            app.handle_event(key(KeyCode::Char(c))).await.unwrap();
        }
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.visible_projects().len(), 1);
        assert_eq!(app.visible_projects()[0].name, "Soporte");
    }

    #[tokio::test]
    async fn test_refresh_is_queued() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Char('r'))).await.unwrap();
        assert!(app.has_pending_load());
    }

    #[tokio::test]
    async fn test_assignment_form_opens_on_selected_project() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Down)).await.unwrap();
        app.handle_event(key(KeyCode::Char('a'))).await.unwrap();

        assert_eq!(app.mode, AppMode::NewAssignment);
        let form = app.assignment_form.as_ref().unwrap();
        assert_eq!(form.form.project.as_ref().unwrap().name, "Soporte");
        assert!(form.form.is_range_assignment());

        app.handle_event(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.assignment_form.is_none());
    }

    #[tokio::test]
    async fn test_range_assignment_needs_percentage() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Down)).await.unwrap();
        app.handle_event(key(KeyCode::Char('a'))).await.unwrap();

        // Project -> Resource -> Start -> End -> Percentage
        for _ in 0..4 {
            app.handle_event(key(KeyCode::Tab)).await.unwrap();
        }
        app.handle_event(key(KeyCode::Backspace)).await.unwrap();
        app.handle_event(key(KeyCode::Backspace)).await.unwrap();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.mode, AppMode::NewAssignment);
        let last = app.messages.recent(1)[0].clone();
        assert_eq!(last.message_type, MessageType::Warning);
        assert!(app.assignment_form.is_some());
    }

    #[tokio::test]
    async fn test_new_project_requires_name() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.mode, AppMode::NewProject);

        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.mode, AppMode::NewProject);
        assert_eq!(app.messages.recent(1)[0].message_type, MessageType::Error);

        app.handle_event(key(KeyCode::Char('P'))).await.unwrap();
        assert_eq!(app.project_form.as_ref().unwrap().name.value, "P");
    }

    #[tokio::test]
    async fn test_delete_can_be_cancelled() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Char('d'))).await.unwrap();
        assert_eq!(app.mode, AppMode::ConfirmDelete);
        assert_eq!(
            app.delete_request,
            Some(DeleteRequest::Project {
                id: 10,
                name: "Portal".to_string()
            })
        );

        app.handle_event(key(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.delete_request.is_none());
        assert_eq!(app.messages.recent(1)[0].text, "Eliminación cancelada");
    }

    #[tokio::test]
    async fn test_workload_filter_on_resources() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Char('3'))).await.unwrap();
        assert_eq!(app.resource_rows().len(), 2);

        app.handle_event(key(KeyCode::Char('w'))).await.unwrap();
        assert_eq!(app.workload, Some(WorkloadBand::Available));
        let rows = app.resource_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].resource, "Luis");
    }

    #[test]
    fn test_cycle_helpers() {
        let mut chips = Vec::new();
        cycle_chip(&mut chips, &["A", "B"]);
        assert_eq!(chips, vec!["A"]);
        cycle_chip(&mut chips, &["A", "B"]);
        assert_eq!(chips, vec!["B"]);
        cycle_chip(&mut chips, &["A", "B"]);
        assert!(chips.is_empty());

        assert_eq!(cycle_value(&["Sí", "No"], ALL), "Sí");
        assert_eq!(cycle_value(&["Sí", "No"], "No"), ALL);
        assert_eq!(cycle_value_back(&["Sí", "No"], ALL), "No");
    }
}
