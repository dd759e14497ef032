//! Form state for the new project, resource and assignment dialogs

use chrono::NaiveDate;

use planner::api::{Project, Resource};
use planner::assignment::AssignmentForm;
use planner::forms::{
    next_option, previous_option, ProjectForm, ResourceForm, CLASSIFICATIONS, COMPLEXITIES, PHASES,
};
use planner::weeks::{self, WeekOption};

/// Single-line text input with a cursor counted in characters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let pos = self.cursor.min(self.len());
        let idx = self.byte_index(pos);
        self.value.insert(idx, c);
        self.cursor = pos + 1;
    }

    /// Delete character before cursor (backspace)
    pub fn delete_char_before(&mut self) {
        let pos = self.cursor.min(self.len());
        if pos > 0 {
            let idx = self.byte_index(pos - 1);
            self.value.remove(idx);
            self.cursor = pos - 1;
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete_char_at(&mut self) {
        let pos = self.cursor.min(self.len());
        if pos < self.len() {
            let idx = self.byte_index(pos);
            self.value.remove(idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.len();
    }
}

fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

// ===== NEW PROJECT =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Name,
    Classification,
    Phase,
    Complexity,
    HasResource,
    Resource,
}

impl ProjectField {
    pub fn all() -> [ProjectField; 6] {
        [
            ProjectField::Name,
            ProjectField::Classification,
            ProjectField::Phase,
            ProjectField::Complexity,
            ProjectField::HasResource,
            ProjectField::Resource,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectField::Name => "Nombre",
            ProjectField::Classification => "Clasificación",
            ProjectField::Phase => "Fase",
            ProjectField::Complexity => "Complejidad",
            ProjectField::HasResource => "Tiene recurso",
            ProjectField::Resource => "Recurso",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectFormState {
    pub form: ProjectForm,
    pub name: TextInput,
    pub field: ProjectField,
    resource_index: usize,
}

impl ProjectFormState {
    pub fn new() -> Self {
        Self {
            form: ProjectForm::new(),
            name: TextInput::default(),
            field: ProjectField::Name,
            resource_index: 0,
        }
    }

    /// Fields shown right now; the resource picker only while flagged
    pub fn visible_fields(&self) -> Vec<ProjectField> {
        ProjectField::all()
            .into_iter()
            .filter(|f| *f != ProjectField::Resource || self.form.has_resource)
            .collect()
    }

    pub fn next_field(&mut self) {
        let fields = self.visible_fields();
        let pos = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[step(pos, fields.len(), true)];
    }

    pub fn previous_field(&mut self) {
        let fields = self.visible_fields();
        let pos = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[step(pos, fields.len(), false)];
    }

    /// Left/right on a choice field
    pub fn cycle(&mut self, forward: bool, resources: &[Resource]) {
        let pick = |options: &[&str], current: &str| -> String {
            let picked = if forward {
                next_option(options, current)
            } else {
                previous_option(options, current)
            };
            picked.unwrap_or(current).to_string()
        };

        match self.field {
            ProjectField::Name => {}
            ProjectField::Classification => {
                self.form.classification = pick(&CLASSIFICATIONS[..], self.form.classification.as_str())
            }
            ProjectField::Phase => self.form.phase = pick(&PHASES[..], self.form.phase.as_str()),
            ProjectField::Complexity => {
                self.form.complexity = pick(&COMPLEXITIES[..], self.form.complexity.as_str())
            }
            ProjectField::HasResource => {
                self.form.has_resource = !self.form.has_resource;
                if self.form.has_resource && self.form.resource_id.is_none() {
                    self.form.resource_id = resources.get(self.resource_index).map(|r| r.id);
                }
            }
            ProjectField::Resource => {
                self.resource_index = step(self.resource_index, resources.len(), forward);
                self.form.resource_id = resources.get(self.resource_index).map(|r| r.id);
            }
        }
    }

    /// Copies the typed name into the form before building
    pub fn sync(&mut self) {
        self.form.name = self.name.value.clone();
    }
}

// ===== NEW RESOURCE =====

#[derive(Debug, Clone, Default)]
pub struct ResourceFormState {
    pub name: TextInput,
}

impl ResourceFormState {
    pub fn form(&self) -> ResourceForm {
        ResourceForm {
            name: self.name.value.clone(),
        }
    }
}

// ===== NEW ASSIGNMENT =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentField {
    Project,
    Resource,
    StartWeek,
    EndWeek,
    Percentage,
}

impl AssignmentField {
    pub fn label(&self) -> &'static str {
        match self {
            AssignmentField::Project => "Proyecto",
            AssignmentField::Resource => "Recurso",
            AssignmentField::StartWeek => "Semana inicio",
            AssignmentField::EndWeek => "Semana fin",
            AssignmentField::Percentage => "Porcentaje",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssignmentFormState {
    pub form: AssignmentForm,
    pub field: AssignmentField,
    pub percentage: TextInput,
    pub options: Vec<WeekOption>,
    project_index: usize,
    resource_index: usize,
    start_index: usize,
    end_index: usize,
}

impl AssignmentFormState {
    /// Opens the form on the first project of `projects` matching `selected`
    pub fn new(today: NaiveDate, projects: &[&Project], selected: Option<i64>, resources: &[Resource]) -> Self {
        let options = weeks::week_range_options(today, weeks::RANGE_OPTION_COUNT);
        let mut form = AssignmentForm::with_default_range(today);

        let project_index = selected
            .and_then(|id| projects.iter().position(|p| p.id == id))
            .unwrap_or(0);
        if let Some(project) = projects.get(project_index) {
            form.select_project((*project).clone());
        }
        if let Some(resource) = resources.first() {
            form.select_resource(resource.id);
        }

        let index_of = |date: Option<NaiveDate>| {
            date.and_then(|d| options.iter().position(|o| o.monday == d))
                .unwrap_or(0)
        };
        let start_index = index_of(form.start_week);
        let end_index = index_of(form.end_week);

        Self {
            percentage: TextInput::new(&form.percentage.to_string()),
            form,
            field: AssignmentField::Project,
            options,
            project_index,
            resource_index: 0,
            start_index,
            end_index,
        }
    }

    /// Range fields only apply to projects without a fixed schedule
    pub fn visible_fields(&self) -> Vec<AssignmentField> {
        let mut fields = vec![AssignmentField::Project, AssignmentField::Resource];
        if self.form.is_range_assignment() {
            fields.extend([
                AssignmentField::StartWeek,
                AssignmentField::EndWeek,
                AssignmentField::Percentage,
            ]);
        }
        fields
    }

    pub fn next_field(&mut self) {
        let fields = self.visible_fields();
        let pos = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[step(pos, fields.len(), true)];
    }

    pub fn previous_field(&mut self) {
        let fields = self.visible_fields();
        let pos = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[step(pos, fields.len(), false)];
    }

    pub fn cycle(&mut self, forward: bool, projects: &[&Project], resources: &[Resource]) {
        match self.field {
            AssignmentField::Project => {
                self.project_index = step(self.project_index, projects.len(), forward);
                if let Some(project) = projects.get(self.project_index) {
                    self.form.select_project((*project).clone());
                }
                if !self.visible_fields().contains(&self.field) {
                    self.field = AssignmentField::Project;
                }
            }
            AssignmentField::Resource => {
                self.resource_index = step(self.resource_index, resources.len(), forward);
                if let Some(resource) = resources.get(self.resource_index) {
                    self.form.select_resource(resource.id);
                }
            }
            AssignmentField::StartWeek => {
                self.start_index = step(self.start_index, self.options.len(), forward);
                self.form.start_week = self.options.get(self.start_index).map(|o| o.monday);
            }
            AssignmentField::EndWeek => {
                self.end_index = step(self.end_index, self.options.len(), forward);
                self.form.end_week = self.options.get(self.end_index).map(|o| o.monday);
            }
            AssignmentField::Percentage => {}
        }
    }

    /// Copies the typed percentage into the form; junk becomes 0 and fails validation
    pub fn sync(&mut self) {
        self.form.percentage = self.percentage.value.trim().parse().unwrap_or(0);
    }

    pub fn start_label(&self) -> String {
        self.options
            .get(self.start_index)
            .map(|o| o.label.clone())
            .unwrap_or_default()
    }

    pub fn end_label(&self) -> String {
        self.options
            .get(self.end_index)
            .map(|o| o.label.clone())
            .unwrap_or_default()
    }
}
