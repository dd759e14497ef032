//! Project and resource creation forms

use crate::api::{NewProject, NewResource};
use crate::error::ValidationError;

pub const CLASSIFICATIONS: [&str; 4] = ["Proyecto", "Anteproyecto", "Estrategia", "Admon"];

pub const PHASES: [&str; 10] = [
    "Viabilidad",
    "Planeación PY",
    "Ejecución",
    "Cierre PY",
    "Planeación Estratégica",
    "Monitoreo a la Estrategia",
    "Levantamiento estratégico",
    "Despliegue Estratégico",
    "Alineación",
    "Gestión",
];

pub const COMPLEXITIES: [&str; 3] = ["Alta", "Media", "Baja"];

/// Work types shown in the resources view
pub const WORK_TYPES: [&str; 10] = [
    "PRO", "ADM", "INN", "MANT", "REQ", "OPE", "SOST", "GIRA", "PROC", "TI",
];

pub const HAS_RESOURCE_OPTIONS: [&str; 2] = ["Sí", "No"];

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub classification: String,
    pub phase: String,
    pub complexity: String,
    pub has_resource: bool,
    pub resource_id: Option<i64>,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            classification: CLASSIFICATIONS[0].to_string(),
            phase: PHASES[0].to_string(),
            complexity: "Media".to_string(),
            has_resource: false,
            resource_id: None,
        }
    }
}

impl ProjectForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("nombre".to_string()));
        }
        if self.has_resource && self.resource_id.is_none() {
            return Err(ValidationError::ResourceRequired);
        }
        Ok(())
    }

    /// Validates and builds the create request; the resource is sent only when flagged
    pub fn build(&self) -> Result<NewProject, ValidationError> {
        self.validate()?;

        Ok(NewProject {
            name: self.name.trim().to_string(),
            classification: self.classification.clone(),
            phase: self.phase.clone(),
            complexity: self.complexity.clone(),
            has_resource: self.has_resource,
            resource_id: if self.has_resource {
                self.resource_id
            } else {
                None
            },
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceForm {
    pub name: String,
}

impl ResourceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn build(&self) -> Result<NewResource, ValidationError> {
        if !self.is_valid() {
            return Err(ValidationError::MissingField("nombre".to_string()));
        }
        Ok(NewResource {
            name: self.name.trim().to_string(),
            unit: String::new(),
        })
    }
}

/// Cycles to the next entry of a fixed option list, `None` when it is empty
pub fn next_option<'a>(options: &[&'a str], current: &str) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    let idx = options.iter().position(|o| *o == current).map_or(0, |i| (i + 1) % options.len());
    Some(options[idx])
}

/// Cycles to the previous entry of a fixed option list, `None` when it is empty
pub fn previous_option<'a>(options: &[&'a str], current: &str) -> Option<&'a str> {
    let last = options.len().checked_sub(1)?;
    let idx = match options.iter().position(|o| *o == current) {
        Some(0) | None => last,
        Some(i) => i - 1,
    };
    Some(options[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let form = ProjectForm::new();
        assert_eq!(form.classification, "Proyecto");
        assert_eq!(form.phase, "Viabilidad");
        assert_eq!(form.complexity, "Media");
        assert!(!form.has_resource);
        assert!(!form.is_valid());
    }

    #[test]
    fn test_project_build_trims_and_omits_resource() {
        let mut form = ProjectForm::new();
        form.name = "  Core bancario ".to_string();
        form.resource_id = Some(4);

        let project = form.build().unwrap();
        assert_eq!(project.name, "Core bancario");
        assert_eq!(project.resource_id, None);
    }

    #[test]
    fn test_project_with_resource_requires_one() {
        let mut form = ProjectForm::new();
        form.name = "Pagos".to_string();
        form.has_resource = true;
        assert_eq!(form.validate(), Err(ValidationError::ResourceRequired));

        form.resource_id = Some(2);
        let project = form.build().unwrap();
        assert!(project.has_resource);
        assert_eq!(project.resource_id, Some(2));
    }

    #[test]
    fn test_resource_form() {
        let mut form = ResourceForm::new();
        form.name = "   ".to_string();
        assert!(form.build().is_err());

        form.name = " Ana ".to_string();
        let resource = form.build().unwrap();
        assert_eq!(resource.name, "Ana");
        assert_eq!(resource.unit, "");
    }

    #[test]
    fn test_option_cycling() {
        assert_eq!(next_option(&COMPLEXITIES, "Alta"), Some("Media"));
        assert_eq!(next_option(&COMPLEXITIES, "Baja"), Some("Alta"));
        assert_eq!(previous_option(&COMPLEXITIES, "Alta"), Some("Baja"));
        assert_eq!(next_option(&COMPLEXITIES, "otro"), Some("Alta"));
    }

    #[test]
    fn test_option_cycling_on_empty_list() {
        assert_eq!(next_option(&[], "Alta"), None);
        assert_eq!(previous_option(&[], "Alta"), None);
        assert_eq!(next_option(&["Único"], "Único"), Some("Único"));
        assert_eq!(previous_option(&["Único"], "otro"), Some("Único"));
    }
}
