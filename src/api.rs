//! REST client for the planning backend
//!
//! One method per endpoint. Every call returns typed models; non-2xx replies
//! are turned into [`ApiError`] by [`error_from_response`], which separates
//! capacity conflicts (409 with per-week detail) from everything else.

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ApiError, ConflictWeek, Result};
use crate::weeks;

/// Sentinel used by filters for "no restriction"
pub const ALL: &str = "Todos";

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// ===== MODELS =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A project as listed by `/projects` or `/projects/with-assignments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(alias = "nombre")]
    pub name: String,
    pub classification: String,
    pub phase: String,
    pub complexity: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub has_resource: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Project {
    /// `"Sí"` / `"No"` as shown in filters
    pub fn has_resource_label(&self) -> &'static str {
        if self.has_resource {
            "Sí"
        } else {
            "No"
        }
    }
}

// The with-assignments listing sends "Sí"/"No" instead of a boolean
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "sí" | "si" | "true" | "yes" => Ok(true),
            "no" | "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid has_resource value: {}",
                other
            ))),
        },
        Value::Null => Ok(false),
        _ => Err(serde::de::Error::custom("has_resource must be a bool or string")),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    pub name: String,
    pub classification: String,
    pub phase: String,
    pub complexity: String,
    pub has_resource: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewResource {
    pub name: String,
    pub unit: String,
}

/// Single range assignment, used for low complexity projects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentRequest {
    pub project_id: i64,
    pub resource_id: i64,
    pub start_week_monday: String,
    pub end_week_monday: String,
    pub subprocess: String,
    pub can_ordinal: u32,
    pub percentage: f64,
}

/// One entry per scheduled week, starting at `start_date`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAssignmentRequest {
    pub project_id: i64,
    pub resource_id: i64,
    pub percentages: Vec<u32>,
    pub subprocesses: Vec<String>,
    pub start_date: String,
    pub complexity_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub project_id: i64,
    pub resource_id: i64,
    pub start_week_monday: NaiveDate,
    pub end_week_monday: NaiveDate,
    pub subprocess: String,
    pub can_ordinal: u32,
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub complexity: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedWeek {
    pub week_monday: String,
    pub percentage: f64,
    #[serde(default)]
    pub subprocess: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulkAssignmentResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_assignments: Vec<CreatedWeek>,
    #[serde(default)]
    pub total_weeks: usize,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub complexity_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssignmentWeek {
    pub id: i64,
    pub week_monday: NaiveDate,
    pub week_friday: NaiveDate,
    pub month_label: String,
    pub week_label: String,
    pub speculative_pct: f64,
    pub subprocess: String,
    pub can_ordinal: u32,
    pub project_id: i64,
    pub resource_id: i64,
}

/// `/grid/capacity`: load per resource and week label
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CapacityGrid {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub by_resource: BTreeMap<String, HashMap<String, f64>>,
}

/// Project reference inside a resources-vs bucket; older backends send only names
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProjectRef {
    Full { id: i64, name: String },
    Name(String),
}

impl ProjectRef {
    pub fn name(&self) -> &str {
        match self {
            ProjectRef::Full { name, .. } => name,
            ProjectRef::Name(name) => name,
        }
    }
}

/// Per-person load broken down by project type and week
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonBucket {
    #[serde(rename = "loadByTypeWeek", default)]
    pub load_by_type_week: HashMap<String, HashMap<String, f64>>,
    #[serde(rename = "projectCountByTypeWeek", default)]
    pub project_count_by_type_week: HashMap<String, HashMap<String, u32>>,
    #[serde(rename = "projectNamesByType", default)]
    pub project_names_by_type: HashMap<String, Vec<ProjectRef>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourcesVsGrid {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub by_person: BTreeMap<String, PersonBucket>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectAverage {
    pub name: String,
    #[serde(default)]
    pub avg_pct: f64,
    #[serde(default)]
    pub by_week: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeeklyAverages {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub projects: Vec<ProjectAverage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubprocessCount {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectSubprocesses {
    pub project_id: i64,
    pub project_name: String,
    #[serde(default)]
    pub resource_name: Option<String>,
    pub complexity: String,
    pub current_month: String,
    #[serde(default)]
    pub subprocesses: Vec<SubprocessCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportStats {
    #[serde(default)]
    pub projects_created: u64,
    #[serde(default)]
    pub resources_created: u64,
    #[serde(default)]
    pub assignments_created: u64,
    #[serde(default)]
    pub weeks_created: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stats: ImportStats,
}

#[derive(Debug, Deserialize)]
struct ProjectsEnvelope {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Debug, Default, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    message: Option<String>,
}

// ===== ERROR CLASSIFICATION =====

/// Builds the error for a non-2xx reply.
///
/// A 409 whose `detail.weeks` parses becomes [`ApiError::Conflict`]. Anything
/// else uses `detail` (a string, or `detail.message`), then a top-level
/// `message`, then the generic status text.
pub fn error_from_response(status: u16, body: &str) -> ApiError {
    let json: Option<Value> = serde_json::from_str(body).ok();
    let detail = json.as_ref().and_then(|v| v.get("detail"));

    if status == StatusCode::CONFLICT.as_u16() {
        let weeks = detail
            .and_then(|d| d.get("weeks"))
            .and_then(|w| serde_json::from_value::<Vec<ConflictWeek>>(w.clone()).ok());
        if let Some(weeks) = weeks {
            return ApiError::Conflict(weeks);
        }
    }

    let message = detail
        .and_then(|d| match d {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => d.get("message").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .or_else(|| {
            json.as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Request failed with status code {}", status));

    ApiError::RequestFailed {
        status,
        detail: message,
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_connect() || err.is_timeout() {
        ApiError::ConnectionFailed(err.to_string())
    } else {
        ApiError::NetworkError(err)
    }
}

// ===== CLIENT =====

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.api_url, config.timeout())
    }

    /// Without a timeout a slow bulk insert is never abandoned client-side,
    /// which would leave the user retrying a request the backend still commits.
    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("planner/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and returns the body of a 2xx reply
    async fn send_request(&self, request: RequestBuilder, what: &str) -> Result<String> {
        let response = request.send().await.map_err(|e| {
            warn!(request = what, error = %e, "Backend unreachable");
            transport_error(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let err = error_from_response(status.as_u16(), &body);
            warn!(request = what, status = status.as_u16(), error = %err, "Backend rejected request");
            return Err(err.into());
        }

        debug!(request = what, status = status.as_u16(), bytes = body.len(), "Backend replied");
        Ok(body)
    }

    fn parse<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|e| {
            ApiError::InvalidResponse(format!("{}: {}", what, e)).into()
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let body = self
            .send_request(self.client.get(self.url(path)).query(query), path)
            .await?;
        Self::parse(&body, path)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, payload: &B) -> Result<T> {
        let body = self
            .send_request(self.client.post(self.url(path)).json(payload), path)
            .await?;
        Self::parse(&body, path)
    }

    async fn delete(&self, path: &str, default_message: &str) -> Result<String> {
        let body = self.send_request(self.client.delete(self.url(path)), path).await?;
        let reply: DeleteResponse = serde_json::from_str(&body).unwrap_or_default();
        Ok(reply
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_message.to_string()))
    }

    fn window_query(start: NaiveDate, weeks: u32) -> Vec<(&'static str, String)> {
        vec![
            ("start", weeks::format_api_date(start)),
            ("weeks", weeks.to_string()),
        ]
    }

    // ----- resources -----

    pub async fn list_resources(&self) -> Result<Vec<Resource>> {
        self.get_json("/resources", &[]).await
    }

    pub async fn create_resource(&self, resource: &NewResource) -> Result<Resource> {
        let created: Resource = self.post_json("/resources", resource).await?;
        info!(resource_id = created.id, name = %created.name, "Resource created");
        Ok(created)
    }

    pub async fn delete_resource(&self, id: i64) -> Result<String> {
        info!(resource_id = id, "Deleting resource");
        self.delete(&format!("/resources/{}", id), "Recurso eliminado exitosamente")
            .await
    }

    // ----- projects -----

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_json("/projects", &[]).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project> {
        let created: Project = self.post_json("/projects", project).await?;
        info!(project_id = created.id, name = %created.name, "Project created");
        Ok(created)
    }

    pub async fn delete_project(&self, id: i64) -> Result<String> {
        info!(project_id = id, "Deleting project");
        self.delete(&format!("/projects/{}", id), "Proyecto eliminado exitosamente")
            .await
    }

    pub async fn projects_with_assignments(&self) -> Result<Vec<Project>> {
        let envelope: ProjectsEnvelope = self.get_json("/projects/with-assignments", &[]).await?;
        Ok(envelope.projects)
    }

    // ----- assignments -----

    pub async fn create_assignment(&self, request: &AssignmentRequest) -> Result<Assignment> {
        debug!(
            project_id = request.project_id,
            resource_id = request.resource_id,
            start = %request.start_week_monday,
            end = %request.end_week_monday,
            percentage = request.percentage,
            "Creating assignment"
        );
        self.post_json("/assignments", request).await
    }

    pub async fn delete_assignment(&self, id: i64) -> Result<String> {
        info!(assignment_id = id, "Deleting assignment");
        self.delete(&format!("/assignments/{}", id), "Asignación eliminada exitosamente")
            .await
    }

    pub async fn assignment_weeks(&self, id: i64) -> Result<Vec<AssignmentWeek>> {
        self.get_json(&format!("/assignments/{}/weeks", id), &[]).await
    }

    pub async fn create_bulk_assignments(
        &self,
        request: &BulkAssignmentRequest,
    ) -> Result<BulkAssignmentResponse> {
        debug!(
            project_id = request.project_id,
            resource_id = request.resource_id,
            weeks = request.percentages.len(),
            start = %request.start_date,
            complexity = %request.complexity_type,
            "Creating scheduled assignment"
        );
        self.post_json("/assignments/bulk-with-subprocesses", request)
            .await
    }

    // ----- grids -----

    pub async fn capacity_window(&self, start: NaiveDate, weeks: u32) -> Result<CapacityGrid> {
        self.get_json("/grid/capacity", &Self::window_query(start, weeks))
            .await
    }

    /// `resource` is omitted from the query when empty or `Todos`
    pub async fn resources_vs_weekly(
        &self,
        start: NaiveDate,
        weeks: u32,
        resource: Option<&str>,
    ) -> Result<ResourcesVsGrid> {
        let mut query = Self::window_query(start, weeks);
        if let Some(resource) = resource.filter(|r| !r.is_empty() && *r != ALL) {
            query.push(("resource", resource.to_string()));
        }
        self.get_json("/grid/resources-vs", &query).await
    }

    pub async fn projects_weekly_avg(&self, start: NaiveDate, weeks: u32) -> Result<WeeklyAverages> {
        self.get_json("/projects/weekly-avg", &Self::window_query(start, weeks))
            .await
    }

    pub async fn project_subprocesses(
        &self,
        project_id: i64,
        resource_name: Option<&str>,
    ) -> Result<ProjectSubprocesses> {
        let mut query = Vec::new();
        if let Some(name) = resource_name.filter(|r| !r.is_empty() && *r != ALL) {
            query.push(("resource_name", name.to_string()));
        }
        self.get_json(
            &format!("/projects/{}/subprocesses/current-month", project_id),
            &query,
        )
        .await
    }

    // ----- import -----

    /// Uploads a spreadsheet as the `file` field of a multipart form
    pub async fn import_excel(&self, path: &Path) -> Result<ImportResponse> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import.xlsx".to_string());

        info!(file = %file_name, bytes = bytes.len(), "Uploading spreadsheet");

        let part = Part::bytes(bytes).file_name(file_name).mime_str(XLSX_MIME)?;
        let form = Form::new().part("file", part);

        let body = self
            .send_request(self.client.post(self.url("/import/excel")).multipart(form), "/import/excel")
            .await?;
        Self::parse(&body, "/import/excel")
    }
}
