//! Building and submitting resource assignments
//!
//! Medium and high complexity projects are assigned from their fixed schedule
//! in one bulk request. Low complexity projects are assigned over a
//! user-chosen week range at a single percentage.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, AssignmentRequest, BulkAssignmentRequest, Project};
use crate::deliverables::{ComplexityTier, GENERAL_SUBPROCESS};
use crate::error::{PlannerError, Result, ValidationError};
use crate::weeks;

pub const DEFAULT_PERCENTAGE: i64 = 10;
pub const SUCCESS_MESSAGE: &str = "Asignación creada ✅";
const FAILURE_PREFIX: &str = "Error creando asignación: ";

/// What gets sent to the backend for one submission
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentPlan {
    Scheduled(BulkAssignmentRequest),
    Range(AssignmentRequest),
}

impl AssignmentPlan {
    /// Number of weeks the plan covers
    pub fn week_count(&self) -> usize {
        match self {
            AssignmentPlan::Scheduled(req) => req.percentages.len(),
            AssignmentPlan::Range(req) => {
                let start = weeks::parse_date(&req.start_week_monday);
                let end = weeks::parse_date(&req.end_week_monday);
                match (start, end) {
                    (Ok(s), Ok(e)) if e >= s => ((e - s).num_days() / 7 + 1) as usize,
                    _ => 0,
                }
            }
        }
    }
}

/// Bulk request for a scheduled tier, starting at the start week of `today`
pub fn build_scheduled(
    project_id: i64,
    resource_id: i64,
    tier: ComplexityTier,
    today: NaiveDate,
) -> Result<BulkAssignmentRequest> {
    if !tier.has_schedule() {
        return Err(ValidationError::InvalidComplexity(tier.label().to_string()).into());
    }

    let schedule = tier.schedule();
    let start = weeks::start_week(today);

    Ok(BulkAssignmentRequest {
        project_id,
        resource_id,
        percentages: schedule.iter().map(|w| w.percentage).collect(),
        subprocesses: schedule.into_iter().map(|w| w.subprocess).collect(),
        start_date: weeks::format_api_date(start),
        complexity_type: tier.wire_name().to_string(),
    })
}

/// Single range request; dates are sent as chosen
pub fn build_range(
    project_id: i64,
    resource_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    percentage: i64,
) -> Result<AssignmentRequest> {
    validate_range(start, end, percentage)?;
    Ok(range_request(project_id, resource_id, start, end, percentage))
}

fn range_request(
    project_id: i64,
    resource_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    percentage: i64,
) -> AssignmentRequest {
    AssignmentRequest {
        project_id,
        resource_id,
        start_week_monday: weeks::format_api_date(start),
        end_week_monday: weeks::format_api_date(end),
        subprocess: GENERAL_SUBPROCESS.to_string(),
        can_ordinal: 1,
        percentage: percentage as f64,
    }
}

fn validate_range(
    start: NaiveDate,
    end: NaiveDate,
    percentage: i64,
) -> std::result::Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::InvalidDateRange {
            start: weeks::format_api_date(start),
            end: weeks::format_api_date(end),
        });
    }
    if !(1..=100).contains(&percentage) {
        return Err(ValidationError::InvalidPercentage(percentage));
    }
    Ok(())
}

/// Sends a plan and returns the confirmation text
pub async fn submit(client: &ApiClient, plan: &AssignmentPlan) -> Result<String> {
    match plan {
        AssignmentPlan::Scheduled(request) => {
            let reply = client.create_bulk_assignments(request).await?;
            info!(
                project_id = request.project_id,
                resource_id = request.resource_id,
                created = reply.created_assignments.len(),
                "Scheduled assignment stored"
            );
            Ok(SUCCESS_MESSAGE.to_string())
        }
        AssignmentPlan::Range(request) => {
            let created = client.create_assignment(request).await?;
            info!(assignment_id = created.id, "Range assignment stored");
            Ok(SUCCESS_MESSAGE.to_string())
        }
    }
}

/// User-facing text for a failed submission
pub fn failure_message(err: &PlannerError) -> String {
    match err {
        PlannerError::Api(api) if api.is_conflict() => api.user_message(),
        PlannerError::Api(api) => format!("{}{}", FAILURE_PREFIX, api.user_message()),
        PlannerError::Validation(v) => v.to_string(),
        other => format!("{}{}", FAILURE_PREFIX, other),
    }
}

/// Where the form is in its submit cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
}

/// Result of one submit cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded(String),
    Failed(String),
}

/// The new assignment form.
///
/// A failed validation or submission puts the form back in `Idle` with
/// `error` set and every field untouched.
#[derive(Debug, Clone)]
pub struct AssignmentForm {
    pub project: Option<Project>,
    pub resource_id: Option<i64>,
    pub start_week: Option<NaiveDate>,
    pub end_week: Option<NaiveDate>,
    pub percentage: i64,
    state: SubmitState,
    error: Option<String>,
}

impl Default for AssignmentForm {
    fn default() -> Self {
        Self {
            project: None,
            resource_id: None,
            start_week: None,
            end_week: None,
            percentage: DEFAULT_PERCENTAGE,
            state: SubmitState::Idle,
            error: None,
        }
    }
}

impl AssignmentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the default week range selected
    pub fn with_default_range(today: NaiveDate) -> Self {
        let options = weeks::week_range_options(today, weeks::RANGE_OPTION_COUNT);
        let range = weeks::default_range(&options);
        Self {
            start_week: range.map(|(s, _)| s),
            end_week: range.map(|(_, e)| e),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Tier of the selected project, if it parses
    pub fn tier(&self) -> Option<ComplexityTier> {
        self.project
            .as_ref()
            .and_then(|p| ComplexityTier::from_project(&p.complexity))
    }

    pub fn is_range_assignment(&self) -> bool {
        self.tier() == Some(ComplexityTier::Baja)
    }

    /// Mirrors the submit button: enabled when the required fields are filled
    pub fn can_submit(&self) -> bool {
        if self.state == SubmitState::Submitting || self.state == SubmitState::Validating {
            return false;
        }
        let base = self.project.is_some() && self.resource_id.is_some();
        if self.is_range_assignment() {
            base && self.start_week.is_some() && self.end_week.is_some() && self.percentage > 0
        } else {
            base
        }
    }

    pub fn select_project(&mut self, project: Project) {
        self.project = Some(project);
    }

    pub fn select_resource(&mut self, resource_id: i64) {
        self.resource_id = Some(resource_id);
    }

    /// Checks the fields and builds the plan.
    ///
    /// On success the form moves to `Submitting`; on failure it is back in
    /// `Idle` with the validation message recorded.
    pub fn begin_submit(&mut self, today: NaiveDate) -> std::result::Result<AssignmentPlan, ValidationError> {
        self.state = SubmitState::Validating;
        self.error = None;

        match self.plan(today) {
            Ok(plan) => {
                debug!(weeks = plan.week_count(), "Assignment validated");
                self.state = SubmitState::Submitting;
                Ok(plan)
            }
            Err(e) => {
                self.state = SubmitState::Idle;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn plan(&self, today: NaiveDate) -> std::result::Result<AssignmentPlan, ValidationError> {
        let project = self.project.as_ref().ok_or(ValidationError::ProjectRequired)?;
        let resource_id = self.resource_id.ok_or(ValidationError::ResourceRequired)?;
        let tier = ComplexityTier::from_project(&project.complexity)
            .ok_or_else(|| ValidationError::InvalidComplexity(project.complexity.clone()))?;

        if tier.has_schedule() {
            let request = build_scheduled(project.id, resource_id, tier, today)
                .map_err(|_| ValidationError::InvalidComplexity(project.complexity.clone()))?;
            return Ok(AssignmentPlan::Scheduled(request));
        }

        let (start, end) = match (self.start_week, self.end_week) {
            (Some(s), Some(e)) => (s, e),
            _ => return Err(ValidationError::DateRangeRequired),
        };
        validate_range(start, end, self.percentage)?;

        Ok(AssignmentPlan::Range(range_request(
            project.id,
            resource_id,
            start,
            end,
            self.percentage,
        )))
    }

    /// Records the backend's answer for the current submission
    pub fn complete(&mut self, result: Result<String>) -> SubmitOutcome {
        match result {
            Ok(message) => {
                self.state = SubmitState::Succeeded;
                self.error = None;
                SubmitOutcome::Succeeded(message)
            }
            Err(err) => {
                let message = failure_message(&err);
                warn!(error = %err, "Assignment submission failed");
                self.state = SubmitState::Idle;
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}
