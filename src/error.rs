//! Error types for the planner
//!
//! Structured errors built with thiserror. The binary and the interactive UI
//! still use anyhow at the edges; everything in the library returns these.

use serde::Deserialize;
use thiserror::Error;

/// Main error type for the planner
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Form validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Lookup of a static catalog entry failed
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Invalid API URL: {0}")]
    InvalidApiUrl(String),

    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration file: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(String),
}

/// One week the backend refused because the resource would exceed 100%
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConflictWeek {
    pub label: String,
    #[serde(default)]
    pub week_monday: Option<String>,
    pub current: f64,
    pub new: f64,
}

/// Backend API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to connect to backend: {0}")]
    ConnectionFailed(String),

    /// Non-2xx response other than a capacity conflict
    #[error("{detail}")]
    RequestFailed { status: u16, detail: String },

    /// HTTP 409 from an availability-checked endpoint
    #[error("El recurso no cuenta con disponibilidad:\n{}", format_conflict_weeks(.0))]
    Conflict(Vec<ConflictWeek>),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl ApiError {
    /// The message shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Conflict(_) => self.to_string(),
            ApiError::RequestFailed { detail, .. } => detail.clone(),
            ApiError::NetworkError(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict(_))
    }
}

/// Renders conflict rows one per line: `label (actual X%, nuevo Y%)`
pub fn format_conflict_weeks(weeks: &[ConflictWeek]) -> String {
    weeks
        .iter()
        .map(|w| {
            format!(
                "{} (actual {}%, nuevo {}%)",
                w.label,
                format_number(w.current),
                format_number(w.new)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Validation errors raised before anything is sent to the backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid date format: {0}. Expected YYYY-MM-DD, YYYY.MM.DD, or YYYY/MM/DD")]
    InvalidDateFormat(String),

    #[error("Invalid week label: {0}")]
    InvalidWeekLabel(String),

    #[error("Invalid complexity: {0}. Expected Alta, Media or Baja")]
    InvalidComplexity(String),

    #[error("Invalid percentage value: {0}. Must be between 1 and 100")]
    InvalidPercentage(i64),

    #[error("End week {end} is before start week {start}")]
    InvalidDateRange { start: String, end: String },

    #[error("A project must be selected")]
    ProjectRequired,

    #[error("A resource must be selected")]
    ResourceRequired,

    #[error("A week range is required for low complexity projects")]
    DateRangeRequired,

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Result type alias for the planner
pub type Result<T> = std::result::Result<T, PlannerError>;

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        PlannerError::Api(ApiError::NetworkError(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::Config(ConfigError::NoConfigDir);
        assert!(err.to_string().contains("config directory"));

        let err = PlannerError::Validation(ValidationError::InvalidPercentage(150));
        assert!(err.to_string().contains("Must be between 1 and 100"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let planner_err: PlannerError = io_err.into();
        assert!(matches!(planner_err, PlannerError::Io(_)));
    }

    #[test]
    fn test_conflict_message_lists_every_week() {
        let err = ApiError::Conflict(vec![
            ConflictWeek {
                label: "Ago_25:Sem1".to_string(),
                week_monday: None,
                current: 60.0,
                new: 50.0,
            },
            ConflictWeek {
                label: "Ago_25:Sem2".to_string(),
                week_monday: Some("2025-08-11".to_string()),
                current: 95.5,
                new: 10.0,
            },
        ]);

        let msg = err.user_message();
        assert!(msg.starts_with("El recurso no cuenta con disponibilidad:"));
        assert!(msg.contains("Ago_25:Sem1 (actual 60%, nuevo 50%)"));
        assert!(msg.contains("Ago_25:Sem2 (actual 95.5%, nuevo 10%)"));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_request_failed_shows_detail_only() {
        let err = ApiError::RequestFailed {
            status: 400,
            detail: "Las fechas deben corresponder a lunes.".to_string(),
        };
        assert_eq!(err.user_message(), "Las fechas deben corresponder a lunes.");
        assert!(!err.is_conflict());
    }
}
