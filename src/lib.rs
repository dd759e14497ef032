//! Capacity and project assignment planning client
//!
//! Talks to the planning backend's REST API and holds the client-side rules:
//! deliverable schedules for medium and high complexity projects, the
//! start-week rule, week labels, assignment payloads and the filters behind
//! each screen.

pub mod api;
pub mod assignment;
pub mod config;
pub mod deliverables;
pub mod error;
pub mod forms;
pub mod logging;
pub mod state;
pub mod utils;
pub mod weeks;

pub use api::ApiClient;
pub use config::Config;
pub use deliverables::ComplexityTier;
pub use error::{PlannerError, Result};
pub use state::AppState;
