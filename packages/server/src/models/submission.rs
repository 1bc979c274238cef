use chrono::{DateTime, Utc};
use common::SubmissionStatus;
use serde::Serialize;

use crate::entity::submission;

/// Full submission record as stored.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    #[schema(example = 42)]
    pub id: i32,
    pub code: String,
    #[schema(example = "python")]
    pub language: String,
    pub status: SubmissionStatus,
    #[schema(example = 3)]
    pub test_cases_passed: i32,
    #[schema(example = 3)]
    pub test_cases_total: i32,
    pub execution_time_ms: Option<f64>,
    pub memory_used_mb: Option<f64>,
    pub error_message: Option<String>,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = 1)]
    pub problem_id: i32,
    /// Challenge this submission counted toward, null otherwise.
    pub challenge_id: Option<i32>,
    #[schema(example = "2026-08-25T14:30:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(m: submission::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            language: m.language,
            status: m.status,
            test_cases_passed: m.test_cases_passed,
            test_cases_total: m.test_cases_total,
            execution_time_ms: m.execution_time_ms,
            memory_used_mb: m.memory_used_mb,
            error_message: m.error_message,
            user_id: m.user_id,
            problem_id: m.problem_id,
            challenge_id: m.challenge_id,
            created_at: m.created_at,
        }
    }
}
