use common::SubmissionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Durable record of one judging attempt. Created in `pending`, moved to
/// `running` before the first test case executes, and never mutated again
/// after a terminal status is written.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Submitted source, stored verbatim.
    #[sea_orm(column_type = "Text")]
    pub code: String,
    pub language: String,
    pub status: SubmissionStatus,

    /// Number of test cases that passed. Non-decreasing during a run,
    /// always <= test_cases_total.
    pub test_cases_passed: i32,
    pub test_cases_total: i32,

    /// Mean wall-clock time in milliseconds over the cases actually executed.
    pub execution_time_ms: Option<f64>,
    /// Maximum memory in megabytes over the cases actually executed.
    pub memory_used_mb: Option<f64>,

    /// Populated for compilation_error and runtime_error verdicts only.
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,

    pub user_id: i32,

    pub problem_id: i32,
    #[sea_orm(belongs_to, from = "problem_id", to = "id")]
    pub problem: HasOne<super::problem::Entity>,

    /// NULL for standalone submissions; set when submitted under a timed challenge.
    pub challenge_id: Option<i32>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
