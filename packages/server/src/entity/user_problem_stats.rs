use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-(user, problem) aggregate, not an event log. One row per pair,
/// written exclusively through the atomic upsert in `judge::stats`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_problem_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "user_problem")]
    pub user_id: i32,
    #[sea_orm(unique_key = "user_problem")]
    pub problem_id: i32,
    #[sea_orm(belongs_to, from = "problem_id", to = "id")]
    pub problem: HasOne<super::problem::Entity>,

    /// Incremented on every terminal submission, accepted or not.
    pub attempts: i32,
    /// Set true on first acceptance; never reset.
    pub solved: bool,

    /// Running minimums, updated on accepted submissions only.
    pub best_execution_time_ms: Option<f64>,
    pub best_memory_used_mb: Option<f64>,

    /// Awarded once, when `solved` first becomes true.
    pub points_earned: i32,

    pub last_attempted_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
