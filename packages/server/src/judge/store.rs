//! Durable submission records. Every judging run leaves a row behind, and the
//! row never ends in a non-terminal status once [`finalize`] runs.

use chrono::Utc;
use common::SubmissionStatus;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use crate::entity::submission;
use crate::judge::orchestrator::RunOutcome;

/// Insert the submission row in `pending` before any sandbox work, so the
/// attempt is on record even if judging dies mid-run.
pub async fn create_pending(
    db: &DatabaseConnection,
    problem_id: i32,
    user_id: i32,
    challenge_id: Option<i32>,
    code: &str,
    language: &str,
    test_cases_total: i32,
) -> Result<submission::Model, DbErr> {
    let model = submission::ActiveModel {
        code: Set(code.to_string()),
        language: Set(language.to_string()),
        status: Set(SubmissionStatus::Pending),
        test_cases_passed: Set(0),
        test_cases_total: Set(test_cases_total),
        user_id: Set(user_id),
        problem_id: Set(problem_id),
        challenge_id: Set(challenge_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await
}

pub async fn mark_running(db: &DatabaseConnection, submission_id: i32) -> Result<(), DbErr> {
    let update = submission::ActiveModel {
        id: Set(submission_id),
        status: Set(SubmissionStatus::Running),
        ..Default::default()
    };
    update.update(db).await?;
    Ok(())
}

/// Write the terminal status and the aggregate metrics in one update.
pub async fn finalize(
    db: &DatabaseConnection,
    submission_id: i32,
    outcome: &RunOutcome,
) -> Result<(), DbErr> {
    let update = submission::ActiveModel {
        id: Set(submission_id),
        status: Set(outcome.status),
        test_cases_passed: Set(outcome.test_cases_passed),
        execution_time_ms: Set(outcome.execution_time_ms),
        memory_used_mb: Set(outcome.memory_used_mb),
        error_message: Set(outcome.error_message.clone()),
        ..Default::default()
    };
    update.update(db).await?;
    Ok(())
}
