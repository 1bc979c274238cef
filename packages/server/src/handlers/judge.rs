use axum::Json;
use axum::extract::State;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;

use crate::entity::{problem, test_case};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::judge::orchestrator::{self, JudgeCase};
use crate::models::judge::{JudgeRequest, JudgeResponse, TestCaseResultDto, validate_judge_request};
use crate::state::AppState;

/// Find a problem by ID or return 404.
async fn find_problem<C: ConnectionTrait>(db: &C, id: i32) -> Result<problem::Model, AppError> {
    problem::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found".into()))
}

/// Load a problem's test cases in judging order.
async fn load_judge_cases<C: ConnectionTrait>(
    db: &C,
    problem_id: i32,
) -> Result<Vec<JudgeCase>, AppError> {
    let cases: Vec<JudgeCase> = test_case::Entity::find()
        .filter(test_case::Column::ProblemId.eq(problem_id))
        .order_by_asc(test_case::Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(JudgeCase::from)
        .collect();

    if cases.is_empty() {
        return Err(AppError::ProblemMisconfigured(format!(
            "Problem {problem_id} has no test cases"
        )));
    }

    Ok(cases)
}

/// Judge a submission synchronously.
#[utoipa::path(
    post,
    path = "/judge",
    tag = "Judge",
    operation_id = "judgeSubmission",
    summary = "Submit code for judging",
    description = "Runs the submitted code against the problem's test cases and returns the verdict once judging completes. The submission is recorded and user statistics are updated before the response is sent.",
    request_body = JudgeRequest,
    responses(
        (status = 200, description = "Judging completed", body = JudgeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Problem has no test cases (PROBLEM_MISCONFIGURED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn judge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<JudgeRequest>,
) -> Result<Json<JudgeResponse>, AppError> {
    validate_judge_request(&payload, state.config.judge.max_code_size)?;

    let language = payload.language.trim();
    if !state.runtimes.supports(language) {
        return Err(AppError::Validation(format!(
            "Unsupported language: '{language}'"
        )));
    }

    let problem = find_problem(&state.db, payload.problem_id).await?;
    // Misconfiguration is caught before any submission row exists.
    let cases = load_judge_cases(&state.db, problem.id).await?;
    let total = cases.len() as i32;

    let (submission_id, outcome) = orchestrator::judge_submission(
        &state.db,
        state.sandbox.as_ref(),
        &problem,
        cases,
        auth_user.user_id,
        payload.challenge_id,
        &payload.code,
        language,
    )
    .await?;

    let test_results: Vec<TestCaseResultDto> = outcome
        .case_records
        .iter()
        .filter(|r| r.is_sample)
        .map(TestCaseResultDto::from)
        .collect();

    Ok(Json(JudgeResponse {
        submission_id,
        status: outcome.status,
        test_cases_passed: outcome.test_cases_passed,
        test_cases_total: total,
        execution_time_ms: outcome.execution_time_ms,
        memory_used_mb: outcome.memory_used_mb,
        error_message: outcome.error_message,
        test_results,
    }))
}
