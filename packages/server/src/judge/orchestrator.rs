use common::SubmissionStatus;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument, warn};

use crate::entity::{problem, test_case};
use crate::error::AppError;
use crate::judge::evaluator::classify;
use crate::judge::{stats, store};
use crate::sandbox::Execute;

/// One test case as the judging loop consumes it.
#[derive(Clone, Debug)]
pub struct JudgeCase {
    pub test_case_id: i32,
    pub input: String,
    pub expected_output: String,
    pub is_sample: bool,
}

impl From<test_case::Model> for JudgeCase {
    fn from(tc: test_case::Model) -> Self {
        Self {
            test_case_id: tc.id,
            input: tc.input,
            expected_output: tc.expected_output,
            is_sample: tc.is_sample,
        }
    }
}

/// Detail for one case that actually ran, kept for the response.
#[derive(Clone, Debug)]
pub struct CaseRecord {
    pub test_case_id: i32,
    pub is_sample: bool,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub passed: bool,
    pub time_ms: i64,
    pub memory_bytes: i64,
}

/// Terminal outcome of one judging run.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub status: SubmissionStatus,
    pub test_cases_passed: i32,
    /// Mean time over the cases the sandbox actually ran. None when no case
    /// produced metrics (compile error on entry, transport failure).
    pub execution_time_ms: Option<f64>,
    /// Max memory in MB over the same set of cases.
    pub memory_used_mb: Option<f64>,
    pub error_message: Option<String>,
    pub case_records: Vec<CaseRecord>,
}

/// Limits the loop passes through to the sandbox, taken from the problem.
#[derive(Clone, Copy, Debug)]
pub struct RunLimits {
    pub time_limit_ms: i64,
    pub memory_limit_mb: i64,
}

impl From<&problem::Model> for RunLimits {
    fn from(p: &problem::Model) -> Self {
        Self {
            time_limit_ms: p.time_limit_ms as i64,
            memory_limit_mb: p.memory_limit_mb as i64,
        }
    }
}

/// Run the submitted code against the cases, in order, stopping at the first
/// failure.
///
/// A failed case already decides the submission cannot be accepted, and every
/// skipped case saves one sandbox round-trip, so nothing past the first
/// failure runs. A compilation error ends the run before the case contributes
/// any metrics: compilation is language-wide, not per case.
///
/// This function is total: sandbox transport failures become a terminal
/// runtime_error outcome, never an early return.
pub async fn run_test_cases(
    sandbox: &dyn Execute,
    code: &str,
    language: &str,
    limits: RunLimits,
    cases: &[JudgeCase],
) -> RunOutcome {
    let mut passed = 0i32;
    let mut times_ms: Vec<i64> = Vec::new();
    let mut peak_memory_bytes: i64 = 0;
    let mut case_records = Vec::new();
    let mut status = SubmissionStatus::Accepted;
    let mut error_message = None;

    for case in cases {
        let result = match sandbox
            .execute(
                code,
                language,
                &case.input,
                limits.time_limit_ms,
                limits.memory_limit_mb,
            )
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    test_case_id = case.test_case_id,
                    error = %e,
                    "Sandbox call failed, ending run"
                );
                status = SubmissionStatus::RuntimeError;
                error_message = Some(e.to_string());
                break;
            }
        };

        let outcome = classify(&result, &case.expected_output);

        if outcome.status == SubmissionStatus::CompilationError {
            status = SubmissionStatus::CompilationError;
            error_message = outcome.message;
            break;
        }

        // Past the compile check the case ran, so it contributes metrics
        // whether it passed or not.
        times_ms.push(result.time_ms);
        peak_memory_bytes = peak_memory_bytes.max(result.memory_bytes);
        case_records.push(CaseRecord {
            test_case_id: case.test_case_id,
            is_sample: case.is_sample,
            input: case.input.clone(),
            expected_output: case.expected_output.clone(),
            actual_output: result.stdout.clone(),
            passed: outcome.passed,
            time_ms: result.time_ms,
            memory_bytes: result.memory_bytes,
        });

        if outcome.passed {
            passed += 1;
            continue;
        }

        debug!(
            test_case_id = case.test_case_id,
            status = %outcome.status,
            "Test case failed, short-circuiting"
        );
        status = outcome.status;
        error_message = outcome.message;
        break;
    }

    let execution_time_ms = mean_ms(&times_ms);
    let memory_used_mb = if times_ms.is_empty() {
        None
    } else {
        Some(bytes_to_mb(peak_memory_bytes))
    };

    RunOutcome {
        status,
        test_cases_passed: passed,
        execution_time_ms,
        memory_used_mb,
        error_message,
        case_records,
    }
}

/// Judge one submission end to end: pending row, running transition, the
/// test-case loop, the terminal write, and the statistics update.
///
/// Once the pending row exists this function always drives it to a terminal
/// status; only a persistence failure can surface as an error, and that
/// propagates as a 500.
#[instrument(skip_all, fields(problem_id = problem.id, user_id = user_id))]
pub async fn judge_submission(
    db: &DatabaseConnection,
    sandbox: &dyn Execute,
    problem: &problem::Model,
    cases: Vec<JudgeCase>,
    user_id: i32,
    challenge_id: Option<i32>,
    code: &str,
    language: &str,
) -> Result<(i32, RunOutcome), AppError> {
    let total = cases.len() as i32;

    let submission = store::create_pending(
        db,
        problem.id,
        user_id,
        challenge_id,
        code,
        language,
        total,
    )
    .await?;
    store::mark_running(db, submission.id).await?;

    let outcome = run_test_cases(sandbox, code, language, RunLimits::from(problem), &cases).await;

    store::finalize(db, submission.id, &outcome).await?;

    stats::record_attempt(
        db,
        user_id,
        problem.id,
        outcome.status,
        outcome.execution_time_ms,
        outcome.memory_used_mb,
        problem.points,
    )
    .await?;

    info!(
        submission_id = submission.id,
        status = %outcome.status,
        test_cases_passed = outcome.test_cases_passed,
        test_cases_total = total,
        "Submission judged"
    );

    Ok((submission.id, outcome))
}

fn mean_ms(times_ms: &[i64]) -> Option<f64> {
    if times_ms.is_empty() {
        return None;
    }
    Some(times_ms.iter().sum::<i64>() as f64 / times_ms.len() as f64)
}

/// Megabytes as the sandbox reports memory: decimal, bytes / 1e6.
pub fn bytes_to_mb(bytes: i64) -> f64 {
    bytes as f64 / 1e6
}
