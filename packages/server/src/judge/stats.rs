//! Per-user per-problem statistics, maintained as a single atomic upsert so
//! concurrent judging runs for the same (user, problem) pair can never lose an
//! attempt or double-award points.

use chrono::{DateTime, Utc};
use common::SubmissionStatus;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Statement, Value};
use tracing::instrument;

/// One statement, one round trip. The database resolves the read-modify-write
/// race: attempts always increment, `solved` only latches to true, best
/// metrics only improve (Postgres `LEAST` ignores NULL operands), and points
/// are awarded exactly once, on the first transition into solved.
const RECORD_ATTEMPT_SQL: &str = r#"
INSERT INTO user_problem_stats
    (user_id, problem_id, attempts, solved,
     best_execution_time_ms, best_memory_used_mb, points_earned, last_attempted_at)
VALUES ($1, $2, 1, $3, $4, $5, $6, $7)
ON CONFLICT (user_id, problem_id) DO UPDATE SET
    attempts = user_problem_stats.attempts + 1,
    last_attempted_at = excluded.last_attempted_at,
    best_execution_time_ms =
        LEAST(user_problem_stats.best_execution_time_ms, excluded.best_execution_time_ms),
    best_memory_used_mb =
        LEAST(user_problem_stats.best_memory_used_mb, excluded.best_memory_used_mb),
    points_earned = CASE
        WHEN NOT user_problem_stats.solved AND excluded.solved
            THEN excluded.points_earned
        ELSE user_problem_stats.points_earned
    END,
    solved = user_problem_stats.solved OR excluded.solved
"#;

/// Record one judged attempt.
///
/// Runs after the submission row is terminal. Accepted runs carry their
/// metrics and the problem's points into the VALUES side; everything else
/// contributes only the attempt count and timestamp.
#[instrument(skip(db, execution_time_ms, memory_used_mb), fields(status = %status))]
pub async fn record_attempt(
    db: &DatabaseConnection,
    user_id: i32,
    problem_id: i32,
    status: SubmissionStatus,
    execution_time_ms: Option<f64>,
    memory_used_mb: Option<f64>,
    problem_points: i32,
) -> Result<(), DbErr> {
    let values = attempt_values(status, execution_time_ms, memory_used_mb, problem_points);
    let stmt = attempt_statement(user_id, problem_id, values, Utc::now());
    db.execute_raw(stmt).await?;
    Ok(())
}

/// Bind the attempt onto the upsert. Placeholder order is $1 user_id,
/// $2 problem_id, $3 solved, $4 best time, $5 best memory, $6 points,
/// $7 attempted-at.
fn attempt_statement(
    user_id: i32,
    problem_id: i32,
    (solved, best_time, best_memory, points): (bool, Option<f64>, Option<f64>, i32),
    attempted_at: DateTime<Utc>,
) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        RECORD_ATTEMPT_SQL,
        [
            Value::from(user_id),
            Value::from(problem_id),
            Value::from(solved),
            Value::from(best_time),
            Value::from(best_memory),
            Value::from(points),
            Value::from(attempted_at),
        ],
    )
}

/// The VALUES-side tuple for one attempt: (solved, best time, best memory,
/// points). Non-accepted attempts never carry metrics, even when the failed
/// run produced some.
fn attempt_values(
    status: SubmissionStatus,
    execution_time_ms: Option<f64>,
    memory_used_mb: Option<f64>,
    problem_points: i32,
) -> (bool, Option<f64>, Option<f64>, i32) {
    if status.is_accepted() {
        (true, execution_time_ms, memory_used_mb, problem_points)
    } else {
        (false, None, None, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_attempt_carries_metrics_and_points() {
        let values = attempt_values(SubmissionStatus::Accepted, Some(12.5), Some(4.3), 100);
        assert_eq!(values, (true, Some(12.5), Some(4.3), 100));
    }

    #[test]
    fn test_failed_attempt_carries_nothing() {
        let values = attempt_values(SubmissionStatus::WrongAnswer, Some(12.5), Some(4.3), 100);
        assert_eq!(values, (false, None, None, 0));
    }

    #[test]
    fn test_compile_error_attempt_carries_nothing() {
        let values = attempt_values(SubmissionStatus::CompilationError, None, None, 100);
        assert_eq!(values, (false, None, None, 0));
    }

    #[test]
    fn test_accepted_attempt_binds_in_placeholder_order() {
        let now = Utc::now();
        let stmt = attempt_statement(
            7,
            3,
            attempt_values(SubmissionStatus::Accepted, Some(12.5), Some(4.3), 100),
            now,
        );

        // $3 onward follow the literal attempts = 1.
        assert!(stmt.sql.contains("VALUES ($1, $2, 1, $3, $4, $5, $6, $7)"));

        let binds = stmt.values.expect("upsert binds values").0;
        assert_eq!(
            binds,
            vec![
                Value::from(7_i32),
                Value::from(3_i32),
                Value::from(true),
                Value::from(Some(12.5)),
                Value::from(Some(4.3)),
                Value::from(100_i32),
                Value::from(now),
            ]
        );
    }

    #[test]
    fn test_failed_attempt_binds_null_metrics_and_zero_points() {
        let now = Utc::now();
        let stmt = attempt_statement(
            7,
            3,
            attempt_values(SubmissionStatus::TimeLimitExceeded, Some(2000.0), Some(3.0), 100),
            now,
        );

        let binds = stmt.values.expect("upsert binds values").0;
        assert_eq!(binds[2], Value::from(false));
        assert_eq!(binds[3], Value::from(Option::<f64>::None));
        assert_eq!(binds[4], Value::from(Option::<f64>::None));
        assert_eq!(binds[5], Value::from(0_i32));
    }

    #[test]
    fn test_upsert_increments_latches_and_awards_once() {
        // The conflict target is the (user_id, problem_id) unique key.
        assert!(RECORD_ATTEMPT_SQL.contains("ON CONFLICT (user_id, problem_id) DO UPDATE"));
        // Every attempt counts.
        assert!(RECORD_ATTEMPT_SQL.contains("attempts = user_problem_stats.attempts + 1"));
        // solved only ever latches true.
        assert!(RECORD_ATTEMPT_SQL.contains("solved = user_problem_stats.solved OR excluded.solved"));
        // Points are awarded only on the transition into solved.
        assert!(RECORD_ATTEMPT_SQL.contains("WHEN NOT user_problem_stats.solved AND excluded.solved"));
        assert!(RECORD_ATTEMPT_SQL.contains("THEN excluded.points_earned"));
        assert!(RECORD_ATTEMPT_SQL.contains("ELSE user_problem_stats.points_earned"));
        // Best metrics only improve.
        for col in ["best_execution_time_ms", "best_memory_used_mb"] {
            assert!(
                RECORD_ATTEMPT_SQL
                    .contains(&format!("LEAST(user_problem_stats.{col}, excluded.{col})")),
                "missing LEAST clause for {col}"
            );
        }
    }
}
