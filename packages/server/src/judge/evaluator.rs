use common::{ExecutionResult, SubmissionStatus};

/// Signal the sandbox delivers when it kills a run for exceeding its time
/// budget.
const TIME_LIMIT_SIGNAL: &str = "SIGKILL";

/// Classification of one executed test case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseOutcome {
    pub passed: bool,
    /// `Accepted` when passed; otherwise the verdict this case pins on the
    /// submission (every non-passing case short-circuits the run).
    pub status: SubmissionStatus,
    /// Diagnostic text: compiler stderr for compilation errors, program
    /// stderr for runtime errors. None for other outcomes.
    pub message: Option<String>,
}

/// Classify one execution result against the expected output.
///
/// Rules apply in strict priority order:
/// 1. compiler stderr present -> compilation_error (invalidates the whole
///    submission, not just this case);
/// 2. program stderr present -> runtime_error;
/// 3. killed by the sandbox's time-budget signal -> time_limit_exceeded;
/// 4. otherwise compare trimmed stdout with trimmed expected output.
///
/// Comparison is exact after leading/trailing whitespace trim only. Internal
/// whitespace is significant and there is no numeric tolerance.
pub fn classify(result: &ExecutionResult, expected_output: &str) -> CaseOutcome {
    if result.compile_failed() {
        return CaseOutcome {
            passed: false,
            status: SubmissionStatus::CompilationError,
            message: result.compile_stderr.clone(),
        };
    }

    if !result.stderr.is_empty() {
        return CaseOutcome {
            passed: false,
            status: SubmissionStatus::RuntimeError,
            message: Some(result.stderr.clone()),
        };
    }

    if result.signal.as_deref() == Some(TIME_LIMIT_SIGNAL) {
        return CaseOutcome {
            passed: false,
            status: SubmissionStatus::TimeLimitExceeded,
            message: None,
        };
    }

    if result.stdout.trim() == expected_output.trim() {
        CaseOutcome {
            passed: true,
            status: SubmissionStatus::Accepted,
            message: None,
        }
    } else {
        CaseOutcome {
            passed: false,
            status: SubmissionStatus::WrongAnswer,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_run(stdout: &str) -> ExecutionResult {
        ExecutionResult {
            stdout: stdout.to_string(),
            exit_code: Some(0),
            time_ms: 10,
            memory_bytes: 1_000_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        assert!(classify(&clean_run("5\n"), "5").passed);
        assert!(classify(&clean_run("  5  "), "5").passed);
    }

    #[test]
    fn test_no_numeric_normalization() {
        let outcome = classify(&clean_run("5"), "05");
        assert!(!outcome.passed);
        assert_eq!(outcome.status, SubmissionStatus::WrongAnswer);
    }

    #[test]
    fn test_internal_whitespace_is_significant() {
        let outcome = classify(&clean_run("1  2"), "1 2");
        assert!(!outcome.passed);
        assert_eq!(outcome.status, SubmissionStatus::WrongAnswer);
    }

    #[test]
    fn test_compile_error_beats_everything() {
        let result = ExecutionResult {
            compile_stderr: Some("error: expected ';'".into()),
            stderr: "also noisy".into(),
            signal: Some("SIGKILL".into()),
            ..Default::default()
        };
        let outcome = classify(&result, "5");
        assert_eq!(outcome.status, SubmissionStatus::CompilationError);
        assert_eq!(outcome.message.as_deref(), Some("error: expected ';'"));
    }

    #[test]
    fn test_empty_compile_stderr_is_not_a_compile_error() {
        let result = ExecutionResult {
            compile_stderr: Some(String::new()),
            stdout: "5".into(),
            ..Default::default()
        };
        assert!(classify(&result, "5").passed);
    }

    #[test]
    fn test_stderr_means_runtime_error() {
        let result = ExecutionResult {
            stdout: "5".into(),
            stderr: "Traceback (most recent call last): ...".into(),
            ..Default::default()
        };
        let outcome = classify(&result, "5");
        assert_eq!(outcome.status, SubmissionStatus::RuntimeError);
        assert!(outcome.message.is_some());
    }

    #[test]
    fn test_kill_signal_means_time_limit() {
        let result = ExecutionResult {
            signal: Some("SIGKILL".into()),
            ..Default::default()
        };
        let outcome = classify(&result, "5");
        assert_eq!(outcome.status, SubmissionStatus::TimeLimitExceeded);
        assert_eq!(outcome.message, None);
    }

    #[test]
    fn test_other_signal_is_judged_on_output() {
        let result = ExecutionResult {
            stdout: "5".into(),
            signal: Some("SIGSEGV".into()),
            ..Default::default()
        };
        // No stderr, not the time-budget sentinel: falls through to the
        // output comparison.
        assert!(classify(&result, "5").passed);
    }
}
