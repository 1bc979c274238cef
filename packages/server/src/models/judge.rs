use common::SubmissionStatus;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::judge::orchestrator::{CaseRecord, bytes_to_mb};

/// Request body for judging a submission.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct JudgeRequest {
    /// Problem the code is submitted against.
    #[schema(example = 1)]
    pub problem_id: i32,
    /// Source code to judge.
    #[schema(example = "print(sum(map(int, input().split())))")]
    pub code: String,
    /// Programming language identifier (e.g., "python", "cpp").
    #[schema(example = "python")]
    pub language: String,
    /// Challenge this submission counts toward, if any.
    pub challenge_id: Option<i32>,
}

/// Synchronous judging result, returned once every test case has been decided.
#[derive(Serialize, utoipa::ToSchema)]
pub struct JudgeResponse {
    #[schema(example = 42)]
    pub submission_id: i32,
    pub status: SubmissionStatus,
    #[schema(example = 3)]
    pub test_cases_passed: i32,
    #[schema(example = 3)]
    pub test_cases_total: i32,
    /// Mean execution time in ms over the executed test cases, null when none
    /// ran.
    pub execution_time_ms: Option<f64>,
    /// Peak memory in MB over the executed test cases, null when none ran.
    pub memory_used_mb: Option<f64>,
    /// Compiler stderr for compilation errors, program stderr for runtime
    /// errors, null otherwise.
    pub error_message: Option<String>,
    /// Per-case detail for sample test cases only. Hidden cases never leak
    /// their inputs or outputs through the response.
    pub test_results: Vec<TestCaseResultDto>,
}

/// Per-case detail exposed for sample test cases.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TestCaseResultDto {
    #[schema(example = "1 2")]
    pub input: String,
    #[schema(example = "3")]
    pub expected_output: String,
    #[schema(example = "3")]
    pub actual_output: String,
    pub passed: bool,
    #[schema(example = 12)]
    pub execution_time_ms: i64,
    #[schema(example = 4.3)]
    pub memory_used_mb: f64,
}

impl From<&CaseRecord> for TestCaseResultDto {
    fn from(record: &CaseRecord) -> Self {
        Self {
            input: record.input.clone(),
            expected_output: record.expected_output.clone(),
            actual_output: record.actual_output.clone(),
            passed: record.passed,
            execution_time_ms: record.time_ms,
            memory_used_mb: bytes_to_mb(record.memory_bytes),
        }
    }
}

pub fn validate_judge_request(req: &JudgeRequest, max_code_size: usize) -> Result<(), AppError> {
    if req.code.trim().is_empty() {
        return Err(AppError::Validation("Code cannot be empty".into()));
    }

    if req.code.len() > max_code_size {
        return Err(AppError::Validation(format!(
            "Code size ({} bytes) exceeds maximum ({} bytes)",
            req.code.len(),
            max_code_size
        )));
    }

    if req.language.trim().is_empty() {
        return Err(AppError::Validation("Language is required".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(code: &str, language: &str) -> JudgeRequest {
        JudgeRequest {
            problem_id: 1,
            code: code.to_string(),
            language: language.to_string(),
            challenge_id: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_judge_request(&request("print(1)", "python"), 1024).is_ok());
    }

    #[test]
    fn test_empty_code_is_rejected() {
        assert!(validate_judge_request(&request("   \n", "python"), 1024).is_err());
    }

    #[test]
    fn test_oversized_code_is_rejected() {
        let err = validate_judge_request(&request("x".repeat(2048).as_str(), "python"), 1024);
        assert!(err.is_err());
    }

    #[test]
    fn test_blank_language_is_rejected() {
        assert!(validate_judge_request(&request("print(1)", "  "), 1024).is_err());
    }
}
