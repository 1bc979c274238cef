use std::time::Duration;

use async_trait::async_trait;
use common::ExecutionResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Execute, RuntimeMap, SandboxError};

/// Request body for the sandbox execute endpoint.
#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<FilePayload<'a>>,
    stdin: &'a str,
    compile_timeout: i64,
    run_timeout: i64,
    compile_memory_limit: i64,
    run_memory_limit: i64,
}

#[derive(Serialize)]
struct FilePayload<'a> {
    name: &'a str,
    content: &'a str,
}

/// Response body. `compile` is absent for interpreted languages; `run` can be
/// absent when compilation fails. Treated as an untrusted external schema:
/// every field is defaulted and conversion happens in one place.
#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    compile: Option<StagePayload>,
    run: Option<StagePayload>,
}

#[derive(Debug, Default, Deserialize)]
struct StagePayload {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    signal: Option<String>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    memory: Option<i64>,
}

impl ExecuteResponse {
    /// The only translation from the sandbox wire format to the internal shape.
    fn normalize(self) -> ExecutionResult {
        let compile_stderr = self.compile.map(|c| c.stderr);
        let run = self.run.unwrap_or_default();
        ExecutionResult {
            stdout: run.stdout,
            stderr: run.stderr,
            compile_stderr,
            exit_code: run.code,
            signal: run.signal,
            time_ms: run.time.unwrap_or(0),
            memory_bytes: run.memory.unwrap_or(0),
        }
    }
}

/// HTTP client for the execution sandbox.
pub struct SandboxClient {
    http: reqwest::Client,
    url: String,
    runtimes: RuntimeMap,
}

impl SandboxClient {
    pub fn new(
        url: String,
        request_timeout: Duration,
        runtimes: RuntimeMap,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            url,
            runtimes,
        })
    }
}

#[async_trait]
impl Execute for SandboxClient {
    async fn execute(
        &self,
        code: &str,
        language: &str,
        stdin: &str,
        time_limit_ms: i64,
        memory_limit_mb: i64,
    ) -> Result<ExecutionResult, SandboxError> {
        let spec = self
            .runtimes
            .resolve(language)
            .ok_or_else(|| SandboxError::UnsupportedLanguage(language.to_string()))?;

        // Limits are enforced in binary MiB. Reported usage is converted to
        // decimal MB downstream, so the two scales differ by ~4.9%.
        let memory_limit_bytes = memory_limit_mb * 1024 * 1024;
        let request = ExecuteRequest {
            language: &spec.runtime,
            version: &spec.version,
            files: vec![FilePayload {
                name: "main",
                content: code,
            }],
            stdin,
            compile_timeout: time_limit_ms,
            run_timeout: time_limit_ms,
            compile_memory_limit: memory_limit_bytes,
            run_memory_limit: memory_limit_bytes,
        };

        // No retries. Sandbox runs are not safe to repeat for scoring: a
        // second run would double-count resource usage.
        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SandboxError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SandboxError::Transport(format!(
                "sandbox returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ExecuteResponse = response
            .json()
            .await
            .map_err(|e| SandboxError::Transport(format!("malformed sandbox response: {e}")))?;

        debug!(language, time_limit_ms, "Sandbox execution completed");
        Ok(parsed.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interpreted_language_response() {
        // Interpreted languages have no compile stage at all.
        let body = r#"{
            "run": {
                "stdout": "5\n",
                "stderr": "",
                "code": 0,
                "signal": null,
                "time": 12,
                "memory": 4300800
            }
        }"#;
        let parsed: ExecuteResponse = serde_json::from_str(body).unwrap();
        let result = parsed.normalize();
        assert_eq!(result.stdout, "5\n");
        assert_eq!(result.compile_stderr, None);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.time_ms, 12);
        assert_eq!(result.memory_bytes, 4_300_800);
    }

    #[test]
    fn test_parse_compile_failure_response_without_run() {
        let body = r#"{
            "compile": {
                "stdout": "",
                "stderr": "main.c:1: error: expected ';'",
                "code": 1
            }
        }"#;
        let parsed: ExecuteResponse = serde_json::from_str(body).unwrap();
        let result = parsed.normalize();
        assert!(result.compile_failed());
        assert_eq!(result.stdout, "");
        assert_eq!(result.exit_code, None);
    }

    #[test]
    fn test_parse_killed_by_signal() {
        let body = r#"{
            "compile": { "stdout": "", "stderr": "", "code": 0 },
            "run": { "stdout": "", "stderr": "", "code": null, "signal": "SIGKILL" }
        }"#;
        let parsed: ExecuteResponse = serde_json::from_str(body).unwrap();
        let result = parsed.normalize();
        assert!(!result.compile_failed());
        assert_eq!(result.signal.as_deref(), Some("SIGKILL"));
        assert_eq!(result.exit_code, None);
    }
}
