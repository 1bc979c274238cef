use serde::{Deserialize, Serialize};

/// Normalized result of one sandbox execution.
///
/// This is the only execution shape downstream code (evaluator, orchestrator)
/// ever sees. Sandbox wire field names stay behind the execution client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Program stdout.
    pub stdout: String,
    /// Program stderr.
    pub stderr: String,
    /// Compiler stderr, if the runtime has a compile step and it produced output.
    /// Interpreted languages have no compile step at all.
    pub compile_stderr: Option<String>,
    /// Process exit code. None when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Signal that killed the process (e.g. "SIGKILL"), if any.
    pub signal: Option<String>,
    /// Wall-clock run time in milliseconds.
    pub time_ms: i64,
    /// Peak memory usage in bytes.
    pub memory_bytes: i64,
}

impl ExecutionResult {
    /// True if the compile step failed (non-empty compiler stderr).
    /// A compile failure is language-wide: it invalidates every test case.
    pub fn compile_failed(&self) -> bool {
        self.compile_stderr
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}
