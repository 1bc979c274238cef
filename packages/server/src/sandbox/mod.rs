//! Client for the external code-execution sandbox.
//!
//! The sandbox compiles and runs untrusted source under resource limits and
//! reports stdout/stderr/exit metrics. Everything past this module operates
//! on the normalized [`common::ExecutionResult`] only.

mod client;
mod runtime;

pub use client::SandboxClient;
pub use runtime::{RuntimeMap, RuntimeSpec};

use async_trait::async_trait;
use common::ExecutionResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    /// The language has no runtime mapping. Detected locally, before any
    /// network call.
    #[error("language '{0}' is not supported")]
    UnsupportedLanguage(String),
    /// Network failure, non-2xx response, or a response body that does not
    /// match the sandbox schema. Distinct from the judged program failing.
    #[error("sandbox transport failure: {0}")]
    Transport(String),
}

/// Execution seam between the orchestrator and the sandbox.
///
/// One invocation means one sandbox run of `code` against `stdin`.
#[async_trait]
pub trait Execute: Send + Sync {
    async fn execute(
        &self,
        code: &str,
        language: &str,
        stdin: &str,
        time_limit_ms: i64,
        memory_limit_mb: i64,
    ) -> Result<ExecutionResult, SandboxError>;
}
