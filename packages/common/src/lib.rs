pub mod execution;
pub mod submission_status;

pub use execution::ExecutionResult;
pub use submission_status::SubmissionStatus;
