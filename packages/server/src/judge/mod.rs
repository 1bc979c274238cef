//! The judging pipeline: verdict evaluation, the per-submission test-case
//! loop, and the durable records it leaves behind.

pub mod evaluator;
pub mod orchestrator;
pub mod stats;
pub mod store;
