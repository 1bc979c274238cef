pub mod judge;
pub mod submission;
