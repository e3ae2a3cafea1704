pub mod job;
pub mod match_result;

pub use job::{job_id, Job, JobSource, Salary};
pub use match_result::MatchResult;
