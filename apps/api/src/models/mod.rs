pub mod candidate;
pub mod evaluation;
pub mod job;

pub use candidate::CandidateDocument;
pub use evaluation::{EvaluationResult, EvaluationStatus};
pub use job::{JobDescription, JobSource};
