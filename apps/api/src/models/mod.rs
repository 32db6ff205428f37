pub mod candidate;
pub mod comparison;

pub use candidate::{AnalysisResult, CandidateProfile, ScoreTier};
pub use comparison::ComparisonInsight;
