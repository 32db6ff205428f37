use serde::{Deserialize, Serialize};

/// Per-candidate strengths and weaknesses from one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateComparisonDetail {
    pub candidate_name: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// Cross-candidate recommendation. Lives only for the current comparison view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonInsight {
    pub best_fit_candidate_name: String,
    pub recommendation_reason: String,
    pub candidate_comparison: Vec<CandidateComparisonDetail>,
}
