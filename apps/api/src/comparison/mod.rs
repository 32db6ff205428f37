//! Candidate comparison: already-analyzed candidates in, one `ComparisonInsight` out.
//!
//! Candidates are sent without their local ids; the model correlates them by
//! `candidateName`. Nothing is cached: every call is a full round trip.

pub mod prompts;
pub mod schema;

use serde_json::Value;
use tracing::{error, info};

use crate::comparison::prompts::build_comparison_prompt;
use crate::comparison::schema::comparison_schema;
use crate::errors::ScreeningError;
use crate::llm_client::{parse_json_text, CompletionBackend, CompletionRequest};
use crate::models::{AnalysisResult, CandidateProfile, ComparisonInsight};

pub const MIN_CANDIDATES: usize = 2;

pub const MALFORMED_MESSAGE: &str = "The AI failed to generate a comparison. Please try again.";
pub const TRANSPORT_MESSAGE: &str =
    "An error occurred while communicating with the AI for comparison. Please try again.";

/// Compares `candidates` against a job description (blank means a generic role).
pub async fn compare_candidates(
    backend: &dyn CompletionBackend,
    candidates: &[AnalysisResult],
    job_description: &str,
) -> Result<ComparisonInsight, ScreeningError> {
    if candidates.len() < MIN_CANDIDATES {
        return Err(ScreeningError::NotEnoughCandidates(candidates.len()));
    }

    info!("Comparing {} candidates", candidates.len());

    let profiles: Vec<&CandidateProfile> = candidates.iter().map(|c| &c.profile).collect();
    let candidate_data = serde_json::to_string_pretty(&profiles).map_err(|e| {
        error!("Failed to serialize candidate data: {e}");
        ScreeningError::TransportFailure(TRANSPORT_MESSAGE.to_string())
    })?;

    let request = CompletionRequest {
        prompt: build_comparison_prompt(job_description, candidates.len(), &candidate_data),
        attachment: None,
        response_schema: comparison_schema(),
    };

    let text = backend.complete(&request).await.map_err(|e| {
        error!("Error comparing candidates: {e}");
        if e.is_malformed() {
            ScreeningError::MalformedResponse(MALFORMED_MESSAGE.to_string())
        } else {
            ScreeningError::TransportFailure(TRANSPORT_MESSAGE.to_string())
        }
    })?;

    let insight = parse_insight(&text).map_err(|reason| {
        error!("Malformed comparison: {reason}");
        ScreeningError::MalformedResponse(MALFORMED_MESSAGE.to_string())
    })?;

    info!(
        "Comparison recommends {} ({} candidates detailed)",
        insight.best_fit_candidate_name,
        insight.candidate_comparison.len()
    );
    Ok(insight)
}

fn parse_insight(text: &str) -> Result<ComparisonInsight, String> {
    let value: Value = parse_json_text(text).map_err(|e| e.to_string())?;
    validate_insight(&value)?;
    serde_json::from_value(value).map_err(|e| format!("schema mismatch: {e}"))
}

fn validate_insight(value: &Value) -> Result<(), String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "response is not a JSON object".to_string())?;

    for field in ["bestFitCandidateName", "recommendationReason"] {
        match obj.get(field).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => {}
            _ => return Err(format!("missing or empty {field}")),
        }
    }

    if !obj.get("candidateComparison").is_some_and(Value::is_array) {
        return Err("candidateComparison is not an array".to_string());
    }

    Ok(())
}
