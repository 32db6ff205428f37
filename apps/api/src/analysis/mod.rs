//! Résumé analysis: one uploaded file in, one structured `AnalysisResult` out.
//!
//! The remote model is untrusted: its answer is structurally validated before
//! anything reaches the collection. Failures are all-or-nothing.

pub mod ids;
pub mod prompts;
pub mod schema;
pub mod upload;

use serde_json::Value;
use tracing::{error, info};

use crate::analysis::ids::IdAllocator;
use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::schema::analysis_schema;
use crate::analysis::upload::ResumeFile;
use crate::errors::ScreeningError;
use crate::llm_client::{parse_json_text, CompletionBackend, CompletionRequest, InlineAttachment};
use crate::models::{AnalysisResult, CandidateProfile};

pub const MALFORMED_MESSAGE: &str =
    "The AI failed to analyze the resume structure. Please try a different resume or format.";
pub const TRANSPORT_MESSAGE: &str = "An error occurred while communicating with the AI. \
    Please ensure the API key is valid and try again.";

/// Analyzes one résumé file, optionally against a job description.
pub async fn analyze_resume(
    backend: &dyn CompletionBackend,
    ids: &dyn IdAllocator,
    file: &ResumeFile,
    job_description: Option<&str>,
) -> Result<AnalysisResult, ScreeningError> {
    info!(
        "Analyzing resume '{}' ({}, {} bytes)",
        file.file_name,
        file.mime_type,
        file.bytes.len()
    );

    let request = CompletionRequest {
        prompt: build_analysis_prompt(job_description),
        attachment: Some(InlineAttachment::from_bytes(&file.mime_type, &file.bytes)),
        response_schema: analysis_schema(),
    };

    let text = backend.complete(&request).await.map_err(|e| {
        error!("Error analyzing resume '{}': {e}", file.file_name);
        if e.is_malformed() {
            ScreeningError::MalformedResponse(MALFORMED_MESSAGE.to_string())
        } else {
            ScreeningError::TransportFailure(TRANSPORT_MESSAGE.to_string())
        }
    })?;

    let profile = parse_profile(&text).map_err(|reason| {
        error!("Malformed analysis for '{}': {reason}", file.file_name);
        ScreeningError::MalformedResponse(MALFORMED_MESSAGE.to_string())
    })?;

    let result = AnalysisResult::new(ids.allocate(), profile);
    info!(
        "Analyzed '{}' as {} (score {:.1})",
        file.file_name,
        result.candidate_name(),
        result.job_fit_score()
    );
    Ok(result)
}

/// Parses and validates the model's answer. The error is a diagnostic for logs.
fn parse_profile(text: &str) -> Result<CandidateProfile, String> {
    let value: Value = parse_json_text(text).map_err(|e| e.to_string())?;
    validate_profile(&value)?;
    serde_json::from_value(value).map_err(|e| format!("schema mismatch: {e}"))
}

/// Minimal structural checks on the raw answer.
fn validate_profile(value: &Value) -> Result<(), String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "response is not a JSON object".to_string())?;

    match obj.get("candidateName").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => {}
        _ => return Err("missing or empty candidateName".to_string()),
    }

    if !obj.get("keySkills").is_some_and(Value::is_array) {
        return Err("keySkills is not an array".to_string());
    }

    if !obj.get("jobFitScore").is_some_and(Value::is_number) {
        return Err("jobFitScore is not a number".to_string());
    }

    match obj.get("jobFitScoreReason").and_then(Value::as_str) {
        Some(reason) if !reason.trim().is_empty() => Ok(()),
        _ => Err("missing jobFitScoreReason".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ids::SequentialIds;
    use crate::llm_client::testing::FakeBackend;
    use crate::llm_client::LlmError;
    use bytes::Bytes;
    use serde_json::json;

    fn sample_file() -> ResumeFile {
        ResumeFile::new(
            "jane_doe.pdf",
            Some("application/pdf"),
            Bytes::from_static(b"%PDF-1.7 resume"),
        )
    }

    fn valid_answer() -> Value {
        json!({
            "candidateName": "Jane Doe",
            "email": "jane@example.com",
            "keySkills": ["Rust", "Kubernetes"],
            "education": [{"degree": "BSc Computer Science", "institution": "MIT", "year": "2014"}],
            "totalExperience": "8+ years",
            "suitableJobRoles": ["Backend Engineer", "SRE", "Platform Engineer"],
            "jobFitScore": 8.5,
            "jobFitScoreReason": "Strong systems background."
        })
    }

    #[tokio::test]
    async fn test_successful_analysis_attaches_fresh_id() {
        let backend = FakeBackend::new().with_json(valid_answer());
        let ids = SequentialIds::new("r");

        let result = analyze_resume(&backend, &ids, &sample_file(), None)
            .await
            .unwrap();

        assert_eq!(result.id, "r-1");
        assert_eq!(result.candidate_name(), "Jane Doe");
        assert_eq!(result.profile.key_skills, vec!["Rust", "Kubernetes"]);
        assert_eq!(result.profile.education[0].year.as_deref(), Some("2014"));
        assert!(result.profile.phone.is_none());
    }

    #[tokio::test]
    async fn test_request_carries_file_and_schema() {
        let backend = FakeBackend::new().with_json(valid_answer());
        let ids = SequentialIds::new("r");

        analyze_resume(&backend, &ids, &sample_file(), Some("Rust platform role"))
            .await
            .unwrap();

        let request = backend.last_request();
        let attachment = request.attachment.expect("file is attached");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.data, "JVBERi0xLjcgcmVzdW1l");
        assert!(request.prompt.contains("Rust platform role"));
        assert_eq!(request.response_schema, analysis_schema());
    }

    #[tokio::test]
    async fn test_null_optional_fields_read_as_empty() {
        let mut answer = valid_answer();
        answer["totalExperience"] = Value::Null;
        answer["education"] = Value::Null;
        answer["suitableJobRoles"] = Value::Null;
        let backend = FakeBackend::new().with_json(answer);

        let result = analyze_resume(&backend, &SequentialIds::new("r"), &sample_file(), None)
            .await
            .unwrap();

        assert_eq!(result.profile.total_experience, "");
        assert!(result.profile.education.is_empty());
        assert!(result.profile.suitable_job_roles.is_empty());
        assert_eq!(result.experience_years(), 0.0);
    }

    #[tokio::test]
    async fn test_missing_reason_is_malformed() {
        let mut answer = valid_answer();
        answer.as_object_mut().unwrap().remove("jobFitScoreReason");
        let backend = FakeBackend::new().with_json(answer);

        let err = analyze_resume(&backend, &SequentialIds::new("r"), &sample_file(), None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ScreeningError::MalformedResponse(MALFORMED_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_string_score_is_malformed() {
        let mut answer = valid_answer();
        answer["jobFitScore"] = json!("8.5");
        let backend = FakeBackend::new().with_json(answer);

        let err = analyze_resume(&backend, &SequentialIds::new("r"), &sample_file(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ScreeningError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_non_json_answer_is_malformed() {
        let backend = FakeBackend::new().with_text("I could not read this file.");

        let err = analyze_resume(&backend, &SequentialIds::new("r"), &sample_file(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ScreeningError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_api_failure_is_transport_failure() {
        let backend = FakeBackend::new().with_failure(LlmError::Api {
            status: 400,
            message: "API key not valid".to_string(),
        });

        let err = analyze_resume(&backend, &SequentialIds::new("r"), &sample_file(), None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ScreeningError::TransportFailure(TRANSPORT_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_kept() {
        let mut answer = valid_answer();
        answer["jobFitScore"] = json!(42);
        let backend = FakeBackend::new().with_json(answer);

        let result = analyze_resume(&backend, &SequentialIds::new("r"), &sample_file(), None)
            .await
            .unwrap();

        assert_eq!(result.job_fit_score(), 42.0);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut answer = valid_answer();
        answer["candidateName"] = json!("  ");
        assert!(validate_profile(&answer).is_err());
    }

    #[test]
    fn test_validate_rejects_skills_object() {
        let mut answer = valid_answer();
        answer["keySkills"] = json!({"primary": "Rust"});
        assert!(validate_profile(&answer).is_err());
    }

    #[test]
    fn test_validate_rejects_array_root() {
        assert!(validate_profile(&json!([valid_answer()])).is_err());
    }
}
