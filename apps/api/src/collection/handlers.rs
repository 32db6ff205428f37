//! Axum route handlers for the screening session.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::warn;

use crate::analysis::analyze_resume;
use crate::analysis::upload::ResumeFile;
use crate::collection::filter::{FilterCriteria, SortMode};
use crate::collection::SessionSnapshot;
use crate::comparison::compare_candidates;
use crate::errors::AppError;
use crate::models::{AnalysisResult, ComparisonInsight};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub sort: SortMode,
}

/// Fields read from an upload form.
struct UploadForm {
    file: ResumeFile,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.collection.read().await.snapshot())
}

/// PUT /api/v1/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Json(request): Json<JobDescriptionRequest>,
) -> Json<SessionSnapshot> {
    let mut collection = state.collection.write().await;
    collection.set_job_description(request.job_description);
    Json(collection.snapshot())
}

/// POST /api/v1/resumes
///
/// Multipart form: `file` (required), `job_description` (optional, overrides
/// the session's job description for this analysis only).
/// The collection lock is not held while the model is working, and the call
/// runs to completion even if the request is dropped.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AnalysisResult>), AppError> {
    let form = read_upload_form(multipart).await?;

    if !form.file.is_advertised_type() {
        warn!(
            "Uploaded file '{}' ({}) is not an advertised type; forwarding anyway",
            form.file.file_name, form.file.mime_type
        );
    }

    let session_jd = state.collection.write().await.begin_analysis();
    let job_description = form.job_description.unwrap_or(session_jd);
    let file = form.file;

    // Detached: the outcome lands in the session even if the client disconnects.
    let outcome = tokio::spawn(async move {
        let outcome = analyze_resume(
            state.llm.as_ref(),
            state.ids.as_ref(),
            &file,
            Some(job_description.as_str()),
        )
        .await;
        state.collection.write().await.finish_analysis(&outcome);
        outcome
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok((StatusCode::CREATED, Json(outcome?)))
}

/// DELETE /api/v1/resumes
pub async fn handle_clear_all(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut collection = state.collection.write().await;
    collection.clear_all();
    Json(collection.snapshot())
}

/// POST /api/v1/resumes/:id/select
pub async fn handle_toggle_select(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut collection = state.collection.write().await;
    if !collection.toggle_select(&id) {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(Json(collection.snapshot()))
}

/// POST /api/v1/resumes/:id/expand
pub async fn handle_toggle_expand(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut collection = state.collection.write().await;
    if !collection.toggle_expand(&id) {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(Json(collection.snapshot()))
}

/// PUT /api/v1/filters
pub async fn handle_set_filters(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<Json<SessionSnapshot>, AppError> {
    if !criteria.min_score.is_finite() || !criteria.min_experience.is_finite() {
        return Err(AppError::Validation(
            "filter minimums must be finite numbers".to_string(),
        ));
    }
    let mut collection = state.collection.write().await;
    collection.set_filter(criteria);
    Ok(Json(collection.snapshot()))
}

/// DELETE /api/v1/filters
pub async fn handle_reset_filters(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut collection = state.collection.write().await;
    collection.reset_filters();
    Json(collection.snapshot())
}

/// PUT /api/v1/sort
pub async fn handle_set_sort(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> Json<SessionSnapshot> {
    let mut collection = state.collection.write().await;
    collection.set_sort(request.sort);
    Json(collection.snapshot())
}

/// POST /api/v1/comparison
///
/// Compares the current selection. 409 when fewer than two are selected.
/// Like uploads, the remote call outlives a dropped request.
pub async fn handle_compare(
    State(state): State<AppState>,
) -> Result<Json<ComparisonInsight>, AppError> {
    let pending = state
        .collection
        .write()
        .await
        .begin_comparison()
        .ok_or_else(|| {
            AppError::Conflict("Select at least 2 candidates to compare".to_string())
        })?;

    let outcome = tokio::spawn(async move {
        let outcome = compare_candidates(
            state.llm.as_ref(),
            &pending.candidates,
            &pending.job_description,
        )
        .await;
        state
            .collection
            .write()
            .await
            .finish_comparison(pending.ticket, outcome.clone());
        outcome
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(outcome?))
}

/// DELETE /api/v1/comparison
pub async fn handle_close_comparison(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut collection = state.collection.write().await;
    collection.close_comparison();
    Json(collection.snapshot())
}

/// DELETE /api/v1/errors/analysis
pub async fn handle_dismiss_analysis_error(
    State(state): State<AppState>,
) -> Json<SessionSnapshot> {
    let mut collection = state.collection.write().await;
    collection.dismiss_analysis_error();
    Json(collection.snapshot())
}

/// DELETE /api/v1/errors/comparison
pub async fn handle_dismiss_comparison_error(
    State(state): State<AppState>,
) -> Json<SessionSnapshot> {
    let mut collection = state.collection.write().await;
    collection.dismiss_comparison_error();
    Json(collection.snapshot())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<ResumeFile> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                if file.is_some() {
                    return Err(AppError::Validation(
                        "only one file may be uploaded per request".to_string(),
                    ));
                }
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file: {e}")))?;
                file = Some(ResumeFile::new(file_name, content_type.as_deref(), bytes));
            }
            Some("job_description") | Some("jobDescription") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid job description: {e}")))?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    if file.bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    Ok(UploadForm {
        file,
        job_description,
    })
}
