//! Axum route handlers for the Enrichment API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::enrichment::models::{EnrichmentRequest, EnrichmentResult};
use crate::enrichment::orchestrator::AcquisitionStrategy;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/profiles/enhance
///
/// Suggests a bio and skills for a developer from their scraped GitHub profile
/// page plus their dashboard skills/projects. Always answers with an
/// `EnrichmentResult`; only an unreadable request body is rejected.
pub async fn handle_enhance_profile(
    State(state): State<AppState>,
    payload: Result<Json<EnrichmentRequest>, JsonRejection>,
) -> Result<Json<EnrichmentResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let result = state
        .orchestrator
        .run(&request, AcquisitionStrategy::RawDocument)
        .await;
    Ok(Json(result))
}

/// POST /api/v1/candidates/shortlist
///
/// Recruiter-facing summary, tech stack and flagged items from the GitHub API.
pub async fn handle_shortlist_candidate(
    State(state): State<AppState>,
    payload: Result<Json<EnrichmentRequest>, JsonRejection>,
) -> Result<Json<EnrichmentResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let result = state
        .orchestrator
        .run(&request, AcquisitionStrategy::StructuredApi)
        .await;
    Ok(Json(result))
}
