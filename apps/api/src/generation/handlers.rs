//! Axum route handlers for the ad generation API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::generation::generator::{generate_job_ads, suggest_job_details};
use crate::generation::models::{
    GenerationResponse, JobDetailsSuggestion, JobFormData, SuggestRequest,
};
use crate::state::AppState;

/// POST /api/v1/ads/generate
///
/// Generates the three channel ads plus the sourcing kit (boolean search,
/// hunting email, interview questions, analysis, SMS and voicemail scripts).
pub async fn handle_generate_ads(
    State(state): State<AppState>,
    Json(form): Json<JobFormData>,
) -> Result<Json<GenerationResponse>, AppError> {
    let kit = generate_job_ads(&form, state.generator.as_ref()).await?;
    Ok(Json(kit))
}

/// POST /api/v1/ads/suggest
///
/// Pre-fills the job form from a title.
pub async fn handle_suggest_details(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<JobDetailsSuggestion>, AppError> {
    let suggestion = suggest_job_details(&request.job_title, state.generator.as_ref()).await?;
    Ok(Json(suggestion))
}
