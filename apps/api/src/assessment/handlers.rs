//! Axum route handlers for profiles and assessments.
//!
//! Auth is out of scope for this service, so callers identify
//! themselves explicitly: `user_id` query param on GET/DELETE, body
//! field on POST/PATCH.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::progress::completion_percentage;
use crate::assessment::service;
use crate::errors::AppError;
use crate::models::assessment::{Assessment, AssessmentSummary};
use crate::models::profile::ProfileSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssessmentRequest {
    pub user_id: Uuid,
    pub job_role: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleItemRequest {
    pub user_id: Uuid,
    pub category: String,
    pub item: String,
}

#[derive(Debug, Deserialize)]
pub struct PutProfileRequest {
    pub user_id: Uuid,
    pub profile: ProfileSnapshot,
}

/// Full assessment plus the derived completion percentage.
#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    #[serde(flatten)]
    pub assessment: Assessment,
    #[serde(rename = "progressPercent")]
    pub progress_percent: u32,
}

impl From<Assessment> for AssessmentResponse {
    fn from(assessment: Assessment) -> Self {
        let progress_percent =
            completion_percentage(&assessment.result, &assessment.completed_items);
        Self {
            assessment,
            progress_percent,
        }
    }
}

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProfileSnapshot>, AppError> {
    let snapshot = state.profiles.get_profile(params.user_id).await?;
    Ok(Json(snapshot))
}

/// PUT /api/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Json(req): Json<PutProfileRequest>,
) -> Result<Json<ProfileSnapshot>, AppError> {
    state.profiles.put_profile(req.user_id, &req.profile).await?;
    Ok(Json(req.profile))
}

/// POST /api/assessments
pub async fn handle_create_assessment(
    State(state): State<AppState>,
    Json(req): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentResponse>), AppError> {
    let assessment = service::create_assessment(
        state.profiles.as_ref(),
        state.assessments.as_ref(),
        &state.gateway,
        req.user_id,
        &req.job_role,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(assessment.into())))
}

/// GET /api/assessments
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<AssessmentSummary>>, AppError> {
    let summaries =
        service::list_assessments(state.assessments.as_ref(), params.user_id).await?;
    Ok(Json(summaries))
}

/// GET /api/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let assessment =
        service::get_assessment(state.assessments.as_ref(), id, params.user_id).await?;
    Ok(Json(assessment.into()))
}

/// PATCH /api/assessments/:id/complete-item
pub async fn handle_complete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleItemRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let assessment = service::toggle_item(
        state.assessments.as_ref(),
        id,
        req.user_id,
        &req.category,
        &req.item,
        true,
    )
    .await?;
    Ok(Json(assessment.into()))
}

/// PATCH /api/assessments/:id/uncomplete-item
pub async fn handle_uncomplete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleItemRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let assessment = service::toggle_item(
        state.assessments.as_ref(),
        id,
        req.user_id,
        &req.category,
        &req.item,
        false,
    )
    .await?;
    Ok(Json(assessment.into()))
}

/// DELETE /api/assessments/:id
pub async fn handle_delete_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    service::delete_assessment(state.assessments.as_ref(), id, params.user_id).await?;
    Ok(Json(serde_json::json!({ "message": "Assessment deleted" })))
}
