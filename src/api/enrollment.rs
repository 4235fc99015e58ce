//! Enrollment API handlers

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::RegisterEnrollmentRequest;
use crate::error::Result;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// List enrollments
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (enrollments, total) = state
        .enrollment_service
        .list(pagination.page, pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        enrollments,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get enrollment by ID
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse> {
    let enrollment = state.enrollment_service.get(id).await?;
    Ok(Json(SuccessResponse::new(enrollment)))
}

/// Register a student in a course
///
/// Responds 201 with the enrollment and a credentials block; the block
/// carries the one-time temporary password only when this call provisioned
/// the account.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<RegisterEnrollmentRequest>,
) -> Result<impl IntoResponse> {
    let result = state.enrollment_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Delete enrollment
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.enrollment_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Enrollment deleted successfully")))
}
