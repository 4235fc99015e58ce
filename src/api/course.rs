//! Course API handlers

use crate::api::{
    pdf_response, FilterQuery, MessageResponse, PaginatedResponse, PaginationQuery, ReportQuery,
    SuccessResponse,
};
use crate::domain::{CourseFilter, CreateCourseInput, UpdateCourseInput};
use crate::error::Result;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

fn filter_from_query(query: FilterQuery) -> CourseFilter {
    CourseFilter {
        search: query.search,
        ordering: query.ordering,
    }
}

/// List courses
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<FilterQuery>,
) -> Result<impl IntoResponse> {
    let (courses, total) = state
        .course_service
        .list(filter_from_query(filter), pagination.page, pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        courses,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get course by ID
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse> {
    let course = state.course_service.get(id).await?;
    Ok(Json(SuccessResponse::new(course)))
}

/// Create course
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCourseInput>,
) -> Result<impl IntoResponse> {
    let course = state.course_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(course))))
}

/// Update course
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCourseInput>,
) -> Result<impl IntoResponse> {
    let course = state.course_service.update(id, input).await?;
    Ok(Json(SuccessResponse::new(course)))
}

/// Delete course
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.course_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

/// List a course's roster, ordered by student last then first name
pub async fn students(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let course = state.course_service.get(id).await?;
    let roster = state.enrollment_service.roster_for_course(course.id).await?;
    Ok(Json(SuccessResponse::new(roster)))
}

/// Render the course roster report as PDF
pub async fn report_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse> {
    let report = state.report_service.course_roster_report(id).await?;
    pdf_response(report, query.download)
}
