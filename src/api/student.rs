//! Student API handlers

use crate::api::{
    pdf_response, FilterQuery, MessageResponse, PaginatedResponse, PaginationQuery, ReportQuery,
    SuccessResponse,
};
use crate::domain::{CreateStudentInput, StudentFilter, UpdateStudentInput};
use crate::error::Result;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

fn filter_from_query(query: FilterQuery) -> StudentFilter {
    StudentFilter {
        search: query.search,
        ordering: query.ordering,
    }
}

/// List students
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<FilterQuery>,
) -> Result<impl IntoResponse> {
    let (students, total) = state
        .student_service
        .list(filter_from_query(filter), pagination.page, pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        students,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get student by ID
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse> {
    let student = state.student_service.get(id).await?;
    Ok(Json(SuccessResponse::new(student)))
}

/// Create student
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStudentInput>,
) -> Result<impl IntoResponse> {
    let student = state.student_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(student))))
}

/// Update student
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateStudentInput>,
) -> Result<impl IntoResponse> {
    let student = state.student_service.update(id, input).await?;
    Ok(Json(SuccessResponse::new(student)))
}

/// Delete student
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.student_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

/// List a student's enrollments with course data, ordered by course code
pub async fn courses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    // Resolve the student first so unknown ids report 404, not an empty list.
    let student = state.student_service.get(id).await?;
    let enrollments = state
        .enrollment_service
        .courses_for_student(student.id)
        .await?;
    Ok(Json(SuccessResponse::new(enrollments)))
}

/// Render the student's enrollment report as PDF
pub async fn report_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse> {
    let report = state.report_service.student_courses_report(id).await?;
    pdf_response(report, query.download)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_query() {
        let filter = filter_from_query(FilterQuery {
            search: Some("gomez".to_string()),
            ordering: Some("-last_name".to_string()),
        });
        assert_eq!(filter.search, Some("gomez".to_string()));
        assert_eq!(filter.ordering, Some("-last_name".to_string()));
    }

    #[test]
    fn test_create_student_input_deserialization() {
        let json = r#"{
            "first_name": "Ana",
            "last_name": "Gomez",
            "email": "ana@example.com",
            "id_number": "1234-5678"
        }"#;
        let input: CreateStudentInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.first_name, "Ana");
        assert_eq!(input.id_number, "1234-5678");
    }

    #[test]
    fn test_create_student_input_missing_email_rejected() {
        let json = r#"{"first_name": "Ana", "last_name": "Gomez", "id_number": "1234"}"#;
        let result: serde_json::Result<CreateStudentInput> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_student_input_empty_object() {
        let input: UpdateStudentInput = serde_json::from_str("{}").unwrap();
        assert!(input.first_name.is_none());
        assert!(input.email.is_none());
    }
}
