//! Enrollment domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Enrollment entity: links one Student to one Course
///
/// The (student_id, course_id) pair is unique and the record is immutable
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

/// An enrollment joined with its course, for a student's course listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EnrollmentWithCourse {
    pub course_id: Uuid,
    pub code: String,
    pub title: String,
    pub enrolled_at: DateTime<Utc>,
}

/// An enrollment joined with its student, for a course roster
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EnrollmentWithStudent {
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub id_number: String,
    pub enrolled_at: DateTime<Utc>,
}

/// Registration request body; both references are required, but absence is
/// reported through the error taxonomy rather than a deserialization failure
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterEnrollmentRequest {
    pub student: Option<Uuid>,
    pub course: Option<Uuid>,
}

/// Credentials block returned with every successful registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CredentialsBlock {
    pub username: String,
    pub email: String,
    pub account_created: bool,
    /// Present only when the account was freshly provisioned; the one-time
    /// initial password, never persisted in the clear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

/// Result of a successful registration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollmentResult {
    pub enrollment: Enrollment,
    pub credentials: CredentialsBlock,
}
