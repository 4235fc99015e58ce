//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates the domain schemas into a single OpenAPI specification.
//! Swagger UI and ReDoc are mounted by the server.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Matricula Core API",
        version = "0.1.0",
        description = "Student, course, and enrollment administration API"
    ),
    tags(
        (name = "System", description = "Health checks and system status"),
        (name = "Students", description = "Student records and their reports"),
        (name = "Courses", description = "Course records and their rosters"),
        (name = "Enrollments", description = "Enrollment registration and account provisioning"),
        (name = "Auth", description = "Token-based authentication"),
    ),
    components(
        schemas(
            // ── Shared response types ──────────────────────────────────
            crate::api::PaginationQuery,
            crate::api::PaginationMeta,
            crate::api::MessageResponse,
            crate::api::FilterQuery,
            crate::api::ReportQuery,

            // ── Student domain ─────────────────────────────────────────
            crate::domain::Student,
            crate::domain::CreateStudentInput,
            crate::domain::UpdateStudentInput,

            // ── Course domain ──────────────────────────────────────────
            crate::domain::Course,
            crate::domain::CreateCourseInput,
            crate::domain::UpdateCourseInput,

            // ── Enrollment domain ──────────────────────────────────────
            crate::domain::Enrollment,
            crate::domain::EnrollmentWithCourse,
            crate::domain::EnrollmentWithStudent,
            crate::domain::RegisterEnrollmentRequest,
            crate::domain::CredentialsBlock,
            crate::domain::EnrollmentResult,

            // ── Accounts & auth ────────────────────────────────────────
            crate::domain::LoginAccount,
            crate::domain::Role,
            crate::service::auth::LoginRequest,
            crate::service::auth::RefreshRequest,
            crate::service::auth::LoginResponse,
            crate::service::auth::RefreshResponse,
            crate::service::auth::AuthenticatedUser,
        )
    )
)]
pub struct ApiDoc;
