//! Data access layer (Repository pattern)

pub mod account;
pub mod course;
pub mod enrollment;
pub mod student;

pub use account::AccountRepository;
pub use course::CourseRepository;
pub use enrollment::EnrollmentRepository;
pub use student::StudentRepository;

use crate::error::AppError;

/// Map a storage-level unique violation to a caller-visible conflict.
///
/// The uniqueness constraints close the check-then-insert race: concurrent
/// writers both pass the application-level check, the constraint lets exactly
/// one insert through, and the losers surface here.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}
