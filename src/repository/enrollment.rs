//! Enrollment repository

use crate::domain::{Enrollment, EnrollmentWithCourse, EnrollmentWithStudent};
use crate::error::{AppError, Result};
use crate::repository::map_unique_violation;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const ENROLLMENT_COLUMNS: &str = "id, student_id, course_id, enrolled_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Insert a new enrollment; a duplicate (student, course) pair surfaces
    /// as `Conflict` through the storage-level uniqueness constraint.
    async fn create(&self, student_id: Uuid, course_id: Uuid) -> Result<Enrollment>;
    async fn exists(&self, student_id: Uuid, course_id: Uuid) -> Result<bool>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enrollment>>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Enrollment>>;
    async fn count(&self) -> Result<i64>;
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// A student's enrollments with course data, ordered by course code
    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<EnrollmentWithCourse>>;
    /// A course's roster with student data, ordered by last then first name
    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<EnrollmentWithStudent>>;
}

pub struct EnrollmentRepositoryImpl {
    pool: PgPool,
}

impl EnrollmentRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentRepository for EnrollmentRepositoryImpl {
    async fn create(&self, student_id: Uuid, course_id: Uuid) -> Result<Enrollment> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO enrollments (id, student_id, course_id, enrolled_at)
            VALUES ($1, $2, $3, now())
            "#,
        )
        .bind(id)
        .bind(student_id)
        .bind(course_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, "The student is already enrolled in this course")
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create enrollment")))
    }

    async fn exists(&self, student_id: Uuid, course_id: Uuid) -> Result<bool> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = $1 AND course_id = $2)",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Enrollment>> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS}
            FROM enrollments
            ORDER BY enrolled_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollments")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Enrollment {} not found", id)));
        }

        Ok(())
    }

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<EnrollmentWithCourse>> {
        let rows = sqlx::query_as::<_, EnrollmentWithCourse>(
            r#"
            SELECT c.id AS course_id, c.code, c.title, e.enrolled_at
            FROM enrollments e
            INNER JOIN courses c ON c.id = e.course_id
            WHERE e.student_id = $1
            ORDER BY c.code ASC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<EnrollmentWithStudent>> {
        let rows = sqlx::query_as::<_, EnrollmentWithStudent>(
            r#"
            SELECT s.id AS student_id, s.first_name, s.last_name, s.email, s.id_number,
                   e.enrolled_at
            FROM enrollments e
            INNER JOIN students s ON s.id = e.student_id
            WHERE e.course_id = $1
            ORDER BY s.last_name ASC, s.first_name ASC
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
