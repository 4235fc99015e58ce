//! Student repository

use crate::domain::{CreateStudentInput, Student, StudentFilter, UpdateStudentInput};
use crate::error::{AppError, Result};
use crate::repository::map_unique_violation;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const STUDENT_COLUMNS: &str =
    "id, user_id, first_name, last_name, email, id_number, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, input: &CreateStudentInput) -> Result<Student>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Student>>;
    async fn list(&self, filter: &StudentFilter, offset: i64, limit: i64)
        -> Result<Vec<Student>>;
    async fn count(&self, filter: &StudentFilter) -> Result<i64>;
    async fn update(&self, id: Uuid, input: &UpdateStudentInput) -> Result<Student>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub struct StudentRepositoryImpl {
    pool: PgPool,
}

impl StudentRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Whitelisted ORDER BY fragments; anything unrecognized falls back to the
/// roster ordering (last name, then first name).
fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("first_name") => "first_name ASC, last_name ASC",
        Some("-first_name") => "first_name DESC, last_name DESC",
        Some("-last_name") => "last_name DESC, first_name DESC",
        _ => "last_name ASC, first_name ASC",
    }
}

fn search_pattern(filter: &StudentFilter) -> Option<String> {
    filter.search.as_ref().map(|s| format!("%{}%", s))
}

#[async_trait]
impl StudentRepository for StudentRepositoryImpl {
    async fn create(&self, input: &CreateStudentInput) -> Result<Student> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO students (id, first_name, last_name, email, id_number, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, now(), now())
            "#,
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.id_number)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, "A student with this email or id number already exists")
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create student")))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn list(
        &self,
        filter: &StudentFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Student>> {
        let sql = format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE ($1::text IS NULL
                   OR first_name ILIKE $1
                   OR last_name ILIKE $1
                   OR email ILIKE $1
                   OR id_number ILIKE $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            order_clause(filter.ordering.as_deref())
        );

        let students = sqlx::query_as::<_, Student>(&sql)
            .bind(search_pattern(filter))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    async fn count(&self, filter: &StudentFilter) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM students
            WHERE ($1::text IS NULL
                   OR first_name ILIKE $1
                   OR last_name ILIKE $1
                   OR email ILIKE $1
                   OR id_number ILIKE $1)
            "#,
        )
        .bind(search_pattern(filter))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn update(&self, id: Uuid, input: &UpdateStudentInput) -> Result<Student> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", id)))?;

        let first_name = input.first_name.as_ref().unwrap_or(&existing.first_name);
        let last_name = input.last_name.as_ref().unwrap_or(&existing.last_name);
        let email = input.email.as_ref().unwrap_or(&existing.email);
        let id_number = input.id_number.as_ref().unwrap_or(&existing.id_number);

        sqlx::query(
            r#"
            UPDATE students
            SET first_name = $1, last_name = $2, email = $3, id_number = $4, updated_at = now()
            WHERE id = $5
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(id_number)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, "A student with this email or id number already exists")
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update student")))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Student {} not found", id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_whitelist() {
        assert_eq!(order_clause(None), "last_name ASC, first_name ASC");
        assert_eq!(order_clause(Some("first_name")), "first_name ASC, last_name ASC");
        assert_eq!(order_clause(Some("-last_name")), "last_name DESC, first_name DESC");
        // Unknown columns never reach the SQL string
        assert_eq!(
            order_clause(Some("id_number; DROP TABLE students")),
            "last_name ASC, first_name ASC"
        );
    }

    #[test]
    fn test_search_pattern() {
        let filter = StudentFilter {
            search: Some("gomez".to_string()),
            ordering: None,
        };
        assert_eq!(search_pattern(&filter), Some("%gomez%".to_string()));
        assert_eq!(search_pattern(&StudentFilter::default()), None);
    }
}
