//! Course repository

use crate::domain::{Course, CourseFilter, CreateCourseInput, UpdateCourseInput};
use crate::error::{AppError, Result};
use crate::repository::map_unique_violation;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const COURSE_COLUMNS: &str = "id, code, title, capacity, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, input: &CreateCourseInput) -> Result<Course>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>>;
    async fn list(&self, filter: &CourseFilter, offset: i64, limit: i64) -> Result<Vec<Course>>;
    async fn count(&self, filter: &CourseFilter) -> Result<i64>;
    async fn update(&self, id: Uuid, input: &UpdateCourseInput) -> Result<Course>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub struct CourseRepositoryImpl {
    pool: PgPool,
}

impl CourseRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("title") => "title ASC, code ASC",
        Some("-title") => "title DESC, code DESC",
        Some("-code") => "code DESC",
        _ => "code ASC",
    }
}

fn search_pattern(filter: &CourseFilter) -> Option<String> {
    filter.search.as_ref().map(|s| format!("%{}%", s))
}

#[async_trait]
impl CourseRepository for CourseRepositoryImpl {
    async fn create(&self, input: &CreateCourseInput) -> Result<Course> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO courses (id, code, title, capacity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            "#,
        )
        .bind(id)
        .bind(&input.code)
        .bind(&input.title)
        .bind(input.capacity)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "A course with this code already exists"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create course")))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn list(&self, filter: &CourseFilter, offset: i64, limit: i64) -> Result<Vec<Course>> {
        let sql = format!(
            r#"
            SELECT {COURSE_COLUMNS}
            FROM courses
            WHERE ($1::text IS NULL OR code ILIKE $1 OR title ILIKE $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            order_clause(filter.ordering.as_deref())
        );

        let courses = sqlx::query_as::<_, Course>(&sql)
            .bind(search_pattern(filter))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(courses)
    }

    async fn count(&self, filter: &CourseFilter) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM courses
            WHERE ($1::text IS NULL OR code ILIKE $1 OR title ILIKE $1)
            "#,
        )
        .bind(search_pattern(filter))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn update(&self, id: Uuid, input: &UpdateCourseInput) -> Result<Course> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;

        let code = input.code.as_ref().unwrap_or(&existing.code);
        let title = input.title.as_ref().unwrap_or(&existing.title);
        let capacity = input.capacity.unwrap_or(existing.capacity);

        sqlx::query(
            r#"
            UPDATE courses
            SET code = $1, title = $2, capacity = $3, updated_at = now()
            WHERE id = $4
            "#,
        )
        .bind(code)
        .bind(title)
        .bind(capacity)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "A course with this code already exists"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update course")))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Course {} not found", id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_whitelist() {
        assert_eq!(order_clause(None), "code ASC");
        assert_eq!(order_clause(Some("title")), "title ASC, code ASC");
        assert_eq!(order_clause(Some("-code")), "code DESC");
        assert_eq!(order_clause(Some("capacity")), "code ASC");
    }
}
