//! Course business logic

use crate::domain::{Course, CourseFilter, CreateCourseInput, UpdateCourseInput};
use crate::error::{AppError, Result};
use crate::repository::CourseRepository;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct CourseService<R: CourseRepository> {
    repo: Arc<R>,
}

impl<R: CourseRepository> CourseService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateCourseInput) -> Result<Course> {
        input.validate()?;
        self.repo.create(&input).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Course> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))
    }

    pub async fn list(
        &self,
        filter: CourseFilter,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Course>, i64)> {
        let offset = (page - 1) * per_page;
        let courses = self.repo.list(&filter, offset, per_page).await?;
        let total = self.repo.count(&filter).await?;
        Ok((courses, total))
    }

    pub async fn update(&self, id: Uuid, input: UpdateCourseInput) -> Result<Course> {
        input.validate()?;
        self.repo.update(id, &input).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo.delete(id).await
    }
}
