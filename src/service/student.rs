//! Student business logic

use crate::domain::{CreateStudentInput, Student, StudentFilter, UpdateStudentInput};
use crate::error::{AppError, Result};
use crate::repository::StudentRepository;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct StudentService<R: StudentRepository> {
    repo: Arc<R>,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateStudentInput) -> Result<Student> {
        input.validate()?;
        self.repo.create(&input).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Student> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", id)))
    }

    pub async fn list(
        &self,
        filter: StudentFilter,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Student>, i64)> {
        let offset = (page - 1) * per_page;
        let students = self.repo.list(&filter, offset, per_page).await?;
        let total = self.repo.count(&filter).await?;
        Ok((students, total))
    }

    pub async fn update(&self, id: Uuid, input: UpdateStudentInput) -> Result<Student> {
        input.validate()?;
        self.repo.update(id, &input).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo.delete(id).await
    }
}
