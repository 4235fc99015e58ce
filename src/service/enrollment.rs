//! Enrollment registration business logic

use crate::domain::{
    CredentialsBlock, Enrollment, EnrollmentResult, RegisterEnrollmentRequest, Student,
};
use crate::error::{AppError, Result};
use crate::repository::{
    AccountRepository, CourseRepository, EnrollmentRepository, StudentRepository,
};
use crate::service::account::AccountProvisioner;
use std::sync::Arc;
use uuid::Uuid;

pub struct EnrollmentService<
    E: EnrollmentRepository,
    S: StudentRepository,
    C: CourseRepository,
    A: AccountRepository,
> {
    enrollment_repo: Arc<E>,
    student_repo: Arc<S>,
    course_repo: Arc<C>,
    account_repo: Arc<A>,
    provisioner: Arc<AccountProvisioner<A>>,
}

impl<
        E: EnrollmentRepository,
        S: StudentRepository,
        C: CourseRepository,
        A: AccountRepository,
    > EnrollmentService<E, S, C, A>
{
    pub fn new(
        enrollment_repo: Arc<E>,
        student_repo: Arc<S>,
        course_repo: Arc<C>,
        account_repo: Arc<A>,
        provisioner: Arc<AccountProvisioner<A>>,
    ) -> Self {
        Self {
            enrollment_repo,
            student_repo,
            course_repo,
            account_repo,
            provisioner,
        }
    }

    /// Register a student in a course, provisioning a login account on the
    /// student's first enrollment.
    ///
    /// Validation order: missing parameters, unknown records, duplicate
    /// pair. All checks run before any write; the storage constraints back
    /// the checks under concurrency.
    pub async fn register(&self, request: RegisterEnrollmentRequest) -> Result<EnrollmentResult> {
        let (student_id, course_id) = match (request.student, request.course) {
            (Some(student), Some(course)) => (student, course),
            _ => {
                return Err(AppError::MissingParameter(
                    "student and course are required".to_string(),
                ))
            }
        };

        let student = self
            .student_repo
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student or course not found".to_string()))?;
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student or course not found".to_string()))?;

        if self.enrollment_repo.exists(student_id, course_id).await? {
            return Err(AppError::Conflict(format!(
                "The student is already enrolled in course {}",
                course.code
            )));
        }

        let enrollment = self.enrollment_repo.create(student_id, course_id).await?;

        let credentials = match self.resolve_credentials(&student).await {
            Ok(credentials) => credentials,
            Err(e) => {
                // A failed registration must not leave a half-registered
                // state behind; the pair becomes available again.
                let _ = self.enrollment_repo.delete(enrollment.id).await;
                return Err(e);
            }
        };

        Ok(EnrollmentResult {
            enrollment,
            credentials,
        })
    }

    /// Reuse the student's linked account, or provision one on first
    /// enrollment.
    async fn resolve_credentials(&self, student: &Student) -> Result<CredentialsBlock> {
        if let Some(account_id) = student.user_id {
            return self.existing_credentials(account_id, &student.email).await;
        }

        match self.provisioner.provision(student).await {
            Ok(provisioned) => Ok(CredentialsBlock {
                username: provisioned.account.username,
                email: student.email.clone(),
                account_created: true,
                temporary_password: Some(provisioned.temporary_password),
            }),
            // A concurrent first enrollment may have provisioned the account
            // already; reuse its link. Any other conflict (a username race)
            // leaves the student unlinked and stays terminal for this call.
            Err(AppError::Conflict(message)) => {
                let refreshed = self
                    .student_repo
                    .find_by_id(student.id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
                match refreshed.user_id {
                    Some(account_id) => {
                        self.existing_credentials(account_id, &student.email).await
                    }
                    None => Err(AppError::Conflict(message)),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn existing_credentials(
        &self,
        account_id: Uuid,
        email: &str,
    ) -> Result<CredentialsBlock> {
        let account = self
            .account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("Linked account {} missing", account_id))
            })?;
        Ok(CredentialsBlock {
            username: account.username,
            email: email.to_string(),
            account_created: false,
            temporary_password: None,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Enrollment> {
        self.enrollment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Enrollment {} not found", id)))
    }

    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<Enrollment>, i64)> {
        let offset = (page - 1) * per_page;
        let enrollments = self.enrollment_repo.list(offset, per_page).await?;
        let total = self.enrollment_repo.count().await?;
        Ok((enrollments, total))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.enrollment_repo.delete(id).await
    }

    /// A student's enrollments with course data, ordered by course code
    pub async fn courses_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<crate::domain::EnrollmentWithCourse>> {
        self.enrollment_repo.list_for_student(student_id).await
    }

    /// A course's roster with student data, ordered by last then first name
    pub async fn roster_for_course(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<crate::domain::EnrollmentWithStudent>> {
        self.enrollment_repo.list_for_course(course_id).await
    }
}
