//! Report context assembly
//!
//! Resolves the subject record, gathers its enrollment set in a
//! deterministic order, stamps a generation time, and hands the context to
//! the renderer. Filenames reuse the handle normalization so they stay
//! header-safe for any name.

use crate::error::{AppError, Result};
use crate::report::{CourseReportContext, ReportRenderer, StudentReportContext};
use crate::repository::{CourseRepository, EnrollmentRepository, StudentRepository};
use crate::username::ascii_slug;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// A rendered report plus its suggested filename
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct ReportService<
    E: EnrollmentRepository,
    S: StudentRepository,
    C: CourseRepository,
    R: ReportRenderer,
> {
    enrollment_repo: Arc<E>,
    student_repo: Arc<S>,
    course_repo: Arc<C>,
    renderer: Arc<R>,
}

impl<E, S, C, R> ReportService<E, S, C, R>
where
    E: EnrollmentRepository,
    S: StudentRepository,
    C: CourseRepository,
    R: ReportRenderer,
{
    pub fn new(
        enrollment_repo: Arc<E>,
        student_repo: Arc<S>,
        course_repo: Arc<C>,
        renderer: Arc<R>,
    ) -> Self {
        Self {
            enrollment_repo,
            student_repo,
            course_repo,
            renderer,
        }
    }

    /// Render a student's enrollment report, ordered by course code
    pub async fn student_courses_report(&self, student_id: Uuid) -> Result<RenderedReport> {
        let student = self
            .student_repo
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", student_id)))?;

        let enrollments = self.enrollment_repo.list_for_student(student_id).await?;

        let filename = format!(
            "alumno_{}_{}_cursos.pdf",
            ascii_slug(&student.last_name),
            ascii_slug(&student.first_name)
        );

        let ctx = StudentReportContext {
            student,
            enrollments,
            generated_at: generation_timestamp(),
        };
        let bytes = self.renderer.render_student_courses(&ctx)?;

        Ok(RenderedReport { filename, bytes })
    }

    /// Render a course roster report, ordered by student last then first name
    pub async fn course_roster_report(&self, course_id: Uuid) -> Result<RenderedReport> {
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", course_id)))?;

        let roster = self.enrollment_repo.list_for_course(course_id).await?;

        let filename = format!("curso_{}_alumnos.pdf", ascii_slug(&course.code));

        let ctx = CourseReportContext {
            course,
            roster,
            generated_at: generation_timestamp(),
        };
        let bytes = self.renderer.render_course_roster(&ctx)?;

        Ok(RenderedReport { filename, bytes })
    }
}

fn generation_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M").to_string()
}
