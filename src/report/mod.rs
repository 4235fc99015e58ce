//! Report rendering
//!
//! The service layer builds report contexts and hands them to a
//! `ReportRenderer`; the PDF implementation lives behind the trait so the
//! context-building logic tests against a mock.

use crate::config::ReportConfig;
use crate::domain::{Course, EnrollmentWithCourse, EnrollmentWithStudent, Student};
use crate::error::{AppError, Result};
use anyhow::Context as _;
use genpdf::{elements, style, Document, Element, SimplePageDecorator};

/// Context for a student's course report
#[derive(Debug, Clone)]
pub struct StudentReportContext {
    pub student: Student,
    pub enrollments: Vec<EnrollmentWithCourse>,
    pub generated_at: String,
}

/// Context for a course roster report
#[derive(Debug, Clone)]
pub struct CourseReportContext {
    pub course: Course,
    pub roster: Vec<EnrollmentWithStudent>,
    pub generated_at: String,
}

/// Renders report contexts into a document byte stream
#[cfg_attr(test, mockall::automock)]
pub trait ReportRenderer: Send + Sync {
    fn render_student_courses(&self, ctx: &StudentReportContext) -> Result<Vec<u8>>;
    fn render_course_roster(&self, ctx: &CourseReportContext) -> Result<Vec<u8>>;
}

/// PDF renderer backed by genpdf
///
/// Fonts are loaded once at startup; the directory must hold
/// `<family>-Regular.ttf`, `-Bold.ttf`, `-Italic.ttf`, and `-BoldItalic.ttf`.
pub struct PdfRenderer {
    fonts: genpdf::fonts::FontFamily<genpdf::fonts::FontData>,
}

impl PdfRenderer {
    pub fn new(config: &ReportConfig) -> anyhow::Result<Self> {
        let fonts = genpdf::fonts::from_files(&config.font_dir, &config.font_family, None)
            .with_context(|| {
                format!(
                    "Failed to load report fonts '{}' from {}",
                    config.font_family, config.font_dir
                )
            })?;
        Ok(Self { fonts })
    }

    fn new_document(&self, title: &str) -> Document {
        let mut doc = Document::new(self.fonts.clone());
        doc.set_title(title);
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);
        doc
    }

    fn finish(doc: Document) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        doc.render(&mut out)
            .map_err(|e| AppError::Render(e.to_string()))?;
        Ok(out)
    }
}

fn heading(text: impl Into<String>) -> impl Element {
    elements::Paragraph::new(text.into()).styled(style::Style::new().bold().with_font_size(16))
}

fn header_cell(text: &str) -> impl Element {
    elements::Paragraph::new(text)
        .styled(style::Effect::Bold)
        .padded(1)
}

fn cell(text: impl Into<String>) -> impl Element {
    elements::Paragraph::new(text.into()).padded(1)
}

impl ReportRenderer for PdfRenderer {
    fn render_student_courses(&self, ctx: &StudentReportContext) -> Result<Vec<u8>> {
        let mut doc = self.new_document("Course enrollments");

        doc.push(heading(format!(
            "Enrollments of {}, {}",
            ctx.student.last_name, ctx.student.first_name
        )));
        doc.push(cell(format!(
            "Email: {}  Id number: {}",
            ctx.student.email, ctx.student.id_number
        )));
        doc.push(cell(format!("Generated at: {}", ctx.generated_at)));
        doc.push(elements::Break::new(1));

        if ctx.enrollments.is_empty() {
            doc.push(cell("No enrollments."));
            return Self::finish(doc);
        }

        let mut table = elements::TableLayout::new(vec![2, 5, 3]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
        table
            .row()
            .element(header_cell("Code"))
            .element(header_cell("Title"))
            .element(header_cell("Enrolled at"))
            .push()
            .map_err(|e| AppError::Render(e.to_string()))?;

        for enrollment in &ctx.enrollments {
            table
                .row()
                .element(cell(enrollment.code.clone()))
                .element(cell(enrollment.title.clone()))
                .element(cell(
                    enrollment.enrolled_at.format("%Y-%m-%d %H:%M").to_string(),
                ))
                .push()
                .map_err(|e| AppError::Render(e.to_string()))?;
        }
        doc.push(table);

        Self::finish(doc)
    }

    fn render_course_roster(&self, ctx: &CourseReportContext) -> Result<Vec<u8>> {
        let mut doc = self.new_document("Course roster");

        doc.push(heading(format!(
            "Roster of {} - {}",
            ctx.course.code, ctx.course.title
        )));
        doc.push(cell(format!("Capacity: {}", ctx.course.capacity)));
        doc.push(cell(format!("Generated at: {}", ctx.generated_at)));
        doc.push(elements::Break::new(1));

        if ctx.roster.is_empty() {
            doc.push(cell("No students enrolled."));
            return Self::finish(doc);
        }

        let mut table = elements::TableLayout::new(vec![3, 3, 4, 3, 3]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
        table
            .row()
            .element(header_cell("Last name"))
            .element(header_cell("First name"))
            .element(header_cell("Email"))
            .element(header_cell("Id number"))
            .element(header_cell("Enrolled at"))
            .push()
            .map_err(|e| AppError::Render(e.to_string()))?;

        for entry in &ctx.roster {
            table
                .row()
                .element(cell(entry.last_name.clone()))
                .element(cell(entry.first_name.clone()))
                .element(cell(entry.email.clone()))
                .element(cell(entry.id_number.clone()))
                .element(cell(entry.enrolled_at.format("%Y-%m-%d %H:%M").to_string()))
                .push()
                .map_err(|e| AppError::Render(e.to_string()))?;
        }
        doc.push(table);

        Self::finish(doc)
    }
}
