//! Domain models for the enrollment service

pub mod account;
pub mod course;
pub mod enrollment;
pub mod student;

pub use account::{CreateAccountInput, LoginAccount, Role, DEFAULT_STUDENT_ROLE};
pub use course::{Course, CourseFilter, CreateCourseInput, UpdateCourseInput};
pub use enrollment::{
    CredentialsBlock, Enrollment, EnrollmentResult, EnrollmentWithCourse, EnrollmentWithStudent,
    RegisterEnrollmentRequest,
};
pub use student::{CreateStudentInput, Student, StudentFilter, UpdateStudentInput};
