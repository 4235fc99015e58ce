//! Course domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Default seat capacity for new courses
pub const DEFAULT_CAPACITY: i32 = 30;

/// Course entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    /// Informational only; not enforced against the enrollment count
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Course {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            code: String::new(),
            title: String::new(),
            capacity: DEFAULT_CAPACITY,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new course
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseInput {
    #[validate(length(min = 1, max = 10))]
    pub code: String,
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(range(min = 0))]
    #[serde(default = "default_capacity")]
    pub capacity: i32,
}

fn default_capacity() -> i32 {
    DEFAULT_CAPACITY
}

/// Input for updating a course
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseInput {
    #[validate(length(min = 1, max = 10))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub title: Option<String>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
}

/// Search/ordering filter for course listings
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Case-insensitive substring over code and title
    pub search: Option<String>,
    pub ordering: Option<String>,
}
