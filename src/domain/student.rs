//! Student domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Identification numbers double as the initial account password, so the
// charset is locked down to digits, dots, and hyphens.
lazy_static::lazy_static! {
    pub static ref ID_NUMBER_REGEX: regex::Regex =
        regex::Regex::new(r"^[0-9.\-]+$").unwrap();
}

/// Student entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    /// Linked login account; set on first enrollment, at most once
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub id_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Student {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            id_number: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new student
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentInput {
    #[validate(length(min = 1, max = 80))]
    pub first_name: String,
    #[validate(length(min = 1, max = 80))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 4, max = 20), custom(function = "validate_id_number"))]
    pub id_number: String,
}

/// Input for updating a student
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentInput {
    #[validate(length(min = 1, max = 80))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 4, max = 20), custom(function = "validate_id_number"))]
    pub id_number: Option<String>,
}

fn validate_id_number(value: &str) -> Result<(), ValidationError> {
    if ID_NUMBER_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("id_number_charset");
        error.message = Some("id number may only contain digits, dots, or hyphens".into());
        Err(error)
    }
}

/// Search/ordering filter for student listings
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    /// Case-insensitive substring over name, email, and id number
    pub search: Option<String>,
    pub ordering: Option<String>,
}
