//! Login account domain model
//!
//! The login account is the authentication identity, distinct from the
//! academic Student record. Accounts are provisioned by the enrollment
//! workflow, not created through a public endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Role granted to every provisioned student account
pub const DEFAULT_STUDENT_ROLE: &str = "alumno";

/// Login account entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoginAccount {
    pub id: Uuid,
    pub username: String,
    /// Argon2 hash; never serialized into responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Role entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for provisioning a login account
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Student to link; the link is guarded so it is set at most once
    pub student_id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Role name, inserted behind its uniqueness constraint if absent
    pub role: String,
}
