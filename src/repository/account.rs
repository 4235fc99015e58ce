//! Login account repository

use crate::domain::{CreateAccountInput, LoginAccount};
use crate::error::{AppError, Result};
use crate::repository::map_unique_violation;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str =
    "id, username, password_hash, first_name, last_name, email, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Probe used by the unique-username search
    async fn username_exists(&self, username: &str) -> Result<bool>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LoginAccount>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<LoginAccount>>;
    /// Role names granted to an account
    async fn role_names(&self, account_id: Uuid) -> Result<Vec<String>>;
    /// Provision an account and link it to its student, atomically
    async fn create(&self, input: &CreateAccountInput) -> Result<LoginAccount>;
}

pub struct AccountRepositoryImpl {
    pool: PgPool,
}

impl AccountRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for AccountRepositoryImpl {
    async fn username_exists(&self, username: &str) -> Result<bool> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(row.0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LoginAccount>> {
        let account = sqlx::query_as::<_, LoginAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<LoginAccount>> {
        let account = sqlx::query_as::<_, LoginAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn role_names(&self, account_id: Uuid) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT r.name
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn create(&self, input: &CreateAccountInput) -> Result<LoginAccount> {
        let mut tx = self.pool.begin().await?;
        let user_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, first_name, last_name, email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            "#,
        )
        .bind(user_id)
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Username is already taken"))?;

        // Get-or-create the role as a conditional insert behind the unique
        // name constraint; no in-process role state.
        sqlx::query("INSERT INTO roles (id, name, created_at) VALUES ($1, $2, now()) ON CONFLICT (name) DO NOTHING")
            .bind(Uuid::new_v4())
            .bind(&input.role)
            .execute(&mut *tx)
            .await?;

        let (role_id,): (Uuid,) = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
            .bind(&input.role)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        // The student link is set at most once; losing a concurrent
        // first-enrollment race rolls the whole account back.
        let linked = sqlx::query(
            "UPDATE students SET user_id = $1, updated_at = now() WHERE id = $2 AND user_id IS NULL",
        )
        .bind(user_id)
        .bind(input.student_id)
        .execute(&mut *tx)
        .await?;

        if linked.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::Conflict(
                "Student already has a linked account".to_string(),
            ));
        }

        tx.commit().await?;

        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create account")))
    }
}
