//! Common test utilities
//!
//! Integration tests run against a live PostgreSQL database named by
//! `TEST_DATABASE_URL` (falling back to `DATABASE_URL`). When neither is
//! set or the database is unreachable, tests skip instead of failing so
//! the unit suite stays runnable without infrastructure.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Once;
use tokio::sync::{Mutex, MutexGuard};

static ENV_INIT: Once = Once::new();

// Tests in one binary run on parallel threads but share the database;
// serialize them around this lock.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Take the database lock for the duration of a test
pub async fn db_guard() -> MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

fn init_env() {
    ENV_INIT.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

/// Connect to the test database, if one is configured and reachable
pub async fn get_test_pool() -> Result<PgPool, String> {
    init_env();

    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| "TEST_DATABASE_URL/DATABASE_URL not set".to_string())?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .map_err(|e| format!("could not connect: {e}"))
}

/// Apply migrations to the test database
pub async fn setup_database(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Wipe all rows between tests
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE enrollments, user_roles, students, courses, users, roles CASCADE")
        .execute(pool)
        .await?;
    Ok(())
}
