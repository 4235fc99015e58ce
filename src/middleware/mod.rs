//! HTTP middleware
//!
//! Provides the JWT `AuthUser` extractor for handlers that need the
//! authenticated principal.

pub mod auth;

pub use auth::AuthUser;
