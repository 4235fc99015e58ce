//! JWT authentication extractor
//!
//! Provides the `AuthUser` extractor for handlers requiring an
//! authenticated account.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::jwt::AccessClaims;
use crate::server::AppState;

/// Authenticated account information extracted from the bearer token
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    /// Account ID from the token's `sub` claim
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    /// Linked student, absent for non-student accounts
    pub student_id: Option<Uuid>,
}

impl AuthUser {
    /// Build an AuthUser from verified access token claims
    fn from_claims(claims: AccessClaims) -> Result<Self, AuthError> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("Invalid account ID in token".to_string()))?;
        let student_id = match claims.student_id {
            Some(raw) => Some(
                Uuid::parse_str(&raw).map_err(|_| {
                    AuthError::InvalidToken("Invalid student ID in token".to_string())
                })?,
            ),
            None => None,
        };

        Ok(Self {
            user_id,
            username: claims.username,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            roles: claims.roles,
            student_id,
        })
    }

    /// Check if the account holds a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader(String),
    /// Token validation failed
    InvalidToken(String),
    /// Token has expired
    TokenExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidHeader(_) => {
                (StatusCode::UNAUTHORIZED, "Invalid authorization header")
            }
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token has expired"),
        };

        let body = serde_json::json!({
            "error": "unauthorized",
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Extract and validate the Bearer token from the Authorization header
fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Invalid header encoding".to_string()))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AuthError::InvalidHeader(
            "Authorization header must use Bearer scheme".to_string(),
        ));
    }

    Ok(&auth_header[7..])
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let claims = state.jwt_manager.verify_access_token(token).map_err(|e| {
            match &e {
                AppError::Jwt(err)
                    if matches!(
                        err.kind(),
                        jsonwebtoken::errors::ErrorKind::ExpiredSignature
                    ) =>
                {
                    AuthError::TokenExpired
                }
                _ => AuthError::InvalidToken("Token verification failed".to_string()),
            }
        })?;

        AuthUser::from_claims(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    fn claims(student_id: Option<String>) -> AccessClaims {
        AccessClaims {
            sub: Uuid::new_v4().to_string(),
            username: "ana.gomez".to_string(),
            email: "ana@example.com".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            roles: vec!["alumno".to_string()],
            student_id,
            iss: "matricula-core".to_string(),
            token_type: "access".to_string(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwdw==".parse().unwrap());
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_from_claims_with_student_link() {
        let student_id = Uuid::new_v4();
        let user = AuthUser::from_claims(claims(Some(student_id.to_string()))).unwrap();
        assert_eq!(user.student_id, Some(student_id));
        assert!(user.has_role("alumno"));
        assert!(!user.has_role("staff"));
    }

    #[test]
    fn test_from_claims_rejects_bad_subject() {
        let mut bad = claims(None);
        bad.sub = "not-a-uuid".to_string();
        assert!(matches!(
            AuthUser::from_claims(bad),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
