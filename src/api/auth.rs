//! Authentication API handlers

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::server::AppState;
use crate::service::auth::{LoginRequest, RefreshRequest};
use axum::{extract::State, response::IntoResponse, Json};

/// Verify credentials and issue a token pair
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new access token
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse> {
    let response = state.auth_service.refresh(request).await?;
    Ok(Json(response))
}

/// Return the authenticated principal from the bearer token
pub async fn me(auth: AuthUser) -> impl IntoResponse {
    Json(auth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{"username": "ana.gomez", "password": "1234-5678"}"#;
        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "ana.gomez");
        assert_eq!(request.password, "1234-5678");
    }

    #[test]
    fn test_login_request_missing_password_rejected() {
        let json = r#"{"username": "ana.gomez"}"#;
        let result: serde_json::Result<LoginRequest> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_refresh_request_deserialization() {
        let json = r#"{"refresh": "some.jwt.token"}"#;
        let request: RefreshRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.refresh, "some.jwt.token");
    }
}
