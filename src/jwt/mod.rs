//! JWT token handling

use crate::config::JwtConfig;
use crate::domain::LoginAccount;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Access token claims (issued after credential verification)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (account ID)
    pub sub: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Role names granted to the account
    pub roles: Vec<String>,
    /// Linked student, absent for non-student accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Issuer
    pub iss: String,
    /// Token type discriminator (prevents token confusion)
    #[serde(default)]
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Refresh token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iss: String,
    #[serde(default)]
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a Validation with a strict leeway (5 seconds) instead of the
    /// default 60 seconds, so tokens expire promptly while tolerating minor
    /// clock skew.
    fn strict_validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;
        validation.set_issuer(&[&self.config.issuer]);
        validation
    }

    /// Create an access token for an authenticated account
    pub fn create_access_token(
        &self,
        account: &LoginAccount,
        roles: &[String],
        student_id: Option<Uuid>,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            roles: roles.to_vec(),
            student_id: student_id.map(|id| id.to_string()),
            iss: self.config.issuer.clone(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.access_token_ttl_secs)).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Create a refresh token for an account
    pub fn create_refresh_token(&self, account_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: account_id.to_string(),
            iss: self.config.issuer.clone(),
            token_type: TOKEN_TYPE_REFRESH.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.refresh_token_ttl_secs)).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify an access token and return its claims
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.strict_validation())?;
        if data.claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AppError::Unauthorized("Not an access token".to_string()));
        }
        Ok(data.claims)
    }

    /// Verify a refresh token and return its claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        let data = decode::<RefreshClaims>(token, &self.decoding_key, &self.strict_validation())?;
        if data.claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(AppError::Unauthorized("Not a refresh token".to_string()));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-unit-tests".to_string(),
            issuer: "matricula-core".to_string(),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 604800,
        }
    }

    fn test_account() -> LoginAccount {
        LoginAccount {
            id: Uuid::new_v4(),
            username: "ana.gomez".to_string(),
            password_hash: String::new(),
            first_name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            email: "ana@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let manager = JwtManager::new(test_config());
        let account = test_account();
        let student_id = Uuid::new_v4();

        let token = manager
            .create_access_token(&account, &["alumno".to_string()], Some(student_id))
            .unwrap();
        let claims = manager.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, account.id.to_string());
        assert_eq!(claims.username, "ana.gomez");
        assert_eq!(claims.roles, vec!["alumno".to_string()]);
        assert_eq!(claims.student_id, Some(student_id.to_string()));
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_access_token_without_student_link() {
        let manager = JwtManager::new(test_config());
        let token = manager
            .create_access_token(&test_account(), &[], None)
            .unwrap();
        let claims = manager.verify_access_token(&token).unwrap();
        assert!(claims.student_id.is_none());
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let manager = JwtManager::new(test_config());
        let account_id = Uuid::new_v4();
        let token = manager.create_refresh_token(account_id).unwrap();
        let claims = manager.verify_refresh_token(&token).unwrap();
        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.token_type, "refresh");
    }

    #[test]
    fn test_refresh_token_rejected_as_access_token() {
        let manager = JwtManager::new(test_config());
        let token = manager.create_refresh_token(Uuid::new_v4()).unwrap();
        // The refresh claims are missing access-only fields, so decoding
        // already fails before the token_type check.
        assert!(manager.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_access_token_rejected_as_refresh_token() {
        let manager = JwtManager::new(test_config());
        let token = manager
            .create_access_token(&test_account(), &[], None)
            .unwrap();
        let result = manager.verify_refresh_token(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = test_config();
        config.access_token_ttl_secs = -60;
        let manager = JwtManager::new(config);
        let token = manager
            .create_access_token(&test_account(), &[], None)
            .unwrap();
        assert!(manager.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = JwtManager::new(test_config());
        let token = manager
            .create_access_token(&test_account(), &[], None)
            .unwrap();

        let mut other_config = test_config();
        other_config.secret = "a-completely-different-secret".to_string();
        let other = JwtManager::new(other_config);
        assert!(other.verify_access_token(&token).is_err());
    }
}
