//! Authentication business logic
//!
//! Wraps credential verification and token issuance. Read-only: accounts
//! are provisioned by the enrollment workflow, never here.

use crate::crypto;
use crate::domain::LoginAccount;
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::{AccountRepository, StudentRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Login request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Refresh request body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// The authenticated principal, mirrored into the token claims
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    /// Linked student, null for non-student accounts
    pub student_id: Option<Uuid>,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: AuthenticatedUser,
}

/// Successful refresh response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

pub struct AuthService<A: AccountRepository, S: StudentRepository> {
    account_repo: Arc<A>,
    student_repo: Arc<S>,
    jwt_manager: JwtManager,
}

impl<A: AccountRepository, S: StudentRepository> AuthService<A, S> {
    pub fn new(account_repo: Arc<A>, student_repo: Arc<S>, jwt_manager: JwtManager) -> Self {
        Self {
            account_repo,
            student_repo,
            jwt_manager,
        }
    }

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// Unknown usernames and wrong passwords report the same message.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        request.validate()?;

        let account = self
            .account_repo
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        if !crypto::verify_password(&request.password, &account.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let (roles, student_id) = self.account_context(&account).await?;
        let access = self
            .jwt_manager
            .create_access_token(&account, &roles, student_id)?;
        let refresh = self.jwt_manager.create_refresh_token(account.id)?;

        Ok(LoginResponse {
            access,
            refresh,
            user: AuthenticatedUser {
                id: account.id,
                username: account.username,
                email: account.email,
                first_name: account.first_name,
                last_name: account.last_name,
                roles,
                student_id,
            },
        })
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh(&self, request: RefreshRequest) -> Result<RefreshResponse> {
        let claims = self.jwt_manager.verify_refresh_token(&request.refresh)?;
        let account_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        let account = self
            .account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        let (roles, student_id) = self.account_context(&account).await?;
        let access = self
            .jwt_manager
            .create_access_token(&account, &roles, student_id)?;

        Ok(RefreshResponse { access })
    }

    async fn account_context(
        &self,
        account: &LoginAccount,
    ) -> Result<(Vec<String>, Option<Uuid>)> {
        let roles = self.account_repo.role_names(account.id).await?;
        let student = self.student_repo.find_by_user_id(account.id).await?;
        Ok((roles, student.map(|s| s.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::domain::Student;
    use crate::repository::account::MockAccountRepository;
    use crate::repository::student::MockStudentRepository;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn jwt_manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret: "test-secret-key-for-unit-tests".to_string(),
            issuer: "matricula-core".to_string(),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 604800,
        })
    }

    fn account_with_password(password: &str) -> LoginAccount {
        LoginAccount {
            id: Uuid::new_v4(),
            username: "ana.gomez".to_string(),
            password_hash: crypto::hash_password(password).unwrap(),
            first_name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            email: "ana@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_embeds_student_claims() {
        let account = account_with_password("1234-5678");
        let account_id = account.id;
        let student_id = Uuid::new_v4();

        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(account.clone())));
        account_repo
            .expect_role_names()
            .returning(|_| Ok(vec!["alumno".to_string()]));
        let mut student_repo = MockStudentRepository::new();
        student_repo.expect_find_by_user_id().returning(move |_| {
            Ok(Some(Student {
                id: student_id,
                user_id: Some(account_id),
                ..Default::default()
            }))
        });

        let manager = jwt_manager();
        let service = AuthService::new(Arc::new(account_repo), Arc::new(student_repo), manager.clone());
        let response = service
            .login(login_request("ana.gomez", "1234-5678"))
            .await
            .unwrap();

        assert_eq!(response.user.username, "ana.gomez");
        assert_eq!(response.user.roles, vec!["alumno".to_string()]);
        assert_eq!(response.user.student_id, Some(student_id));

        let claims = manager.verify_access_token(&response.access).unwrap();
        assert_eq!(claims.student_id, Some(student_id.to_string()));
        assert_eq!(claims.roles, vec!["alumno".to_string()]);
    }

    #[tokio::test]
    async fn test_login_without_student_link() {
        let account = account_with_password("pw");
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(account.clone())));
        account_repo.expect_role_names().returning(|_| Ok(vec![]));
        let mut student_repo = MockStudentRepository::new();
        student_repo
            .expect_find_by_user_id()
            .returning(|_| Ok(None));

        let service =
            AuthService::new(Arc::new(account_repo), Arc::new(student_repo), jwt_manager());
        let response = service.login(login_request("ana.gomez", "pw")).await.unwrap();

        assert_eq!(response.user.student_id, None);
    }

    #[tokio::test]
    async fn test_login_unknown_username_is_unauthorized() {
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let service = AuthService::new(
            Arc::new(account_repo),
            Arc::new(MockStudentRepository::new()),
            jwt_manager(),
        );
        let result = service.login(login_request("nobody", "pw")).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let account = account_with_password("right-password");
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(account.clone())));

        let service = AuthService::new(
            Arc::new(account_repo),
            Arc::new(MockStudentRepository::new()),
            jwt_manager(),
        );
        let result = service.login(login_request("ana.gomez", "wrong")).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_access_token() {
        let account = account_with_password("pw");
        let account_id = account.id;
        let manager = jwt_manager();
        let refresh_token = manager.create_refresh_token(account_id).unwrap();

        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(account.clone())));
        account_repo
            .expect_role_names()
            .returning(|_| Ok(vec!["alumno".to_string()]));
        let mut student_repo = MockStudentRepository::new();
        student_repo
            .expect_find_by_user_id()
            .returning(|_| Ok(None));

        let service =
            AuthService::new(Arc::new(account_repo), Arc::new(student_repo), manager.clone());
        let response = service
            .refresh(RefreshRequest {
                refresh: refresh_token,
            })
            .await
            .unwrap();

        let claims = manager.verify_access_token(&response.access).unwrap();
        assert_eq!(claims.sub, account_id.to_string());
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let account = account_with_password("pw");
        let manager = jwt_manager();
        let access = manager.create_access_token(&account, &[], None).unwrap();

        let service = AuthService::new(
            Arc::new(MockAccountRepository::new()),
            Arc::new(MockStudentRepository::new()),
            manager,
        );
        let result = service.refresh(RefreshRequest { refresh: access }).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
