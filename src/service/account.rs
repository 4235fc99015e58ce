//! Account provisioning
//!
//! Creates a login account for a student on first enrollment: derives the
//! base handle, resolves a globally unique username, and persists the
//! account with its default role and student link in one transaction.

use crate::crypto;
use crate::domain::{CreateAccountInput, LoginAccount, Student, DEFAULT_STUDENT_ROLE};
use crate::error::Result;
use crate::repository::AccountRepository;
use crate::username::{base_handle, first_token};
use std::sync::Arc;

/// A freshly provisioned account together with its one-time credential
#[derive(Debug, Clone)]
pub struct ProvisionedAccount {
    pub account: LoginAccount,
    /// The student's raw id number; surfaced exactly once, at creation time
    pub temporary_password: String,
}

pub struct AccountProvisioner<A: AccountRepository> {
    repo: Arc<A>,
}

impl<A: AccountRepository> AccountProvisioner<A> {
    pub fn new(repo: Arc<A>) -> Self {
        Self { repo }
    }

    /// Find the first free username: the base handle itself, or `base1`,
    /// `base2`, ... probing the candidate on every iteration.
    ///
    /// No iteration cap: the store enforces username uniqueness, so some
    /// suffix is always free and the probe terminates.
    pub async fn unique_username(&self, base: &str) -> Result<String> {
        if !self.repo.username_exists(base).await? {
            return Ok(base.to_string());
        }
        let mut i: u32 = 1;
        loop {
            let candidate = format!("{base}{i}");
            if !self.repo.username_exists(&candidate).await? {
                return Ok(candidate);
            }
            i += 1;
        }
    }

    /// Provision a login account for a student without one.
    ///
    /// The initial password is the student's raw identification number; only
    /// its hash is persisted, and the raw value is returned to the caller
    /// exactly once.
    pub async fn provision(&self, student: &Student) -> Result<ProvisionedAccount> {
        let base = base_handle(&student.first_name, &student.last_name);
        let username = self.unique_username(&base).await?;

        let temporary_password = student.id_number.clone();
        let password_hash = crypto::hash_password(&temporary_password)?;

        let input = CreateAccountInput {
            student_id: student.id,
            username,
            password_hash,
            first_name: first_token(&student.first_name).to_string(),
            last_name: first_token(&student.last_name).to_string(),
            email: student.email.clone(),
            role: DEFAULT_STUDENT_ROLE.to_string(),
        };

        let account = self.repo.create(&input).await?;

        Ok(ProvisionedAccount {
            account,
            temporary_password,
        })
    }
}
