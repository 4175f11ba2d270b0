//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{Account, PasswordCheck, Store};
use crate::domain::{AuthSession, Role};
use crate::services::attempts::{AttemptOutcome, LoginAttempts};
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::credentials;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    attempts: LoginAttempts,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        let attempts = LoginAttempts::new(security.max_login_attempts);
        Self {
            store,
            security,
            attempts,
        }
    }

    fn check_new_credentials(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                crate::constants::messages::CREDENTIALS_REQUIRED.to_string(),
            ));
        }

        if self.security.enforce_credential_policy {
            credentials::validate_username(username).map_err(AuthError::Validation)?;
            credentials::validate_password(username, password).map_err(AuthError::Validation)?;
        }

        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let username = username.trim();
        self.check_new_credentials(username, password)?;

        let account = self
            .store
            .create_account(username, password, &[Role::Viewer], &self.security)
            .await?
            .ok_or_else(|| AuthError::DuplicateAccount(username.to_string()))?;

        Ok(account)
    }

    async fn login(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                crate::constants::messages::CREDENTIALS_REQUIRED.to_string(),
            ));
        }

        match self.store.verify_password(username, password).await? {
            PasswordCheck::UnknownUser => Err(AuthError::InvalidUsername),
            PasswordCheck::Match(account) => {
                self.attempts.reset(username);
                info!(username = %account.username, "Login successful");
                Ok(account)
            }
            PasswordCheck::Mismatch(_) => match self.attempts.record_failure(username) {
                AttemptOutcome::Remaining(remaining) => {
                    info!(%username, %remaining, "Incorrect password");
                    Err(AuthError::InvalidPassword { remaining })
                }
                AttemptOutcome::Exhausted => {
                    self.store.remove_account(username).await?;
                    self.attempts.reset(username);
                    warn!(%username, "Login attempts exhausted, account removed");
                    Err(AuthError::AccountLockedAndRemoved {
                        username: username.to_string(),
                        attempts: self.attempts.max_attempts(),
                    })
                }
            },
        }
    }

    fn open_session(&self, account: &Account) -> AuthSession {
        AuthSession::start(
            account.id,
            account.username.clone(),
            account.roles.clone(),
            Utc::now(),
            Duration::hours(i64::from(self.security.session_ttl_hours)),
        )
    }

    async fn account(&self, username: &str) -> Result<Account, AuthError> {
        self.store
            .get_account(username)
            .await?
            .ok_or_else(|| AuthError::AccountNotFound(username.to_string()))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AuthError> {
        Ok(self.store.list_accounts().await?)
    }

    async fn grant_role(&self, username: &str, role: Role) -> Result<Account, AuthError> {
        let account = self.account(username).await?;
        if account.roles.contains(&role) {
            return Ok(account);
        }

        let mut roles = account.roles;
        roles.push(role);
        let updated = self.store.set_account_roles(username, &roles).await?;
        info!(%username, %role, "Role granted");
        Ok(updated)
    }

    async fn revoke_role(&self, username: &str, role: Role) -> Result<Account, AuthError> {
        let account = self.account(username).await?;
        if !account.roles.contains(&role) {
            return Err(AuthError::RoleNotGranted(role));
        }
        if account.roles.len() == 1 {
            return Err(AuthError::LastRole);
        }

        let roles: Vec<Role> = account.roles.into_iter().filter(|r| *r != role).collect();
        let updated = self.store.set_account_roles(username, &roles).await?;
        info!(%username, %role, "Role revoked");
        Ok(updated)
    }

    fn remaining_attempts(&self, username: &str) -> u32 {
        self.attempts.remaining(username.trim())
    }
}
