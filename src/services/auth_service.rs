//! Domain service for account creation, login and role administration.
//!
//! Session bookkeeping itself lives in [`crate::domain::AuthSession`]; this
//! service decides who may open one.

use thiserror::Error;

use crate::db::Account;
use crate::domain::{AuthSession, Role};
use crate::services::attempts::AttemptsLeft;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Username is not valid.")]
    InvalidUsername,

    #[error("Incorrect password.\nYou have {remaining} remaining.")]
    InvalidPassword { remaining: AttemptsLeft },

    /// The final failed attempt deleted the account.
    #[error("You have used all {attempts} attempts.\nAccount with username {username} has been removed.")]
    AccountLockedAndRemoved { username: String, attempts: u32 },

    #[error("Account with username {0} already exists.")]
    DuplicateAccount(String),

    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Role {0} is not granted to this account")]
    RoleNotGranted(Role),

    #[error("Cannot remove the last role of an account")]
    LastRole,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account with the default `["Viewer"]` role set.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] for empty or policy-violating credentials
    /// - [`AuthError::DuplicateAccount`] if the username is taken
    async fn register(&self, username: &str, password: &str) -> Result<Account, AuthError>;

    /// Verifies credentials, enforcing the lockout policy.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidUsername`] when no such account exists (counter untouched)
    /// - [`AuthError::InvalidPassword`] with the attempts left
    /// - [`AuthError::AccountLockedAndRemoved`] once the last attempt is used;
    ///   the account has been deleted at that point
    async fn login(&self, username: &str, password: &str) -> Result<Account, AuthError>;

    /// Builds a fresh session for an authenticated account.
    fn open_session(&self, account: &Account) -> AuthSession;

    /// Looks up an account by username.
    async fn account(&self, username: &str) -> Result<Account, AuthError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, AuthError>;

    /// Adds a role to an account (no-op if already held).
    async fn grant_role(&self, username: &str, role: Role) -> Result<Account, AuthError>;

    /// Removes a role from an account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::LastRole`] if it is the only role left.
    async fn revoke_role(&self, username: &str, role: Role) -> Result<Account, AuthError>;

    /// Attempts left before the account is removed.
    fn remaining_attempts(&self, username: &str) -> u32;
}
