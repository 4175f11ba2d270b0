use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::domain::{AccountId, Role, VoteKind};
use crate::entities::{accounts, movies, prelude::*, votes};

/// Account data returned from repository (without the password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub roles: Vec<Role>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: AccountId::new(model.id),
            roles: decode_roles(&model.roles),
            username: model.username,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Result of checking a password against the stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordCheck {
    UnknownUser,
    Mismatch(Account),
    Match(Account),
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let account = Accounts::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;

        Ok(account.map(Account::from))
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        let rows = Accounts::find()
            .order_by_asc(accounts::Column::Username)
            .all(&self.conn)
            .await
            .context("Failed to list accounts")?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Insert a new account with the given roles.
    ///
    /// Returns `None` when the username is already taken.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        roles: &[Role],
        security: &SecurityConfig,
    ) -> Result<Option<Account>> {
        if self.get_by_username(username).await?.is_some() {
            return Ok(None);
        }

        let password = password.to_string();
        let security = security.clone();
        // Argon2 is CPU-heavy; keep it off the async workers.
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();
        let active = accounts::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            roles: Set(encode_roles(roles)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => {
                info!("Created account: {}", model.username);
                Ok(Some(Account::from(model)))
            }
            // Lost a race with a concurrent registration of the same name.
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(err) => Err(err).context("Failed to insert account"),
        }
    }

    /// Verify password for an account.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<PasswordCheck> {
        let model = Accounts::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account for password verification")?;

        let Some(model) = model else {
            return Ok(PasswordCheck::UnknownUser);
        };

        let password_hash = model.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        let account = Account::from(model);
        Ok(if is_valid {
            PasswordCheck::Match(account)
        } else {
            PasswordCheck::Mismatch(account)
        })
    }

    /// Replace the role list of an account.
    pub async fn set_roles(&self, username: &str, roles: &[Role]) -> Result<Account> {
        let model = Accounts::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account for role update")?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {username}"))?;

        let mut active: accounts::ActiveModel = model.into();
        active.roles = Set(encode_roles(roles));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active.update(&self.conn).await?;

        Ok(Account::from(updated))
    }

    /// Delete an account together with its votes.
    ///
    /// Counters of every movie the account voted on are decremented in the
    /// same transaction so aggregate counts keep matching the vote rows.
    pub async fn remove_with_votes(&self, username: &str) -> Result<bool> {
        let Some(model) = Accounts::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account for removal")?
        else {
            return Ok(false);
        };

        let txn = self.conn.begin().await?;

        // Take the write lock before reading the votes so none can commit
        // between the read and the delete.
        Accounts::update_many()
            .col_expr(
                accounts::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(accounts::Column::Id.eq(model.id))
            .exec(&txn)
            .await?;

        let cast = Votes::find()
            .filter(votes::Column::AccountId.eq(model.id))
            .all(&txn)
            .await
            .context("Failed to load votes for account removal")?;

        Votes::delete_many()
            .filter(votes::Column::AccountId.eq(model.id))
            .exec(&txn)
            .await?;

        for vote in &cast {
            let column = match vote.kind.parse::<VoteKind>() {
                Ok(VoteKind::Like) => movies::Column::Likes,
                Ok(VoteKind::Dislike) => movies::Column::Dislikes,
                Err(e) => {
                    warn!("Skipping counter update for malformed vote row: {e}");
                    continue;
                }
            };

            Movies::update_many()
                .col_expr(column, Expr::col(column).sub(1))
                .filter(movies::Column::Id.eq(vote.movie_id))
                .exec(&txn)
                .await?;
        }

        let result = Accounts::delete_by_id(model.id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(
                "Removed account {} and reverted {} vote(s)",
                username,
                cast.len()
            );
        }
        Ok(removed)
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

fn encode_roles(roles: &[Role]) -> String {
    let labels: Vec<&str> = roles.iter().map(Role::label).collect();
    serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
}

/// Unknown labels are skipped; an empty result falls back to Viewer.
fn decode_roles(raw: &str) -> Vec<Role> {
    let labels: Vec<String> = serde_json::from_str(raw).unwrap_or_default();
    let roles: Vec<Role> = labels.iter().filter_map(|l| l.parse().ok()).collect();
    if roles.is_empty() {
        vec![Role::Viewer]
    } else {
        roles
    }
}
