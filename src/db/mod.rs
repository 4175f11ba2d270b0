use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{AccountId, MovieId, Role, VoteKind, VoteRelation, VoteTransition};
use crate::models::movie::{Movie, MovieUpdate, NewMovie};

pub mod migrator;
pub mod repositories;

pub use repositories::account::{Account, PasswordCheck};
pub use repositories::vote::VoteTally;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");
        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `:memory:` would see its own empty database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);
        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn vote_repo(&self) -> repositories::vote::VoteRepository {
        repositories::vote::VoteRepository::new(self.conn.clone())
    }

    // Accounts

    pub async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        self.account_repo().get_by_username(username).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.account_repo().list().await
    }

    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        roles: &[Role],
        security: &SecurityConfig,
    ) -> Result<Option<Account>> {
        self.account_repo()
            .create(username, password, roles, security)
            .await
    }

    pub async fn verify_password(&self, username: &str, password: &str) -> Result<PasswordCheck> {
        self.account_repo().verify_password(username, password).await
    }

    pub async fn set_account_roles(&self, username: &str, roles: &[Role]) -> Result<Account> {
        self.account_repo().set_roles(username, roles).await
    }

    pub async fn remove_account(&self, username: &str) -> Result<bool> {
        self.account_repo().remove_with_votes(username).await
    }

    // Movies

    pub async fn add_movie(&self, movie: &NewMovie) -> Result<Movie> {
        self.movie_repo().add(movie).await
    }

    pub async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list_all().await
    }

    pub async fn update_movie(&self, id: MovieId, update: MovieUpdate) -> Result<Option<Movie>> {
        self.movie_repo().update(id, update).await
    }

    pub async fn set_movie_comment(&self, id: MovieId, comment: &str) -> Result<Option<Movie>> {
        self.movie_repo().set_comment(id, comment).await
    }

    pub async fn remove_movie(&self, id: MovieId) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    pub async fn movies_voted_by(&self, account: AccountId, kind: VoteKind) -> Result<Vec<Movie>> {
        self.movie_repo().voted_by(account, kind).await
    }

    // Votes

    pub async fn vote_relation(&self, account: AccountId, movie: MovieId) -> Result<VoteRelation> {
        self.vote_repo().relation(account, movie).await
    }

    pub async fn apply_vote_transition(
        &self,
        account: AccountId,
        movie: MovieId,
        transition: VoteTransition,
    ) -> Result<bool> {
        self.vote_repo().apply(account, movie, transition).await
    }

    pub async fn tally_votes(&self, movie: MovieId) -> Result<VoteTally> {
        self.vote_repo().tally(movie).await
    }
}
