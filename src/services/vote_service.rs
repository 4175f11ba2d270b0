//! Domain service for like/dislike voting.
//!
//! Keeps every movie's `likes`/`dislikes` equal to the number of accounts
//! holding a like/dislike on it. An account holds at most one of the two
//! per movie.

use thiserror::Error;

use crate::domain::{MovieId, VoteKind};
use crate::models::movie::Movie;

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("Movie {0} not found")]
    MovieNotFound(MovieId),

    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for VoteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait VoteService: Send + Sync {
    /// Applies a like or dislike from `username` on `movie`.
    ///
    /// Repeating the current vote is a no-op; switching moves the vote and
    /// adjusts both counters. Returns the movie after the update.
    ///
    /// # Errors
    ///
    /// - [`VoteError::MovieNotFound`] if the movie does not exist (or vanished mid-update)
    /// - [`VoteError::AccountNotFound`] if the voter's account is gone
    async fn apply_vote(
        &self,
        username: &str,
        movie: MovieId,
        kind: VoteKind,
    ) -> Result<Movie, VoteError>;

    /// Movies the account liked, ordered by title.
    async fn liked_movies(&self, username: &str) -> Result<Vec<Movie>, VoteError>;

    /// Movies the account disliked, ordered by title.
    async fn disliked_movies(&self, username: &str) -> Result<Vec<Movie>, VoteError>;
}
