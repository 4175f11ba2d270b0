//! `SeaORM` implementation of the `VoteService` trait.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::db::{Account, Store};
use crate::domain::{MovieId, VoteKind};
use crate::models::movie::Movie;
use crate::services::vote_locks::VoteLocks;
use crate::services::vote_service::{VoteError, VoteService};

pub struct SeaOrmVoteService {
    store: Store,
    locks: VoteLocks,
}

impl SeaOrmVoteService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            locks: VoteLocks::new(),
        }
    }

    async fn voter(&self, username: &str) -> Result<Account, VoteError> {
        self.store
            .get_account(username)
            .await?
            .ok_or_else(|| VoteError::AccountNotFound(username.to_string()))
    }
}

#[async_trait]
impl VoteService for SeaOrmVoteService {
    async fn apply_vote(
        &self,
        username: &str,
        movie: MovieId,
        kind: VoteKind,
    ) -> Result<Movie, VoteError> {
        let account = self.voter(username).await?;

        // Held until the updated movie has been read back.
        let _guard = self.locks.acquire(movie).await;

        if self.store.get_movie(movie).await?.is_none() {
            return Err(VoteError::MovieNotFound(movie));
        }

        let relation = self.store.vote_relation(account.id, movie).await?;
        let transition = relation.apply(kind);

        if transition.is_noop() {
            debug!(%username, movie_id = %movie, %kind, "Vote unchanged");
        } else {
            let applied = self
                .store
                .apply_vote_transition(account.id, movie, transition)
                .await?;
            if !applied {
                return Err(VoteError::MovieNotFound(movie));
            }
            info!(
                %username,
                movie_id = %movie,
                %kind,
                likes_delta = transition.likes_delta,
                dislikes_delta = transition.dislikes_delta,
                "Vote applied"
            );
        }

        self.store
            .get_movie(movie)
            .await?
            .ok_or(VoteError::MovieNotFound(movie))
    }

    async fn liked_movies(&self, username: &str) -> Result<Vec<Movie>, VoteError> {
        let account = self.voter(username).await?;
        Ok(self.store.movies_voted_by(account.id, VoteKind::Like).await?)
    }

    async fn disliked_movies(&self, username: &str) -> Result<Vec<Movie>, VoteError> {
        let account = self.voter(username).await?;
        Ok(self
            .store
            .movies_voted_by(account.id, VoteKind::Dislike)
            .await?)
    }
}
