use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::domain::{AccountId, MovieId, VoteKind, VoteRelation, VoteTransition};
use crate::entities::{movies, prelude::*, votes};

/// Vote totals recomputed from the vote rows of one movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoteTally {
    pub likes: i32,
    pub dislikes: i32,
}

pub struct VoteRepository {
    conn: DatabaseConnection,
}

impl VoteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn relation(&self, account: AccountId, movie: MovieId) -> Result<VoteRelation> {
        let row = Votes::find_by_id((account.value(), movie.value()))
            .one(&self.conn)
            .await
            .context("Failed to query vote relation")?;

        let kind = row.and_then(|r| r.kind.parse::<VoteKind>().ok());
        Ok(VoteRelation::from(kind))
    }

    /// Persist a transition: counter deltas and the vote row change commit
    /// together or not at all.
    ///
    /// Returns `false` (and writes nothing) if the movie no longer exists.
    pub async fn apply(
        &self,
        account: AccountId,
        movie: MovieId,
        transition: VoteTransition,
    ) -> Result<bool> {
        let Some(kind) = transition.next.as_kind() else {
            return Ok(true);
        };

        let txn = self.conn.begin().await?;

        let counters = Movies::update_many()
            .col_expr(
                movies::Column::Likes,
                Expr::col(movies::Column::Likes).add(transition.likes_delta),
            )
            .col_expr(
                movies::Column::Dislikes,
                Expr::col(movies::Column::Dislikes).add(transition.dislikes_delta),
            )
            .filter(movies::Column::Id.eq(movie.value()))
            .exec(&txn)
            .await?;

        if counters.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        let row = votes::ActiveModel {
            account_id: Set(account.value()),
            movie_id: Set(movie.value()),
            kind: Set(kind.as_str().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        Votes::insert(row)
            .on_conflict(
                OnConflict::columns([votes::Column::AccountId, votes::Column::MovieId])
                    .update_column(votes::Column::Kind)
                    .to_owned(),
            )
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(true)
    }

    pub async fn tally(&self, movie: MovieId) -> Result<VoteTally> {
        let count = |kind: VoteKind| {
            Votes::find()
                .filter(votes::Column::MovieId.eq(movie.value()))
                .filter(votes::Column::Kind.eq(kind.as_str()))
                .count(&self.conn)
        };

        let likes = count(VoteKind::Like).await?;
        let dislikes = count(VoteKind::Dislike).await?;

        Ok(VoteTally {
            likes: i32::try_from(likes).context("Like tally overflow")?,
            dislikes: i32::try_from(dislikes).context("Dislike tally overflow")?,
        })
    }
}
