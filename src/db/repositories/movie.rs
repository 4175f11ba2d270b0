use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::{AccountId, MovieId, VoteKind};
use crate::entities::{movies, prelude::*, votes};
use crate::models::movie::{Movie, MovieUpdate, NewMovie};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: movies::Model) -> Movie {
        Movie {
            id: MovieId::new(model.id),
            title: model.title,
            video_url: model.video_url,
            image_path: model.image_path,
            description: model.description,
            genre: model.genre,
            likes: model.likes,
            dislikes: model.dislikes,
            comment: model.comment,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub async fn add(&self, movie: &NewMovie) -> Result<Movie> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = movies::ActiveModel {
            title: Set(movie.title.trim().to_string()),
            video_url: Set(movie.video_url.trim().to_string()),
            image_path: Set(movie.image_path.trim().to_string()),
            description: Set(movie.description.trim().to_string()),
            genre: Set(movie.genre.trim().to_string()),
            likes: Set(0),
            dislikes: Set(0),
            comment: Set(String::new()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert movie")?;

        info!("Added movie: {} (ID: {})", model.title, model.id);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: MovieId) -> Result<Option<Movie>> {
        let model = Movies::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query movie")?;

        Ok(model.map(Self::map_model))
    }

    pub async fn list_all(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Overwrite only the supplied fields. Returns `None` for an unknown id.
    pub async fn update(&self, id: MovieId, update: MovieUpdate) -> Result<Option<Movie>> {
        let Some(model) = Movies::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query movie for update")?
        else {
            return Ok(None);
        };

        if update.is_empty() {
            return Ok(Some(Self::map_model(model)));
        }

        let mut active: movies::ActiveModel = model.into();
        if let Some(title) = update.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(video_url) = update.video_url {
            active.video_url = Set(video_url.trim().to_string());
        }
        if let Some(image_path) = update.image_path {
            active.image_path = Set(image_path.trim().to_string());
        }
        if let Some(description) = update.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(genre) = update.genre {
            active.genre = Set(genre.trim().to_string());
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(updated)))
    }

    pub async fn set_comment(&self, id: MovieId, comment: &str) -> Result<Option<Movie>> {
        let Some(model) = Movies::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query movie for comment")?
        else {
            return Ok(None);
        };

        let mut active: movies::ActiveModel = model.into();
        active.comment = Set(comment.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(updated)))
    }

    /// Delete a movie and every vote cast on it.
    pub async fn remove(&self, id: MovieId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        Votes::delete_many()
            .filter(votes::Column::MovieId.eq(id.value()))
            .exec(&txn)
            .await?;

        let result = Movies::delete_by_id(id.value()).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed movie with ID: {}", id);
        }
        Ok(removed)
    }

    /// Movies the account has a vote of `kind` on, ordered by title.
    pub async fn voted_by(&self, account: AccountId, kind: VoteKind) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .join(JoinType::InnerJoin, movies::Relation::Votes.def())
            .filter(votes::Column::AccountId.eq(account.value()))
            .filter(votes::Column::Kind.eq(kind.as_str()))
            .order_by_asc(movies::Column::Title)
            .all(&self.conn)
            .await
            .context("Failed to query voted movies")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }
}
