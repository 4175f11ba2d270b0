//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieUpdate, NewMovie};
use crate::services::catalog_service::{CatalogError, CatalogService};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_movies(&self) -> Result<Vec<Movie>, CatalogError> {
        Ok(self.store.list_movies().await?)
    }

    async fn get_movie(&self, id: MovieId) -> Result<Movie, CatalogError> {
        self.store
            .get_movie(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn add_movie(&self, movie: NewMovie) -> Result<Movie, CatalogError> {
        let missing = movie.missing_fields();
        if !missing.is_empty() {
            return Err(CatalogError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        }

        Ok(self.store.add_movie(&movie).await?)
    }

    async fn edit_movie(&self, id: MovieId, update: MovieUpdate) -> Result<Movie, CatalogError> {
        let update = update.without_blanks();
        let movie = self
            .store
            .update_movie(id, update)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        info!(movie_id = %id, title = %movie.title, "Movie edited");
        Ok(movie)
    }

    async fn remove_movie(&self, id: MovieId) -> Result<(), CatalogError> {
        if self.store.remove_movie(id).await? {
            Ok(())
        } else {
            Err(CatalogError::NotFound(id))
        }
    }

    async fn set_comment(&self, id: MovieId, text: &str) -> Result<Movie, CatalogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::EmptyComment);
        }

        let movie = self
            .store
            .set_movie_comment(id, text)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        info!(movie_id = %id, "Editorial comment updated");
        Ok(movie)
    }
}
