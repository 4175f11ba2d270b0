//! Domain service for the movie catalog.
//!
//! Plain create/replace/delete operations. Like/dislike counters are never
//! written here; see [`crate::services::VoteService`].

use thiserror::Error;

use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieUpdate, NewMovie};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Movie {0} not found")]
    NotFound(MovieId),

    #[error("{0}")]
    Validation(String),

    #[error("Comment cannot be empty.")]
    EmptyComment,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_movies(&self) -> Result<Vec<Movie>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    async fn get_movie(&self, id: MovieId) -> Result<Movie, CatalogError>;

    /// Adds a movie with zeroed counters and no comment.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] naming any blank required field.
    async fn add_movie(&self, movie: NewMovie) -> Result<Movie, CatalogError>;

    /// Overwrites only the fields present in `update`; blank values count as absent.
    async fn edit_movie(&self, id: MovieId, update: MovieUpdate) -> Result<Movie, CatalogError>;

    /// Removes the movie and all votes cast on it.
    async fn remove_movie(&self, id: MovieId) -> Result<(), CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyComment`] when `text` is blank.
    async fn set_comment(&self, id: MovieId, text: &str) -> Result<Movie, CatalogError>;
}
