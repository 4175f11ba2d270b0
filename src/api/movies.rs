use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{reader_role, require_editor};
use super::validation::{movie_id_from_path, require_movie_ref};
use super::{
    AddMovieRequest, ApiError, ApiMessage, AppState, CommentRequest, EditMovieRequest, MovieDto,
    MovieQuery, RemoveMovieRequest,
};
use crate::constants::messages;
use crate::domain::parse_movie_id;

/// GET /movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Vec<MovieDto>>, ApiError> {
    let role = reader_role(&state, &session).await?;
    let movies = state.shared.catalog_service.list_movies().await?;
    Ok(Json(MovieDto::list_for_role(movies, role)))
}

/// GET /movie?id=
/// Errors use the `{error}` body.
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<MovieQuery>,
) -> Result<Json<MovieDto>, Response> {
    let raw = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::validation(messages::MOVIE_ID_REQUIRED).into_error_body())?;
    let id = parse_movie_id(&raw)
        .ok_or_else(|| ApiError::validation(messages::INVALID_MOVIE_ID).into_error_body())?;

    let role = reader_role(&state, &session)
        .await
        .map_err(ApiError::into_error_body)?;
    let movie = state
        .shared
        .catalog_service
        .get_movie(id)
        .await
        .map_err(|e| ApiError::from(e).into_error_body())?;

    Ok(Json(MovieDto::for_role(movie, role)))
}

/// POST /addMovie
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<AddMovieRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let editor = require_editor(&state, &session).await?;
    let movie = state
        .shared
        .catalog_service
        .add_movie(payload.into())
        .await?;

    tracing::info!(username = %editor.username, movie_id = %movie.id, title = %movie.title, "Movie added");
    Ok(Json(ApiMessage::ok(messages::MOVIE_ADDED)))
}

/// POST /editMovie/{id}
pub async fn edit_movie(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
    Json(payload): Json<EditMovieRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let editor = require_editor(&state, &session).await?;
    let id = movie_id_from_path(&id)?;

    state
        .shared
        .catalog_service
        .edit_movie(id, payload.into())
        .await?;

    tracing::debug!(username = %editor.username, movie_id = %id, "Edit applied");
    Ok(Json(ApiMessage::ok(messages::MOVIE_UPDATED)))
}

/// POST /removeMovies
pub async fn remove_movie(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RemoveMovieRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let editor = require_editor(&state, &session).await?;
    let id = require_movie_ref(payload.movie_id.as_ref())?;

    state.shared.catalog_service.remove_movie(id).await?;

    tracing::info!(username = %editor.username, movie_id = %id, "Movie removed");
    Ok(Json(ApiMessage::ok(messages::MOVIE_REMOVED)))
}

/// POST /comment
pub async fn set_comment(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let editor = require_editor(&state, &session).await?;
    let id = require_movie_ref(payload.movie_id.as_ref())?;

    state
        .shared
        .catalog_service
        .set_comment(id, &payload.comment)
        .await?;

    tracing::debug!(username = %editor.username, movie_id = %id, "Comment saved");
    Ok(Json(ApiMessage::ok(messages::COMMENT_SAVED)))
}
