use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::require_session;
use super::validation::parse_vote;
use super::{ApiError, ApiMessage, AppState, MovieDto, VoteRequest, VoteResponse};
use crate::constants::messages;
use crate::services::VoteError;

/// POST /movie/updateLikeDislike
/// Answers with the movie's new counters.
pub async fn update_like_dislike(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, Response> {
    let auth = require_session(&state, &session)
        .await
        .map_err(IntoResponse::into_response)?;
    let (movie_id, kind) = parse_vote(payload.movie_id.as_ref(), payload.kind.as_deref())
        .map_err(IntoResponse::into_response)?;

    match state
        .shared
        .vote_service
        .apply_vote(&auth.username, movie_id, kind)
        .await
    {
        Ok(movie) => Ok(Json(VoteResponse {
            success: true,
            movie: MovieDto::with_counters(movie, auth.current_role),
        })),
        Err(VoteError::Database(msg)) => {
            tracing::error!(movie_id = %movie_id, %kind, "Vote update failed: {}", msg);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::failed(messages::VOTE_FAILED)),
            )
                .into_response())
        }
        Err(e) => Err(ApiError::from(e).into_response()),
    }
}

/// GET /user/likedMovies
pub async fn liked_movies(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Vec<MovieDto>>, ApiError> {
    let auth = require_session(&state, &session).await?;
    let movies = state.shared.vote_service.liked_movies(&auth.username).await?;
    Ok(Json(MovieDto::list_for_role(movies, auth.current_role)))
}

/// GET /user/dislikedMovies
pub async fn disliked_movies(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Vec<MovieDto>>, ApiError> {
    let auth = require_session(&state, &session).await?;
    let movies = state
        .shared
        .vote_service
        .disliked_movies(&auth.username)
        .await?;
    Ok(Json(MovieDto::list_for_role(movies, auth.current_role)))
}
