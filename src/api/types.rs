use serde::{Deserialize, Serialize};

use crate::domain::{MovieId, Role, parse_movie_id};
use crate::models::movie::{Movie, MovieUpdate, NewMovie};

/// `{success, message}` body shared by most endpoints.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `{error}` body used by the single-movie lookup.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    pub logged_in: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RoleInfo {
    pub success: bool,
    pub role: Role,
    pub list: Vec<Role>,
}

/// A movie as seen by a particular role.
///
/// `comment` is only present for Content Editors and the counters only for
/// Marketing Managers, unless the caller asked for counters explicitly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub id: MovieId,
    pub title: String,
    pub video_url: String,
    pub image_path: String,
    pub description: String,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MovieDto {
    #[must_use]
    pub fn for_role(movie: Movie, role: Role) -> Self {
        let counters = role.sees_vote_counts();
        Self {
            id: movie.id,
            title: movie.title,
            video_url: movie.video_url,
            image_path: movie.image_path,
            description: movie.description,
            genre: movie.genre,
            likes: counters.then_some(movie.likes),
            dislikes: counters.then_some(movie.dislikes),
            comment: role.sees_comments().then_some(movie.comment),
        }
    }

    /// Projection for vote responses, which always carry the new counters.
    #[must_use]
    pub fn with_counters(movie: Movie, role: Role) -> Self {
        let likes = movie.likes;
        let dislikes = movie.dislikes;
        Self {
            likes: Some(likes),
            dislikes: Some(dislikes),
            ..Self::for_role(movie, role)
        }
    }

    #[must_use]
    pub fn list_for_role(movies: Vec<Movie>, role: Role) -> Vec<Self> {
        movies
            .into_iter()
            .map(|movie| Self::for_role(movie, role))
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub success: bool,
    pub movie: MovieDto,
}

/// A movie reference as sent by clients: either a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MovieRef {
    Number(i64),
    Text(String),
}

impl MovieRef {
    #[must_use]
    pub fn to_movie_id(&self) -> Option<MovieId> {
        match self {
            Self::Number(n) => i32::try_from(*n)
                .ok()
                .filter(|n| *n > 0)
                .map(MovieId::new),
            Self::Text(s) => parse_movie_id(s),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddMovieRequest {
    pub title: String,
    pub video_url: String,
    pub image_path: String,
    pub description: String,
    pub genre: String,
}

impl From<AddMovieRequest> for NewMovie {
    fn from(req: AddMovieRequest) -> Self {
        Self {
            title: req.title,
            video_url: req.video_url,
            image_path: req.image_path,
            description: req.description,
            genre: req.genre,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditMovieRequest {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub image_path: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

impl From<EditMovieRequest> for MovieUpdate {
    fn from(req: EditMovieRequest) -> Self {
        Self {
            title: req.title,
            video_url: req.video_url,
            image_path: req.image_path,
            description: req.description,
            genre: req.genre,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoveMovieRequest {
    pub movie_id: Option<MovieRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentRequest {
    pub movie_id: Option<MovieRef>,
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoteRequest {
    pub movie_id: Option<MovieRef>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
