use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::{ApiMessage, ErrorBody};
use crate::constants::messages;
use crate::services::{AuthError, CatalogError, VoteError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    Unauthorized(String),

    Forbidden(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status and client-facing message; server-side failures are logged here
    /// and replaced by a generic message.
    fn parts(&self) -> (StatusCode, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        }
    }

    /// Renders the error with an `{error}` body instead of `{success, message}`.
    #[must_use]
    pub fn into_error_body(self) -> Response {
        let (status, error) = self.parts();
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        (status, Json(ApiMessage::failed(message))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(format!("{err:#}"))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::InvalidUsername
            | AuthError::InvalidPassword { .. }
            | AuthError::AccountLockedAndRemoved { .. } => ApiError::Unauthorized(err.to_string()),
            AuthError::DuplicateAccount(_) => ApiError::Conflict(err.to_string()),
            AuthError::AccountNotFound(_) => ApiError::NotFound(err.to_string()),
            AuthError::RoleNotGranted(_) => ApiError::Forbidden(err.to_string()),
            AuthError::LastRole => ApiError::ValidationError(err.to_string()),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ApiError::NotFound(messages::MOVIE_NOT_FOUND.to_string()),
            CatalogError::Validation(msg) => ApiError::ValidationError(msg),
            CatalogError::EmptyComment => ApiError::ValidationError(err.to_string()),
            CatalogError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<VoteError> for ApiError {
    fn from(err: VoteError) -> Self {
        match err {
            VoteError::MovieNotFound(_) => {
                ApiError::NotFound(messages::MOVIE_NOT_FOUND.to_string())
            }
            VoteError::AccountNotFound(_) => {
                ApiError::Unauthorized(messages::NOT_LOGGED_IN.to_string())
            }
            VoteError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }

    #[must_use]
    pub fn not_logged_in() -> Self {
        ApiError::Unauthorized(messages::NOT_LOGGED_IN.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MovieId, Role};
    use crate::services::AttemptsLeft;

    #[test]
    fn test_auth_errors_map_to_statuses() {
        let cases = [
            (AuthError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::InvalidUsername, StatusCode::UNAUTHORIZED),
            (
                AuthError::InvalidPassword {
                    remaining: AttemptsLeft(2),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                AuthError::DuplicateAccount("a@x.com".into()),
                StatusCode::CONFLICT,
            ),
            (
                AuthError::RoleNotGranted(Role::ContentEditor),
                StatusCode::FORBIDDEN,
            ),
            (AuthError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).parts().0, status);
        }
    }

    #[test]
    fn test_database_details_are_not_leaked() {
        let (status, message) = ApiError::from(CatalogError::Database("disk I/O".into())).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("disk"));
    }

    #[test]
    fn test_missing_movie_message() {
        let (status, message) = ApiError::from(VoteError::MovieNotFound(MovieId::new(9))).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, messages::MOVIE_NOT_FOUND);
    }
}
