use std::str::FromStr;

use super::{ApiError, MovieRef};
use crate::constants::messages;
use crate::domain::{MovieId, Role, VoteKind, parse_movie_id};

pub fn require_movie_ref(movie: Option<&MovieRef>) -> Result<MovieId, ApiError> {
    let movie = movie.ok_or_else(|| ApiError::validation(messages::MOVIE_ID_REQUIRED))?;
    movie
        .to_movie_id()
        .ok_or_else(|| ApiError::validation(messages::INVALID_MOVIE_ID))
}

pub fn movie_id_from_path(raw: &str) -> Result<MovieId, ApiError> {
    parse_movie_id(raw).ok_or_else(|| ApiError::validation(messages::INVALID_MOVIE_ID))
}

pub fn parse_role(raw: &str) -> Result<Role, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Role is required."));
    }
    Role::from_str(trimmed).map_err(|e| ApiError::validation(e.to_string()))
}

/// Both the movie and a valid vote type must be present.
pub fn parse_vote(
    movie: Option<&MovieRef>,
    kind: Option<&str>,
) -> Result<(MovieId, VoteKind), ApiError> {
    let invalid = || ApiError::validation(messages::INVALID_VOTE_REQUEST);
    let movie = movie.and_then(MovieRef::to_movie_id).ok_or_else(invalid)?;
    let kind = kind
        .and_then(|k| VoteKind::from_str(k).ok())
        .ok_or_else(invalid)?;
    Ok((movie, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_movie_ref() {
        assert_eq!(
            require_movie_ref(Some(&MovieRef::Number(4))).unwrap(),
            MovieId::new(4)
        );
        assert!(require_movie_ref(None).is_err());
        assert!(require_movie_ref(Some(&MovieRef::Text("x".into()))).is_err());
    }

    #[test]
    fn test_movie_id_from_path() {
        assert!(movie_id_from_path("12").is_ok());
        assert!(movie_id_from_path("0").is_err());
        assert!(movie_id_from_path("abc").is_err());
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("Content Editor").unwrap(), Role::ContentEditor);
        assert!(parse_role("").is_err());
        assert!(parse_role("Administrator").is_err());
    }

    #[test]
    fn test_parse_vote() {
        let movie = MovieRef::Number(1);
        assert_eq!(
            parse_vote(Some(&movie), Some("dislike")).unwrap(),
            (MovieId::new(1), VoteKind::Dislike)
        );
        assert!(parse_vote(Some(&movie), Some("love")).is_err());
        assert!(parse_vote(Some(&movie), None).is_err());
        assert!(parse_vote(None, Some("like")).is_err());
    }
}
