use serde::{Deserialize, Serialize};

use crate::domain::MovieId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub video_url: String,
    pub image_path: String,
    pub description: String,
    pub genre: String,
    pub likes: i32,
    pub dislikes: i32,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when a movie is added to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub video_url: String,
    pub image_path: String,
    pub description: String,
    pub genre: String,
}

impl NewMovie {
    /// Names of required fields that are missing or blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("videoUrl", &self.video_url),
            ("imagePath", &self.image_path),
            ("description", &self.description),
            ("genre", &self.genre),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub image_path: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

impl MovieUpdate {
    /// Treat blank strings as "not supplied", the way an edit form submits
    /// untouched inputs.
    #[must_use]
    pub fn without_blanks(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            title: keep(self.title),
            video_url: keep(self.video_url),
            image_path: keep(self.image_path),
            description: keep(self.description),
            genre: keep(self.genre),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.video_url.is_none()
            && self.image_path.is_none()
            && self.description.is_none()
            && self.genre.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_reports_blank_values() {
        let movie = NewMovie {
            title: "Heat".to_string(),
            video_url: " ".to_string(),
            image_path: "img/heat.jpg".to_string(),
            description: String::new(),
            genre: "Crime".to_string(),
        };
        assert_eq!(movie.missing_fields(), vec!["videoUrl", "description"]);
    }

    #[test]
    fn test_update_without_blanks() {
        let update = MovieUpdate {
            title: Some("  ".to_string()),
            genre: Some("Drama".to_string()),
            ..Default::default()
        }
        .without_blanks();

        assert_eq!(update.title, None);
        assert_eq!(update.genre.as_deref(), Some("Drama"));
        assert!(!update.is_empty());
        assert!(MovieUpdate::default().is_empty());
    }
}
