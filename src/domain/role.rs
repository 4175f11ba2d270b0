use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-account role that gates editorial and analytics visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "Viewer")]
    Viewer,

    /// May add, edit, remove and comment on movies; sees editorial comments.
    #[serde(rename = "Content Editor")]
    ContentEditor,

    /// Sees aggregate like/dislike counters.
    #[serde(rename = "Marketing Manager")]
    MarketingManager,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Viewer, Self::ContentEditor, Self::MarketingManager];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::ContentEditor => "Content Editor",
            Self::MarketingManager => "Marketing Manager",
        }
    }

    #[must_use]
    pub const fn can_edit_catalog(&self) -> bool {
        matches!(self, Self::ContentEditor)
    }

    #[must_use]
    pub const fn sees_comments(&self) -> bool {
        matches!(self, Self::ContentEditor)
    }

    #[must_use]
    pub const fn sees_vote_counts(&self) -> bool {
        matches!(self, Self::MarketingManager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts the display label, case-insensitively, with or without the space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "viewer" => Ok(Self::Viewer),
            "contenteditor" => Ok(Self::ContentEditor),
            "marketingmanager" => Ok(Self::MarketingManager),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
