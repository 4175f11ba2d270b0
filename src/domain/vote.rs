//! Like/dislike reconciliation rules.
//!
//! A user's relation to a movie is exactly one of none, liked or disliked.
//! [`VoteRelation::apply`] turns a requested vote into the counter deltas and
//! the next relation; callers persist both in one transaction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(format!("Unknown vote kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteRelation {
    #[default]
    None,
    Liked,
    Disliked,
}

impl From<Option<VoteKind>> for VoteRelation {
    fn from(kind: Option<VoteKind>) -> Self {
        match kind {
            None => Self::None,
            Some(VoteKind::Like) => Self::Liked,
            Some(VoteKind::Dislike) => Self::Disliked,
        }
    }
}

impl VoteRelation {
    #[must_use]
    pub const fn as_kind(&self) -> Option<VoteKind> {
        match self {
            Self::None => None,
            Self::Liked => Some(VoteKind::Like),
            Self::Disliked => Some(VoteKind::Dislike),
        }
    }

    /// Transition table for a requested vote.
    #[must_use]
    pub const fn apply(self, kind: VoteKind) -> VoteTransition {
        match (self, kind) {
            (Self::None, VoteKind::Like) => VoteTransition::new(1, 0, Self::Liked),
            (Self::None, VoteKind::Dislike) => VoteTransition::new(0, 1, Self::Disliked),
            (Self::Liked, VoteKind::Like) => VoteTransition::new(0, 0, Self::Liked),
            (Self::Liked, VoteKind::Dislike) => VoteTransition::new(-1, 1, Self::Disliked),
            (Self::Disliked, VoteKind::Dislike) => VoteTransition::new(0, 0, Self::Disliked),
            (Self::Disliked, VoteKind::Like) => VoteTransition::new(1, -1, Self::Liked),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub likes_delta: i32,
    pub dislikes_delta: i32,
    pub next: VoteRelation,
}

impl VoteTransition {
    const fn new(likes_delta: i32, dislikes_delta: i32, next: VoteRelation) -> Self {
        Self {
            likes_delta,
            dislikes_delta,
            next,
        }
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.likes_delta == 0 && self.dislikes_delta == 0
    }
}
