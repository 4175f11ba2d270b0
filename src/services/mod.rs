pub mod attempts;
pub use attempts::{AttemptOutcome, AttemptsLeft, LoginAttempts};

pub mod credentials;

pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService};

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod vote_locks;
pub use vote_locks::VoteLocks;

pub mod vote_service;
pub use vote_service::{VoteError, VoteService};

pub mod vote_service_impl;
pub use vote_service_impl::SeaOrmVoteService;
