mod accounts;
mod movies;

pub use accounts::{cmd_grant_role, cmd_list_accounts, cmd_revoke_role};
pub use movies::{cmd_add_movie, cmd_list_movies};
