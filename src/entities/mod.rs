pub mod prelude;

pub mod accounts;
pub mod movies;
pub mod votes;
