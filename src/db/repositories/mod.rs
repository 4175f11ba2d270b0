pub mod account;
pub mod movie;
pub mod vote;
