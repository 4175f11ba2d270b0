pub use super::accounts::Entity as Accounts;
pub use super::movies::Entity as Movies;
pub use super::votes::Entity as Votes;
