pub mod categories;
pub mod health;
pub mod posts;
pub mod users;
pub mod volunteers;
