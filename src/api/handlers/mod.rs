pub mod auth;
pub mod health;
pub mod not_found;
pub mod users;
