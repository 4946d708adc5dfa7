//! Business logic behind the request handlers.

pub mod auth;
pub mod cookies;
pub mod users;
