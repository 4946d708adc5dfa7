//! # haulyard_core
//!
//! Core domain logic for Haulyard.

pub mod auth;
pub mod mail;
pub mod migrate;
pub mod models;
pub mod notify;
pub mod otp;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
