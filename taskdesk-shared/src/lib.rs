//! TaskDesk Shared Library
//!
//! Common types and utilities shared between TaskDesk services:
//! - Database models and queries
//! - Authentication and authorization (JWT, password hashing, refresh
//!   token storage)
//! - Database connection pooling and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Shared library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
