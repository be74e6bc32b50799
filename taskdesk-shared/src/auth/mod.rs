/// Authentication and authorization module
///
/// Provides JWT creation and validation for the access/refresh token
/// pair, Argon2id password hashing, refresh token storage hashing, and
/// the role and ownership checks used by API handlers.

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod refresh;
