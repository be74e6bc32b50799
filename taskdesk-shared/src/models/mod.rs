/// Database models for TaskDesk
///
/// Each model owns its table's queries:
/// - `user`: accounts, roles, and the stored refresh token hash
/// - `task`: tasks created by `USER` accounts
/// - `comment`: comments written by `AUTHOR` accounts against tasks

pub mod comment;
pub mod task;
pub mod user;
