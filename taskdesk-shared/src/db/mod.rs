/// Database module
///
/// Connection pooling and migration management for Postgres.

pub mod migrations;
pub mod pool;
