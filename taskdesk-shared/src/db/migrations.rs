/// Database migration management
///
/// Migrations live in the workspace-level `migrations/` directory and
/// are embedded into the binary at compile time. Each migration is a
/// forward-only `{timestamp}_{name}.sql` file; sqlx records applied
/// versions in the `_sqlx_migrations` table and re-running is a no-op.

use sqlx::migrate::MigrateDatabase;
use sqlx::{PgPool, Postgres};
use tracing::{info, warn};

/// Applies any pending migrations
///
/// Safe to call on every startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("Database migrations applied");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Database migration failed");
            Err(e)
        }
    }
}

/// Snapshot of migration state, used by tests and diagnostics
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Whether the `_sqlx_migrations` bookkeeping table exists yet
    pub migrations_table_exists: bool,

    /// Number of successfully applied migrations
    pub applied_migrations: i64,
}

/// Reads how many migrations have been applied
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let table_exists: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_name = '_sqlx_migrations'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists.0 {
        return Ok(MigrationStatus {
            migrations_table_exists: false,
            applied_migrations: 0,
        });
    }

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await?;

    Ok(MigrationStatus {
        migrations_table_exists: true,
        applied_migrations: count,
    })
}

/// Creates the database named in the URL if it does not exist yet
///
/// Connects to the server's maintenance database to check, so the URL's
/// credentials need the CREATEDB privilege on first run.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }

    Ok(())
}
