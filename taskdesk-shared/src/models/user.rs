/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing
/// user accounts. Accounts carry no username or email; they are
/// identified by their server-generated UUID, which callers quote back
/// at login.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('USER', 'AUTHOR');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL,
///     task_id UUID,
///     refresh_token_hash VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::user::{CreateUser, User, UserRole};
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // Create a new user
/// let new_user = CreateUser {
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
///     task_id: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role assigned to a user account
///
/// Stored in Postgres as the `user_role` enum and carried in JWT claims.
/// `USER` accounts create tasks; `AUTHOR` accounts write comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Author,
}

impl UserRole {
    /// Gets the role as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Author => "AUTHOR",
        }
    }
}

/// User model representing a user account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The
/// struct intentionally does not implement `Serialize`; API responses go
/// through view types so `password_hash` and `refresh_token_hash` never
/// leave the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Argon2id password hash
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Optional task the account is pointed at
    pub task_id: Option<Uuid>,

    /// Hash of the currently valid refresh token
    ///
    /// None when the user has logged out or never logged in. At most
    /// one refresh token per user is valid at a time.
    pub refresh_token_hash: Option<String>,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Optional task assignment
    pub task_id: Option<Uuid>,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New password hash
    pub password_hash: Option<String>,

    /// New role
    pub role: Option<UserRole>,

    /// New task assignment (use Some(None) to clear)
    pub task_id: Option<Option<Uuid>>,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Returns
    ///
    /// The newly created user with generated ID and timestamps
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskdesk_shared::models::user::{CreateUser, User, UserRole};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let new_user = CreateUser {
    ///     password_hash: "$argon2id$...".to_string(),
    ///     role: UserRole::Author,
    ///     task_id: None,
    /// };
    ///
    /// let user = User::create(&pool, new_user).await?;
    /// println!("Created user: {}", user.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (password_hash, role, task_id)
            VALUES ($1, $2, $3)
            RETURNING id, password_hash, role, task_id, refresh_token_hash,
                      created_at, updated_at
            "#,
        )
        .bind(data.password_hash)
        .bind(data.role)
        .bind(data.task_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, password_hash, role, task_id, refresh_token_hash,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, ordered by creation date (newest first)
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, password_hash, role, task_id, refresh_token_hash,
                   created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at`
    /// timestamp is automatically set to the current time.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if user doesn't exist
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskdesk_shared::models::user::{UpdateUser, User};
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    /// let update = UpdateUser {
    ///     task_id: Some(None), // clear the assignment
    ///     ..Default::default()
    /// };
    ///
    /// if let Some(user) = User::update(&pool, user_id, update).await? {
    ///     println!("Updated user: {}", user.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }
        if data.task_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", task_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, password_hash, role, task_id, refresh_token_hash, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(task_id) = data.task_id {
            q = q.bind(task_id);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Tasks and comments created by the user are removed by the
    /// `ON DELETE CASCADE` constraints.
    ///
    /// # Returns
    ///
    /// True if user was deleted, false if user didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stores or clears the refresh token hash for a user
    ///
    /// Used on login and register (store the fresh hash) and on logout
    /// (clear it with None).
    ///
    /// # Returns
    ///
    /// True if the user was found and updated, false otherwise
    pub async fn set_refresh_token_hash(
        pool: &PgPool,
        id: Uuid,
        hash: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the stored refresh token hash, but only if it still
    /// matches the hash the presented token was verified against
    ///
    /// This is the compare-and-swap half of refresh token rotation: when
    /// two requests race with the same token, exactly one update matches
    /// the `WHERE` clause and wins.
    ///
    /// # Returns
    ///
    /// True if the rotation won, false if another request rotated (or a
    /// logout cleared) the token first
    pub async fn rotate_refresh_token_hash(
        pool: &PgPool,
        id: Uuid,
        current_hash: &str,
        next_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $3, updated_at = NOW()
            WHERE id = $1 AND refresh_token_hash = $2
            "#,
        )
        .bind(id)
        .bind(current_hash)
        .bind(next_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_wire_format() {
        assert_eq!(serde_json::to_string(&UserRole::User).unwrap(), "\"USER\"");
        assert_eq!(serde_json::to_string(&UserRole::Author).unwrap(), "\"AUTHOR\"");

        let role: UserRole = serde_json::from_str("\"AUTHOR\"").unwrap();
        assert_eq!(role, UserRole::Author);
    }

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::User.as_str(), "USER");
        assert_eq!(UserRole::Author.as_str(), "AUTHOR");
    }

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            password_hash: "hash".to_string(),
            role: UserRole::User,
            task_id: None,
        };

        assert_eq!(create_user.password_hash, "hash");
        assert_eq!(create_user.role, UserRole::User);
    }

    #[test]
    fn test_update_user_default() {
        let update = UpdateUser::default();
        assert!(update.password_hash.is_none());
        assert!(update.role.is_none());
        assert!(update.task_id.is_none());
    }

    #[test]
    fn test_update_user_task_id_clearing() {
        // Some(None) means "set task_id to NULL", None means "leave it"
        let clear = UpdateUser { task_id: Some(None), ..Default::default() };
        assert_eq!(clear.task_id, Some(None));

        let assign = UpdateUser {
            task_id: Some(Some(Uuid::nil())),
            ..Default::default()
        };
        assert!(matches!(assign.task_id, Some(Some(_))));
    }

    // Integration tests for database operations live in the API crate's
    // flow tests, which run against a real Postgres.
}
