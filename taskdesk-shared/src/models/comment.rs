/// Comment model and database operations
///
/// Comments are written by `AUTHOR` accounts against an existing task.
/// Listing is always scoped to a single task.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     text VARCHAR(1000) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment model
///
/// Serialized directly into API responses, camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment ID (UUID v4)
    pub id: Uuid,

    /// Task the comment is attached to
    pub task_id: Uuid,

    /// User who wrote the comment
    pub user_id: Uuid,

    /// Comment body
    pub text: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub task_id: Uuid,

    /// Author of the comment
    pub user_id: Uuid,

    pub text: String,
}

/// Input for updating an existing comment
#[derive(Debug, Clone, Default)]
pub struct UpdateComment {
    pub text: Option<String>,
}

impl Comment {
    /// Creates a new comment in the database
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, user_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, text, created_at, updated_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.text)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, user_id, text, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Lists the comments on a task, ordered by creation date (newest
    /// first)
    ///
    /// A task with no comments (or an unknown task id) yields an empty
    /// list.
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, user_id, text, created_at, updated_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Updates an existing comment
    ///
    /// # Returns
    ///
    /// The updated comment if found, None if comment doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateComment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE comments SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.text.is_some() {
            bind_count += 1;
            query.push_str(&format!(", text = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, task_id, user_id, text, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Comment>(&query).bind(id);

        if let Some(text) = data.text {
            q = q.bind(text);
        }

        let comment = q.fetch_optional(pool).await?;

        Ok(comment)
    }

    /// Deletes a comment by ID
    ///
    /// # Returns
    ///
    /// True if comment was deleted, false if comment didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_serializes_camel_case() {
        let comment = Comment {
            id: Uuid::nil(),
            task_id: Uuid::nil(),
            user_id: Uuid::nil(),
            text: "looks good".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&comment).unwrap();
        assert!(json.contains("\"taskId\""));
        assert!(json.contains("\"userId\""));
        assert!(!json.contains("task_id"));
    }
}
