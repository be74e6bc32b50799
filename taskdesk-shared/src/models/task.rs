/// Task model and database operations
///
/// Tasks are created by `USER` accounts and carry two free-text fields,
/// a description and a comment. Ownership is recorded in `user_id` and
/// enforced by the API on update and delete.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     description VARCHAR(1000) NOT NULL,
///     comment VARCHAR(1000) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task model
///
/// Serialized directly into API responses, camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// User who created the task
    pub user_id: Uuid,

    /// What the task is about
    pub description: String,

    /// Free-text note attached by the creator
    pub comment: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owner of the task
    pub user_id: Uuid,

    pub description: String,

    pub comment: String,
}

/// Input for updating an existing task
///
/// Only non-None fields will be updated.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub description: Option<String>,

    pub comment: Option<String>,
}

impl Task {
    /// Creates a new task in the database
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, description, comment)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, description, comment, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.description)
        .bind(data.comment)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, description, comment, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, ordered by creation date (newest first)
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, description, comment, created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates an existing task
    ///
    /// # Returns
    ///
    /// The updated task if found, None if task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.comment.is_some() {
            bind_count += 1;
            query.push_str(&format!(", comment = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, user_id, description, comment, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(comment) = data.comment {
            q = q.bind(comment);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Comments on the task are removed by the cascade.
    ///
    /// # Returns
    ///
    /// True if task was deleted, false if task didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
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
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            description: "write the report".to_string(),
            comment: "due friday".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(!json.contains("user_id"));
    }

    #[test]
    fn test_update_task_default() {
        let update = UpdateTask::default();
        assert!(update.description.is_none());
        assert!(update.comment.is_none());
    }
}
