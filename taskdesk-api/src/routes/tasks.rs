/// Task CRUD endpoints
///
/// All task endpoints require authentication. Creation is gated on the
/// `USER` role; update and delete are gated on ownership.
///
/// # Endpoints
///
/// - `POST /tasks` - Create task (role `USER` only)
/// - `GET /tasks` - List tasks, newest first
/// - `GET /tasks/:id` - Fetch one task
/// - `PATCH /tasks/:id` - Update own task
/// - `DELETE /tasks/:id` - Delete own task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::{validation_error, OkResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::{authorization, middleware::AuthContext},
    models::task::{CreateTask, Task, UpdateTask},
    models::user::UserRole,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task description
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: String,

    /// Free-form comment field on the task itself
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub comment: String,
}

/// Update task request (partial)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New description
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: Option<String>,

    /// New comment
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub comment: Option<String>,
}

/// Create task
///
/// The caller becomes the owner. Only the `USER` role may create tasks.
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <accessToken>
/// Content-Type: application/json
///
/// {
///   "description": "Ship the release",
///   "comment": "Blocked on review"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Caller's role is not `USER`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    authorization::require_role(&auth, &[UserRole::User])?;
    req.validate().map_err(|e| validation_error(&e))?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.user_id,
            description: req.description,
            comment: req.comment,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, user_id = %auth.user_id, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks, newest first
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list(&state.db).await?;

    Ok(Json(tasks))
}

/// Fetch a single task
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid access token
/// - `404 Not Found`: No such task
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Update own task
///
/// Unspecified fields are left unchanged. Ownership is checked against
/// the stored row, so a missing task yields 404 before any 403.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Caller does not own the task
/// - `404 Not Found`: No such task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(|e| validation_error(&e))?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    authorization::require_ownership(&auth, task.user_id)?;

    let updated = Task::update(
        &state.db,
        id,
        UpdateTask {
            description: req.description,
            comment: req.comment,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(updated))
}

/// Delete own task
///
/// Cascades to the task's comments.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Caller does not own the task
/// - `404 Not Found`: No such task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OkResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    authorization::require_ownership(&auth, task.user_id)?;

    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Task {} not found", id)));
    }

    tracing::info!(task_id = %id, user_id = %auth.user_id, "Deleted task");

    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_length_bounds() {
        let req: CreateTaskRequest = serde_json::from_value(json!({
            "description": "d",
            "comment": "c"
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let empty: CreateTaskRequest = serde_json::from_value(json!({
            "description": "",
            "comment": "c"
        }))
        .unwrap();
        assert!(empty.validate().is_err());

        let oversized: CreateTaskRequest = serde_json::from_value(json!({
            "description": "d",
            "comment": "x".repeat(1001)
        }))
        .unwrap();
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_update_request_allows_partial_bodies() {
        let partial: UpdateTaskRequest = serde_json::from_value(json!({
            "description": "only this"
        }))
        .unwrap();
        assert!(partial.validate().is_ok());
        assert!(partial.comment.is_none());

        let empty: UpdateTaskRequest = serde_json::from_value(json!({})).unwrap();
        assert!(empty.validate().is_ok());
    }
}
