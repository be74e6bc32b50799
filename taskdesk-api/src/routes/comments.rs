/// Comment CRUD endpoints
///
/// All comment endpoints require authentication. Creation is gated on
/// the `AUTHOR` role and requires the parent task to exist; update and
/// delete are gated on ownership.
///
/// # Endpoints
///
/// - `POST /comments` - Create comment (role `AUTHOR` only)
/// - `GET /comments?task_id=<uuid>` - List a task's comments, newest first
/// - `GET /comments/:id` - Fetch one comment
/// - `PATCH /comments/:id` - Update own comment
/// - `DELETE /comments/:id` - Delete own comment

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::{validation_error, OkResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::{authorization, middleware::AuthContext},
    models::comment::{Comment, CreateComment, UpdateComment},
    models::task::Task,
    models::user::UserRole,
};
use uuid::Uuid;
use validator::Validate;

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    /// Parent task
    pub task_id: Uuid,

    /// Comment text
    #[validate(length(min = 1, max = 1000, message = "Text must be 1-1000 characters"))]
    pub text: String,
}

/// Update comment request (partial)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    /// New text
    #[validate(length(min = 1, max = 1000, message = "Text must be 1-1000 characters"))]
    pub text: Option<String>,
}

/// Query parameters for listing comments
///
/// The list endpoint is scoped to one task; `task_id` is required and
/// stays snake_case on the wire.
#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    /// Task whose comments to list
    pub task_id: Uuid,
}

/// Create comment
///
/// The caller becomes the comment's author. Only the `AUTHOR` role may
/// create comments, and the parent task must exist.
///
/// # Endpoint
///
/// ```text
/// POST /comments
/// Authorization: Bearer <accessToken>
/// Content-Type: application/json
///
/// {
///   "taskId": "uuid",
///   "text": "Looks good to me"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Caller's role is not `AUTHOR`
/// - `404 Not Found`: Parent task does not exist
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    authorization::require_role(&auth, &[UserRole::Author])?;
    req.validate().map_err(|e| validation_error(&e))?;

    // The parent task must exist before anything is persisted
    Task::find_by_id(&state.db, req.task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", req.task_id)))?;

    let comment = Comment::create(
        &state.db,
        CreateComment {
            task_id: req.task_id,
            user_id: auth.user_id,
            text: req.text,
        },
    )
    .await?;

    tracing::info!(
        comment_id = %comment.id,
        task_id = %req.task_id,
        user_id = %auth.user_id,
        "Created comment"
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// List a task's comments, newest first
///
/// An unknown `task_id` yields an empty list, not 404.
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListCommentsQuery>,
) -> ApiResult<Json<Vec<Comment>>> {
    let comments = Comment::list_by_task(&state.db, query.task_id).await?;

    Ok(Json(comments))
}

/// Fetch a single comment
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid access token
/// - `404 Not Found`: No such comment
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Comment>> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    Ok(Json(comment))
}

/// Update own comment
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Caller is not the comment's author
/// - `404 Not Found`: No such comment
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate().map_err(|e| validation_error(&e))?;

    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    authorization::require_ownership(&auth, comment.user_id)?;

    let updated = Comment::update(&state.db, id, UpdateComment { text: req.text })
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    Ok(Json(updated))
}

/// Delete own comment
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Caller is not the comment's author
/// - `404 Not Found`: No such comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OkResponse>> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    authorization::require_ownership(&auth, comment.user_id)?;

    let deleted = Comment::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Comment {} not found", id)));
    }

    tracing::info!(comment_id = %id, user_id = %auth.user_id, "Deleted comment");

    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_uses_camel_case_task_id() {
        let id = Uuid::new_v4();
        let req: CreateCommentRequest = serde_json::from_value(json!({
            "taskId": id.to_string(),
            "text": "hello"
        }))
        .unwrap();
        assert_eq!(req.task_id, id);

        let result = serde_json::from_value::<CreateCommentRequest>(json!({
            "task_id": id.to_string(),
            "text": "hello"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_text_bounds() {
        let req: CreateCommentRequest = serde_json::from_value(json!({
            "taskId": Uuid::new_v4().to_string(),
            "text": ""
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_query_requires_task_id() {
        let result = serde_json::from_value::<ListCommentsQuery>(json!({}));
        assert!(result.is_err());
    }
}
