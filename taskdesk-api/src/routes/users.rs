/// User management endpoints
///
/// Creation is public (it doubles as registration without a session);
/// reads require authentication; updates and deletes are self-only.
///
/// # Endpoints
///
/// - `POST /users` - Create user (public)
/// - `GET /users` - List users, newest first
/// - `GET /users/:id` - Fetch one user
/// - `PATCH /users/:id` - Update own user
/// - `DELETE /users/:id` - Delete own user
///
/// # Security
///
/// Responses use the `UserResponse` view, which carries no
/// `password_hash` or `refresh_token_hash` field at the type level.

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
use serde::{Deserialize, Deserializer, Serialize};
use taskdesk_shared::{
    auth::{authorization, middleware::AuthContext, password},
    models::user::{CreateUser, UpdateUser, User, UserRole},
};
use uuid::Uuid;
use validator::Validate;

/// Public view of a user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User id
    pub id: Uuid,

    /// Role
    pub role: UserRole,

    /// Optional task association
    pub task_id: Option<Uuid>,

    /// Created at
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Updated at
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            task_id: user.task_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Password (stored as an argon2id hash)
    #[validate(length(min = 6, max = 200, message = "Password must be 6-200 characters"))]
    pub password: String,

    /// Role for the new user
    pub role: UserRole,

    /// Optional task association
    pub task_id: Option<Uuid>,
}

/// Update user request
///
/// `task_id` distinguishes "absent" (leave unchanged) from an explicit
/// `null` (clear the association).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New password
    #[validate(length(min = 6, max = 200, message = "Password must be 6-200 characters"))]
    pub password: Option<String>,

    /// New role
    pub role: Option<UserRole>,

    /// New task association (explicit null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub task_id: Option<Option<Uuid>>,
}

/// Deserializes a present-but-possibly-null field into `Some(Option<T>)`
///
/// Combined with `#[serde(default)]`, an absent field stays `None`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

/// Create user
///
/// Public endpoint. Unlike `/auth/register` it does not start a
/// session; it returns the created user view instead of a token pair.
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// {
///   "password": "StrongPassword123",
///   "role": "AUTHOR",
///   "taskId": null
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate().map_err(|e| validation_error(&e))?;

    let password_hash = password::hash_password_async(req.password).await?;

    let user = User::create(
        &state.db,
        CreateUser {
            password_hash,
            role: req.role,
            task_id: req.task_id,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "Created user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List users, newest first
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = User::list(&state.db).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch a single user
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid access token
/// - `404 Not Found`: No such user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(UserResponse::from(user)))
}

/// Update own user
///
/// Callers may only update themselves; the ownership gate fires before
/// the body is even validated.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Target is a different user
/// - `404 Not Found`: No such user
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    authorization::require_ownership(&auth, id)?;
    req.validate().map_err(|e| validation_error(&e))?;

    // A new password is hashed before it touches the store
    let password_hash = match req.password {
        Some(new_password) => Some(password::hash_password_async(new_password).await?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            password_hash,
            role: req.role,
            task_id: req.task_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete own user
///
/// Cascades to the user's tasks and comments.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Target is a different user
/// - `404 Not Found`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OkResponse>> {
    authorization::require_ownership(&auth, id)?;

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("User {} not found", id)));
    }

    tracing::info!(user_id = %id, "Deleted user");

    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_distinguishes_absent_and_null_task_id() {
        let absent: UpdateUserRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.task_id, None);

        let cleared: UpdateUserRequest = serde_json::from_value(json!({
            "taskId": null
        }))
        .unwrap();
        assert_eq!(cleared.task_id, Some(None));

        let id = Uuid::new_v4();
        let set: UpdateUserRequest = serde_json::from_value(json!({
            "taskId": id.to_string()
        }))
        .unwrap();
        assert_eq!(set.task_id, Some(Some(id)));
    }

    #[test]
    fn test_user_response_never_carries_hashes() {
        let response = UserResponse {
            id: Uuid::new_v4(),
            role: UserRole::User,
            task_id: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("refreshToken"));
        assert!(!json.contains("refresh_token"));
    }

    #[test]
    fn test_create_request_rejects_short_password() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "password": "short",
            "role": "USER"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_update_request_validates_password_when_present() {
        let ok: UpdateUserRequest = serde_json::from_value(json!({
            "password": "longenough"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: UpdateUserRequest = serde_json::from_value(json!({
            "password": "no"
        }))
        .unwrap();
        assert!(bad.validate().is_err());
    }
}
