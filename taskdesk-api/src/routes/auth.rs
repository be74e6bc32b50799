/// Authentication endpoints
///
/// This module provides session management endpoints:
/// - Registration
/// - Login
/// - Token refresh (with rotation)
/// - Logout
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user, returns a token pair
/// - `POST /auth/login` - Login and get a token pair
/// - `POST /auth/refresh` - Exchange a refresh token for a new pair
/// - `POST /auth/logout` - End the session
///
/// # Security
///
/// Access and refresh tokens are signed with separate secrets. The
/// refresh token is never persisted in plaintext: a SHA-256 digest of it
/// is hashed with argon2id and stored on the user row. Every successful
/// refresh overwrites that hash, so each refresh token works exactly
/// once and a reused (already-rotated) token is rejected with 403.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::{validation_error, OkResponse},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{
    auth::{
        jwt::{self, Claims},
        password, refresh,
    },
    models::user::{CreateUser, User, UserRole},
};
use uuid::Uuid;
use validator::Validate;

/// Message returned for every rejected refresh token
///
/// The same message is used whether the token was malformed, expired,
/// rotated or never issued.
const REFRESH_REJECTED: &str = "Refresh token is not valid";

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Password (stored as an argon2id hash)
    #[validate(length(min = 6, max = 200, message = "Password must be 6-200 characters"))]
    pub password: String,

    /// Role for the new user
    pub role: UserRole,
}

/// Login request
///
/// No `Validate` derive here: a too-short password is simply a wrong
/// password and must produce 401, not 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// User id
    pub id: Uuid,

    /// Password
    pub password: String,
}

/// Refresh / logout request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token issued by register, login or a previous refresh
    pub refresh_token: String,
}

/// Token pair returned by register, login and refresh
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    /// Access token (short-lived)
    pub access_token: String,

    /// Refresh token (long-lived, single use)
    pub refresh_token: String,
}

/// Signs a fresh access/refresh pair for the user
///
/// Returns the plaintext pair together with the argon2id hash of the
/// refresh token's SHA-256 digest. The caller decides how to store the
/// hash (unconditionally after register/login, compare-and-swap on
/// refresh).
async fn mint_token_pair(
    state: &AppState,
    user_id: Uuid,
    role: UserRole,
) -> ApiResult<(TokenPairResponse, String)> {
    let access_claims = Claims::access(user_id, role, state.access_ttl());
    let access_token = jwt::create_token(&access_claims, state.access_secret())?;

    let refresh_claims = Claims::refresh(user_id, role, state.refresh_ttl());
    let refresh_token = jwt::create_token(&refresh_claims, state.refresh_secret())?;

    let refresh_token_hash = refresh::hash_refresh_token(&refresh_token).await?;

    Ok((
        TokenPairResponse {
            access_token,
            refresh_token,
        },
        refresh_token_hash,
    ))
}

/// Register a new user
///
/// Creates a user with the given role and immediately starts a session.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "password": "StrongPassword123",
///   "role": "USER"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "accessToken": "eyJ...",
///   "refreshToken": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenPairResponse>)> {
    // Validate request
    req.validate().map_err(|e| validation_error(&e))?;

    // Hash password off the async runtime
    let password_hash = password::hash_password_async(req.password).await?;

    // Create user (no active session yet)
    let user = User::create(
        &state.db,
        CreateUser {
            password_hash,
            role: req.role,
            task_id: None,
        },
    )
    .await?;

    // Start the session
    let (pair, refresh_token_hash) = mint_token_pair(&state, user.id, user.role).await?;
    User::set_refresh_token_hash(&state.db, user.id, Some(&refresh_token_hash)).await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "Registered new user");

    Ok((StatusCode::CREATED, Json(pair)))
}

/// Login
///
/// Authenticates a user by id and password and starts a new session,
/// superseding any previous refresh token.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "id": "uuid",
///   "password": "StrongPassword123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "accessToken": "eyJ...",
///   "refreshToken": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown id or wrong password (same message for both)
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    // Look up user by id
    let user = User::find_by_id(&state.db, req.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    // Verify password
    let valid = password::verify_password_async(req.password, user.password_hash.clone()).await?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    // Start a fresh session
    let (pair, refresh_token_hash) = mint_token_pair(&state, user.id, user.role).await?;
    User::set_refresh_token_hash(&state.db, user.id, Some(&refresh_token_hash)).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(pair))
}

/// Token refresh with rotation
///
/// Exchanges a valid refresh token for a brand new access/refresh pair.
/// The presented token is invalidated in the same step: its stored hash
/// is replaced by the new token's hash with a compare-and-swap, so a
/// concurrent refresh with the same token loses the race and is
/// rejected like any other reuse.
///
/// # Endpoint
///
/// ```text
/// POST /auth/refresh
/// Content-Type: application/json
///
/// {
///   "refreshToken": "eyJ..."
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "accessToken": "eyJ...",
///   "refreshToken": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Invalid, expired, rotated or reused refresh token
/// - `500 Internal Server Error`: Server error
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    // Verify signature and expiry against the refresh secret
    let claims = jwt::validate_token(&req.refresh_token, state.refresh_secret())
        .map_err(|_| ApiError::Forbidden(REFRESH_REJECTED.to_string()))?;

    // The subject must still exist and still have an open session
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Forbidden(REFRESH_REJECTED.to_string()))?;

    let stored_hash = user
        .refresh_token_hash
        .as_deref()
        .ok_or_else(|| ApiError::Forbidden(REFRESH_REJECTED.to_string()))?;

    // Compare the token's digest against the stored slow hash
    let valid = refresh::verify_refresh_token(&req.refresh_token, stored_hash).await?;
    if !valid {
        tracing::warn!(user_id = %user.id, "Rejected reuse of a rotated refresh token");
        return Err(ApiError::Forbidden(REFRESH_REJECTED.to_string()));
    }

    // Rotate: mint the new pair, then swap the stored hash only if it
    // still matches the one we verified
    let (pair, next_hash) = mint_token_pair(&state, user.id, user.role).await?;
    let rotated =
        User::rotate_refresh_token_hash(&state.db, user.id, stored_hash, &next_hash).await?;
    if !rotated {
        tracing::warn!(user_id = %user.id, "Lost refresh rotation race");
        return Err(ApiError::Forbidden(REFRESH_REJECTED.to_string()));
    }

    Ok(Json(pair))
}

/// Logout
///
/// Verifies the refresh token's signature and expiry, then clears the
/// stored refresh-token hash. Rotation state is not checked: a stale
/// but well-formed token still ends the session. Logging out twice is
/// harmless.
///
/// # Endpoint
///
/// ```text
/// POST /auth/logout
/// Content-Type: application/json
///
/// {
///   "refreshToken": "eyJ..."
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "ok": true }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Malformed or expired refresh token
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> ApiResult<Json<OkResponse>> {
    let claims = jwt::validate_token(&req.refresh_token, state.refresh_secret())
        .map_err(|_| ApiError::Forbidden(REFRESH_REJECTED.to_string()))?;

    // Clearing the hash ends the session for any outstanding token
    User::set_refresh_token_hash(&state.db, claims.sub, None).await?;

    tracing::info!(user_id = %claims.sub, "User logged out");

    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_validation() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "password": "StrongPassword123",
            "role": "USER"
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let short: RegisterRequest = serde_json::from_value(json!({
            "password": "nope",
            "role": "AUTHOR"
        }))
        .unwrap();
        let errors = short.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let result = serde_json::from_value::<RegisterRequest>(json!({
            "password": "StrongPassword123",
            "role": "ADMIN"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_refresh_request_uses_camel_case() {
        let req: RefreshRequest = serde_json::from_value(json!({
            "refreshToken": "eyJ.abc.def"
        }))
        .unwrap();
        assert_eq!(req.refresh_token, "eyJ.abc.def");

        // Snake case is not accepted on the wire
        let result = serde_json::from_value::<RefreshRequest>(json!({
            "refresh_token": "eyJ.abc.def"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_token_pair_serializes_camel_case() {
        let pair = TokenPairResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert!(json.get("access_token").is_none());
    }

    #[test]
    fn test_login_request_requires_uuid_id() {
        let result = serde_json::from_value::<LoginRequest>(json!({
            "id": "not-a-uuid",
            "password": "whatever"
        }));
        assert!(result.is_err());
    }
}
