/// Authentication middleware building blocks
///
/// The API installs its own axum layer around protected routes; this
/// module provides the pieces that layer is built from: bearer header
/// extraction and the per-request identity that handlers read back out
/// of request extensions.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::user::UserRole;

/// Authenticated caller identity
///
/// Inserted into request extensions by the auth layer after the access
/// token validates; handlers take it with axum's `Extension` extractor.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID from the token's `sub` claim
    pub user_id: Uuid,

    /// Role from the token's `role` claim
    pub role: UserRole,
}

impl AuthContext {
    /// Builds the context from validated claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

/// Error type for credential extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header on the request
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header format")]
    InvalidFormat,
}

/// Extracts the bearer token from the authorization header
///
/// # Returns
///
/// The token with the `Bearer ` prefix stripped
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?;

    let value = value.to_str().map_err(|_| AuthError::InvalidFormat)?;

    value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;

    #[test]
    fn test_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::access(user_id, UserRole::Author, Duration::minutes(15));

        let auth = AuthContext::from_claims(&claims);

        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.role, UserRole::Author);
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();

        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));

        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::InvalidFormat)));
    }
}
