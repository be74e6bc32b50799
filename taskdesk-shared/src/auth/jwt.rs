/// JWT token generation and validation module
///
/// This module provides JWT (JSON Web Token) functionality for user
/// authentication. Tokens are signed using HS256 (HMAC-SHA256) and carry
/// the user's identity and role.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Configured by the caller (the API defaults to 15
///   minutes for access tokens and 7 days for refresh tokens)
/// - **Validation**: Signature, expiration, not-before, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Token Types
///
/// Access and refresh tokens share one claims layout and are told apart
/// by the secret they are signed with: a token signed with the access
/// secret never validates against the refresh secret, and vice versa.
/// Refresh tokens additionally carry a `jti` so that every issued
/// refresh token is unique even when two are minted in the same second.
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskdesk_shared::models::user::UserRole;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// // Create access token
/// let claims = Claims::access(user_id, UserRole::User, Duration::minutes(15));
/// let token = create_token(&claims, "your-secret-key")?;
///
/// // Validate token
/// let validated_claims = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated_claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Issuer embedded in every token and enforced during validation
pub const ISSUER: &str = "taskdesk";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}, got {actual}")]
    InvalidIssuer { expected: String, actual: String },
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "taskdesk")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
/// - `jti`: Token ID, present on refresh tokens only
///
/// # Custom Claims
///
/// - `role`: Role the user held when the token was issued
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Role claim
    pub role: UserRole,

    /// Issuer - Always "taskdesk"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token ID, set for refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Uuid>,
}

impl Claims {
    /// Creates claims for an access token
    ///
    /// # Example
    ///
    /// ```
    /// use taskdesk_shared::auth::jwt::Claims;
    /// use taskdesk_shared::models::user::UserRole;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::access(Uuid::new_v4(), UserRole::User, Duration::minutes(15));
    /// assert!(claims.jti.is_none());
    /// ```
    pub fn access(user_id: Uuid, role: UserRole, expires_in: Duration) -> Self {
        Self::new(user_id, role, expires_in, None)
    }

    /// Creates claims for a refresh token with a fresh `jti`
    ///
    /// # Example
    ///
    /// ```
    /// use taskdesk_shared::auth::jwt::Claims;
    /// use taskdesk_shared::models::user::UserRole;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::refresh(Uuid::new_v4(), UserRole::User, Duration::days(7));
    /// assert!(claims.jti.is_some());
    /// ```
    pub fn refresh(user_id: Uuid, role: UserRole, expires_in: Duration) -> Self {
        Self::new(user_id, role, expires_in, Some(Uuid::new_v4()))
    }

    fn new(user_id: Uuid, role: UserRole, expires_in: Duration, jti: Option<Uuid>) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            jti,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 (HMAC-SHA256) with the provided secret.
/// The secret decides what kind of token this is: sign with the access
/// secret for access tokens and the refresh secret for refresh tokens.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid for the given secret
/// - Token hasn't expired
/// - Issuer is "taskdesk"
/// - Token is not used before nbf time
///
/// # Errors
///
/// Returns error if:
/// - Signature is invalid
/// - Token has expired
/// - Issuer doesn't match
/// - Token format is invalid
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
                expected: ISSUER.to_string(),
                actual: "unknown".to_string(),
            },
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                JwtError::InvalidFormat(format!("Token is not a valid JWT: {}", e))
            }
            _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();

        let claims = Claims::access(user_id, UserRole::User, Duration::minutes(15));

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.iss, "taskdesk");
        assert!(claims.jti.is_none());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_claims_carry_unique_jti() {
        let user_id = Uuid::new_v4();

        let first = Claims::refresh(user_id, UserRole::Author, Duration::days(7));
        let second = Claims::refresh(user_id, UserRole::Author, Duration::days(7));

        assert!(first.jti.is_some());
        assert!(second.jti.is_some());
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_time_until_expiration() {
        let claims = Claims::access(Uuid::new_v4(), UserRole::User, Duration::hours(1));

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500); // ~1 hour minus a bit
        assert!(time_left.num_seconds() <= 3600); // <= 1 hour
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::access(user_id, UserRole::Author, Duration::minutes(15));
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.role, UserRole::Author);
        assert_eq!(validated.iss, "taskdesk");
        assert!(validated.jti.is_none());
    }

    #[test]
    fn test_refresh_token_roundtrip_keeps_jti() {
        let secret = "refresh-secret-key-at-least-32-bytes!!";

        let claims = Claims::refresh(Uuid::new_v4(), UserRole::User, Duration::days(7));
        let token = create_token(&claims, secret).unwrap();

        let validated = validate_token(&token, secret).unwrap();
        assert_eq!(validated.jti, claims.jti);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::access(Uuid::new_v4(), UserRole::User, Duration::minutes(15));
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_cross_secret_validation_fails() {
        let access_secret = "access-secret-for-testing-purposes-1234";
        let refresh_secret = "refresh-secret-for-testing-purposes-567";

        // A refresh token must not pass validation against the access
        // secret, and vice versa.
        let refresh_claims = Claims::refresh(Uuid::new_v4(), UserRole::User, Duration::days(7));
        let refresh_token = create_token(&refresh_claims, refresh_secret).unwrap();
        assert!(validate_token(&refresh_token, access_secret).is_err());

        let access_claims = Claims::access(Uuid::new_v4(), UserRole::User, Duration::minutes(15));
        let access_token = create_token(&access_claims, access_secret).unwrap();
        assert!(validate_token(&access_token, refresh_secret).is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret";

        // Create token that expired 1 hour ago
        let claims = Claims::access(
            Uuid::new_v4(),
            UserRole::User,
            Duration::seconds(-3600), // Negative duration = already expired
        );

        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_issuer_is_enforced() {
        let secret = "test-secret";
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: Uuid::new_v4(),
            role: UserRole::User,
            iss: "someone-else".to_string(),
            iat: now,
            exp: now + 900,
            nbf: now,
            jti: None,
        };

        let token = create_token(&claims, secret).unwrap();
        let result = validate_token(&token, secret);

        assert!(matches!(result.unwrap_err(), JwtError::InvalidIssuer { .. }));
    }

    #[test]
    fn test_garbage_token_is_invalid_format() {
        let result = validate_token("not-a-valid-jwt", "test-secret");
        assert!(matches!(result.unwrap_err(), JwtError::InvalidFormat(_)));
    }
}
