/// Refresh token storage hashing
///
/// Refresh tokens are JWTs, but the server never stores them verbatim.
/// Each user row holds at most one refresh token hash; presenting a
/// refresh token means proving it matches that hash, and rotation
/// replaces it.
///
/// # Storage scheme
///
/// - **Digest**: SHA-256 over the raw token, hex-encoded. JWTs can
///   exceed Argon2's practical input size and the digest gives a
///   fixed-length input.
/// - **Hash**: Argon2id over the digest, stored as a PHC string.
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::refresh::refresh_token_digest;
///
/// let digest = refresh_token_digest("some.jwt.token");
/// assert_eq!(digest.len(), 64); // SHA-256 hex is 64 chars
///
/// // Same input = same digest (deterministic)
/// assert_eq!(digest, refresh_token_digest("some.jwt.token"));
/// ```

use sha2::{Digest, Sha256};

use super::password::{self, PasswordError};

/// Digests a refresh token with SHA-256
///
/// # Returns
///
/// Hex-encoded SHA-256 digest (64 characters)
pub fn refresh_token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hashes a refresh token for storage
///
/// Runs the Argon2id step on the blocking thread pool.
pub async fn hash_refresh_token(token: &str) -> Result<String, PasswordError> {
    password::hash_password_async(refresh_token_digest(token)).await
}

/// Verifies a presented refresh token against a stored hash
///
/// # Returns
///
/// `Ok(true)` if the token matches the stored hash, `Ok(false)` if it
/// does not (including tokens that were already rotated away)
pub async fn verify_refresh_token(token: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    password::verify_password_async(refresh_token_digest(token), stored_hash.to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_hex_and_deterministic() {
        let digest = refresh_token_digest("header.payload.signature");

        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, refresh_token_digest("header.payload.signature"));
    }

    #[test]
    fn test_different_tokens_different_digests() {
        let first = refresh_token_digest("token-one");
        let second = refresh_token_digest("token-two");

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_hash_and_verify_roundtrip() {
        let token = "eyJ.fake-but-long-enough-to-look-like-a-jwt.sig";

        let stored = hash_refresh_token(token).await.expect("Hash should succeed");
        assert!(stored.starts_with("$argon2id$"));

        let matched = verify_refresh_token(token, &stored)
            .await
            .expect("Verify should succeed");
        assert!(matched);
    }

    #[tokio::test]
    async fn test_rotated_token_no_longer_matches() {
        let old_token = "old.refresh.token";
        let new_token = "new.refresh.token";

        // Rotation stores the hash of the new token; the old one must
        // stop verifying.
        let stored = hash_refresh_token(new_token).await.expect("Hash should succeed");

        let old_matches = verify_refresh_token(old_token, &stored)
            .await
            .expect("Verify should succeed");
        assert!(!old_matches);
    }

    #[tokio::test]
    async fn test_verify_against_garbage_hash_errors() {
        let result = verify_refresh_token("token", "not-a-phc-string").await;
        assert!(result.is_err());
    }
}
