/// Authorization helpers and permission checks
///
/// This module provides the two access checks TaskDesk applies after
/// authentication:
///
/// 1. **Role gate**: some operations are open only to certain roles
///    (tasks are created by `USER` accounts, comments by `AUTHOR`
///    accounts). The role travels inside the access token, so the check
///    needs no database round trip.
/// 2. **Ownership gate**: mutating an existing resource requires being
///    the user who created it.
///
/// The gates compose: a handler may apply the role gate at creation and
/// the ownership gate on update/delete, or either alone.
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::auth::authorization::{require_ownership, require_role};
/// use taskdesk_shared::auth::middleware::AuthContext;
/// use taskdesk_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// fn check_permissions(auth: &AuthContext, task_owner_id: Uuid) -> Result<(), String> {
///     // Only USER accounts may create tasks
///     require_role(auth, &[UserRole::User]).map_err(|e| e.to_string())?;
///
///     // Only the owner may change this task
///     require_ownership(auth, task_owner_id).map_err(|e| e.to_string())?;
///
///     Ok(())
/// }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is not in the allowed set
    #[error("Role {actual:?} may not perform this action")]
    RoleNotAllowed {
        /// Role the caller actually holds
        actual: UserRole,
    },

    /// Caller doesn't own the resource
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Checks that the caller holds one of the allowed roles
///
/// # Returns
///
/// `Ok(())` if the caller's role is in `allowed`, error otherwise
///
/// # Example
///
/// ```
/// # use taskdesk_shared::auth::authorization::require_role;
/// # use taskdesk_shared::auth::middleware::AuthContext;
/// # use taskdesk_shared::models::user::UserRole;
/// # use uuid::Uuid;
/// let auth = AuthContext { user_id: Uuid::new_v4(), role: UserRole::Author };
///
/// assert!(require_role(&auth, &[UserRole::Author]).is_ok());
/// assert!(require_role(&auth, &[UserRole::User]).is_err());
/// ```
pub fn require_role(auth: &AuthContext, allowed: &[UserRole]) -> Result<(), AuthzError> {
    if !allowed.contains(&auth.role) {
        return Err(AuthzError::RoleNotAllowed { actual: auth.role });
    }

    Ok(())
}

/// Checks if the caller owns a resource
///
/// Verifies that the resource's owner id matches the authenticated user.
///
/// # Example
///
/// ```no_run
/// # use taskdesk_shared::auth::authorization::require_ownership;
/// # use taskdesk_shared::auth::middleware::AuthContext;
/// # use uuid::Uuid;
/// # fn example(auth: AuthContext, task_owner_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// require_ownership(&auth, task_owner_id)?;
/// # Ok(())
/// # }
/// ```
pub fn require_ownership(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id != resource_owner_id {
        return Err(AuthzError::NotAuthorized);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_with_role(role: UserRole) -> AuthContext {
        AuthContext { user_id: Uuid::new_v4(), role }
    }

    #[test]
    fn test_require_role_allows_listed_roles() {
        let auth = auth_with_role(UserRole::User);

        assert!(require_role(&auth, &[UserRole::User]).is_ok());
        assert!(require_role(&auth, &[UserRole::User, UserRole::Author]).is_ok());
    }

    #[test]
    fn test_require_role_rejects_other_roles() {
        let auth = auth_with_role(UserRole::Author);

        let result = require_role(&auth, &[UserRole::User]);
        assert!(matches!(
            result,
            Err(AuthzError::RoleNotAllowed { actual: UserRole::Author })
        ));
    }

    #[test]
    fn test_require_ownership() {
        let user_id = Uuid::new_v4();
        let auth = AuthContext { user_id, role: UserRole::User };

        // Same user
        assert!(require_ownership(&auth, user_id).is_ok());

        // Different user
        assert!(require_ownership(&auth, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::RoleNotAllowed { actual: UserRole::Author };
        assert!(err.to_string().contains("Author"));

        let err = AuthzError::NotAuthorized;
        assert!(err.to_string().contains("Not authorized"));
    }
}
