/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, logout)
/// - `users`: User management endpoints
/// - `tasks`: Task CRUD endpoints
/// - `comments`: Comment CRUD endpoints

use crate::error::{ApiError, ValidationErrorDetail};
use serde::Serialize;

pub mod auth;
pub mod comments;
pub mod health;
pub mod tasks;
pub mod users;

/// Body returned by deletes and logout
#[derive(Debug, Serialize)]
pub struct OkResponse {
    /// Always true on success
    pub ok: bool,
}

/// Maps `validator` errors into the per-field API error shape
pub(crate) fn validation_error(errors: &validator::ValidationErrors) -> ApiError {
    let details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    #[test]
    fn test_validation_error_carries_field_detail() {
        let probe = Probe {
            password: "nope".to_string(),
        };

        let err = validation_error(&probe.validate().unwrap_err());
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "password");
                assert_eq!(details[0].message, "Password must be at least 6 characters");
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_ok_response_shape() {
        let json = serde_json::to_value(OkResponse { ok: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "ok": true }));
    }
}
