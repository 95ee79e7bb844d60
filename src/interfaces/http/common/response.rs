//! Response envelope and domain error mapping

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response wrapper
///
/// Every REST endpoint returns its payload inside this envelope.
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler's return type
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Map a domain error onto its HTTP status.
pub fn domain_error(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Inactive { .. } => StatusCode::CONFLICT,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_omits_error_field() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn error_has_null_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "data": null, "error": "boom"})
        );
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let (status, _) = domain_error(DomainError::not_found("Plan", "x"));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = domain_error(DomainError::Validation("bad".into()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, Json(body)) = domain_error(DomainError::Inactive {
            entity: "Plugin",
            id: "sms".into(),
        });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body.error.as_deref(),
            Some("Plugin sms is not available for new subscriptions")
        );
    }
}
