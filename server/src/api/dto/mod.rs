//! Shared HTTP response shapes and the service-to-HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::modules::error::ServiceError;

/// Paginated list envelope.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub count: u64,
    pub results: Vec<T>,
}

/// Single HTTP error type for all handlers. Built from `ServiceError`
/// so the status mapping lives in exactly one place.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(fields) => {
                let mut body = serde_json::Map::new();
                for field in fields {
                    if let Some(messages) = body
                        .entry(field.field)
                        .or_insert_with(|| json!([]))
                        .as_array_mut()
                    {
                        messages.push(json!(field.message));
                    }
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    body: serde_json::Value::Object(body),
                }
            }
            ServiceError::NotFound(what) => ApiError {
                status: StatusCode::NOT_FOUND,
                body: json!({ "detail": format!("{what} not found") }),
            },
            // 403 for anonymous callers, matching the legacy contract.
            ServiceError::Authentication => ApiError {
                status: StatusCode::FORBIDDEN,
                body: json!({ "detail": "Authentication credentials were not provided." }),
            },
            ServiceError::Permission(detail) => ApiError {
                status: StatusCode::FORBIDDEN,
                body: json!({ "detail": detail }),
            },
            ServiceError::Conflict(detail) => ApiError {
                status: StatusCode::CONFLICT,
                body: json!({ "detail": detail }),
            },
            ServiceError::Media(detail) => {
                error!(detail = %detail, "media storage failure");
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: json!({ "detail": "media storage failed" }),
                }
            }
            ServiceError::Database(err) => {
                error!(error = %err, "database failure");
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: json!({ "detail": "internal server error" }),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_mutations_map_to_forbidden() {
        let err: ApiError = ServiceError::Authentication.into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn validation_groups_messages_by_field() {
        let err: ApiError = ServiceError::Validation(vec![
            crate::modules::error::FieldError {
                field: "title".to_string(),
                message: "required".to_string(),
            },
            crate::modules::error::FieldError {
                field: "title".to_string(),
                message: "too long".to_string(),
            },
        ])
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body["title"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn conflicts_map_to_409() {
        let err: ApiError = ServiceError::Conflict("duplicate".to_string()).into();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }
}
