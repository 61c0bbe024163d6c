/**
 * Error Conversion
 *
 * `IntoResponse` for `ApiError`, so handlers can return the error directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Not authorized to view this project",
 *   "kind": "forbidden",
 *   "status": 403
 * }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Infrastructure failures carry detail we do not want on the wire.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error serving request: {self}");
        }

        let body = serde_json::json!({
            "error": self.public_message(),
            "kind": self.kind(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_status() {
        let response = ApiError::forbidden("denied").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_response_is_json() {
        let response = ApiError::NotFound("Comment").into_response();
        let content_type = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"));
    }
}
