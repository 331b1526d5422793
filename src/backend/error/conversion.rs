/**
 * Error Conversion
 *
 * All resource errors implement `IntoResponse` from Axum, so handlers can
 * return them directly. Error responses are JSON objects carrying the status
 * code and a message:
 *
 * ```json
 * { "code": 403, "message": "Permission denied." }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::ResourceError;

/// JSON body for an error status
pub fn error_body(status: StatusCode, message: &str) -> serde_json::Value {
    serde_json::json!({
        "code": status.as_u16(),
        "message": message,
    })
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(error_body(status, self.message()))).into_response()
    }
}
