use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use edudesk_infra::ManagerError;

/// Manager-style error body: `{error, status, ok:false}`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "status": status.as_u16(),
            "ok": false,
        })),
    )
        .into_response()
}

/// Request-gate refusal: always 401 `{ok:false, code:401, errors}`.
pub fn gate_denied(message: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        axum::Json(json!({
            "ok": false,
            "code": 401,
            "errors": message.into(),
        })),
    )
        .into_response()
}

pub fn manager_error_to_response(operation: &'static str, err: ManagerError) -> axum::response::Response {
    if err.is_internal() {
        tracing::error!(operation, error = %err, "operation failed");
    } else {
        tracing::debug!(operation, error = %err, "operation refused");
    }
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_error(status, err.public_message())
}

/// Malformed JSON bodies are reported like validation failures.
pub fn invalid_body(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

pub fn invalid_query(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}
