use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;

// -------------------------
// Request DTOs
// -------------------------

/// `?id=` on delete and getByID. School delete also accepts it as a body.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// The `id` a delete or getByID request names, or the error response for an
/// unreadable query string.
pub fn requested_id(query: Result<Query<IdQuery>, QueryRejection>) -> Result<Option<String>, axum::response::Response> {
    match query {
        Ok(Query(q)) => Ok(q.id),
        Err(e) => Err(crate::app::errors::invalid_query(e)),
    }
}

// -------------------------
// Response mapping helpers
// -------------------------

/// Success body: `{ok:true, code, data:{<key>: <value>}}`.
pub fn ok_response(key: &'static str, value: impl serde::Serialize) -> axum::response::Response {
    let data = match serde_json::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, key, "failed to serialize response");
            return crate::app::errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };
    (
        StatusCode::OK,
        axum::Json(json!({
            "ok": true,
            "code": 200,
            "data": { (key): data },
        })),
    )
        .into_response()
}

/// Same as [`ok_response`] but with the value's fields as `data` itself.
pub fn ok_flat(value: impl serde::Serialize) -> axum::response::Response {
    match serde_json::to_value(value) {
        Ok(data) => (
            StatusCode::OK,
            axum::Json(json!({ "ok": true, "code": 200, "data": data })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            crate::app::errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}
