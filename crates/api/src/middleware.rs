use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::{HeaderMap, Request},
    body::Body,
    middleware::Next,
    response::Response,
};

use crate::app::errors;
use crate::authz::RequestGate;

/// Header carrying the long token.
pub const TOKEN_HEADER: &str = "token";

#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<RequestGate>,
}

/// Gate every `/api/{module}/{operation}` request; on success the decoded
/// token is inserted as a request extension for the handler.
pub async fn gate_middleware(
    State(state): State<GateState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let (resource, action) = route_segments(&path);

    match state.gate.admit(extract_token(req.headers()), resource, action) {
        Ok(decoded) => {
            req.extensions_mut().insert(decoded);
            next.run(req).await
        }
        Err(denial) => errors::gate_denied(denial.message),
    }
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(TOKEN_HEADER)?.to_str().ok()
}

/// `(module, operation)` of an `/api/{module}/{operation}` path. Missing
/// segments come back empty, which the evaluator refuses.
fn route_segments(path: &str) -> (&str, &str) {
    let mut segments = path.trim_start_matches('/').split('/');
    if segments.next() != Some("api") {
        return ("", "");
    }
    let module = segments.next().unwrap_or_default();
    let operation = segments.next().unwrap_or_default();
    (module, operation)
}
