use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    routing::post,
    Json, Router,
};

use edudesk_auth::DecodedToken;
use edudesk_school::{LoginInput, UserInput};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Gated user routes. `login` is mounted on the public router.
pub fn router() -> Router {
    Router::new().route("/createUser", post(create_user))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_body(e),
    };
    match services.managers.users.create_user(&caller, &input).await {
        Ok(created) => dto::ok_flat(created),
        Err(e) => errors::manager_error_to_response("user.createUser", e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_body(e),
    };
    match services.managers.users.login(&input).await {
        Ok(session) => dto::ok_flat(session),
        Err(e) => errors::manager_error_to_response("user.login", e),
    }
}
