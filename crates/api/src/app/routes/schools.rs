use std::sync::Arc;

use axum::{
    extract::{
        Extension, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{delete, get, post, put},
    Json, Router,
};

use edudesk_auth::DecodedToken;
use edudesk_school::SchoolInput;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/create", post(create))
        .route("/update", put(update))
        .route("/delete", delete(remove))
        .route("/getByID", get(get_by_id))
        .route("/getAll", get(get_all))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
    body: Result<Json<SchoolInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_body(e),
    };
    match services.managers.schools.create(&caller, &input).await {
        Ok(school) => dto::ok_response("school", school),
        Err(e) => errors::manager_error_to_response("school.create", e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
    body: Result<Json<SchoolInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_body(e),
    };
    match services.managers.schools.update(&caller, &input).await {
        Ok(school) => dto::ok_response("school", school),
        Err(e) => errors::manager_error_to_response("school.update", e),
    }
}

/// The id comes from `?id=` or, failing that, a `{"id": ...}` body.
pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
    query: Result<Query<dto::IdQuery>, QueryRejection>,
    body: Option<Json<dto::IdQuery>>,
) -> axum::response::Response {
    let id = match dto::requested_id(query) {
        Ok(id) => id.or_else(|| body.and_then(|Json(b)| b.id)),
        Err(response) => return response,
    };
    match services.managers.schools.delete(&caller, id.as_deref()).await {
        Ok(school) => dto::ok_response("school", school),
        Err(e) => errors::manager_error_to_response("school.delete", e),
    }
}

pub async fn get_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
    query: Result<Query<dto::IdQuery>, QueryRejection>,
) -> axum::response::Response {
    let id = match dto::requested_id(query) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.managers.schools.get_by_id(&caller, id.as_deref()).await {
        Ok(school) => dto::ok_response("school", school),
        Err(e) => errors::manager_error_to_response("school.getByID", e),
    }
}

pub async fn get_all(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
) -> axum::response::Response {
    match services.managers.schools.get_all(&caller).await {
        Ok(schools) => dto::ok_response("schools", schools),
        Err(e) => errors::manager_error_to_response("school.getAll", e),
    }
}
