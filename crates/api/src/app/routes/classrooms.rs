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
use edudesk_school::ClassroomInput;

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
    body: Result<Json<ClassroomInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_body(e),
    };
    match services.managers.classrooms.create(&caller, &input).await {
        Ok(classroom) => dto::ok_response("classroom", classroom),
        Err(e) => errors::manager_error_to_response("classroom.create", e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
    body: Result<Json<ClassroomInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_body(e),
    };
    match services.managers.classrooms.update(&caller, &input).await {
        Ok(classroom) => dto::ok_response("classroom", classroom),
        Err(e) => errors::manager_error_to_response("classroom.update", e),
    }
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
    query: Result<Query<dto::IdQuery>, QueryRejection>,
) -> axum::response::Response {
    let id = match dto::requested_id(query) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.managers.classrooms.delete(&caller, id.as_deref()).await {
        Ok(classroom) => dto::ok_response("classroom", classroom),
        Err(e) => errors::manager_error_to_response("classroom.delete", e),
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
    match services.managers.classrooms.get_by_id(&caller, id.as_deref()).await {
        Ok(classroom) => dto::ok_response("classroom", classroom),
        Err(e) => errors::manager_error_to_response("classroom.getByID", e),
    }
}

pub async fn get_all(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
) -> axum::response::Response {
    match services.managers.classrooms.get_all(&caller).await {
        Ok(classrooms) => dto::ok_response("classrooms", classrooms),
        Err(e) => errors::manager_error_to_response("classroom.getAll", e),
    }
}
