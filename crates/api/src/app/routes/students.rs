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
use edudesk_school::StudentInput;

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
    body: Result<Json<StudentInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_body(e),
    };
    match services.managers.students.create(&caller, &input).await {
        Ok(student) => dto::ok_response("student", student),
        Err(e) => errors::manager_error_to_response("student.create", e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
    body: Result<Json<StudentInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_body(e),
    };
    match services.managers.students.update(&caller, &input).await {
        Ok(student) => dto::ok_response("student", student),
        Err(e) => errors::manager_error_to_response("student.update", e),
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
    match services.managers.students.delete(&caller, id.as_deref()).await {
        Ok(student) => dto::ok_response("student", student),
        Err(e) => errors::manager_error_to_response("student.delete", e),
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
    match services.managers.students.get_by_id(&caller, id.as_deref()).await {
        Ok(student) => dto::ok_response("student", student),
        Err(e) => errors::manager_error_to_response("student.getByID", e),
    }
}

pub async fn get_all(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<DecodedToken>,
) -> axum::response::Response {
    match services.managers.students.get_all(&caller).await {
        Ok(students) => dto::ok_response("students", students),
        Err(e) => errors::manager_error_to_response("student.getAll", e),
    }
}
