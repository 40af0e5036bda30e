use axum::Router;

pub mod classrooms;
pub mod schools;
pub mod students;
pub mod system;
pub mod users;

/// Router for all gated `/api/{module}/{operation}` endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/api/school", schools::router())
        .nest("/api/classroom", classrooms::router())
        .nest("/api/student", students::router())
        .nest("/api/user", users::router())
}
