//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store, managers, token and credential wiring, seeding
//! - `routes/`: HTTP routes + handlers (one file per module)
//! - `dto.rs`: query DTOs and response envelope helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get, routing::post};
use thiserror::Error;
use tower::ServiceBuilder;

use edudesk_auth::TableError;
use edudesk_infra::ManagerError;

use crate::authz::RequestGate;
use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid permission table: {0}")]
    Table(#[from] TableError),

    #[error("seeding failed: {0}")]
    Seed(#[from] ManagerError),
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, BuildError> {
    let wiring = services::build_services(config)?;
    if let Some(outcome) = services::seed(config, &wiring).await? {
        tracing::debug!(?outcome, "super admin seed checked");
    }

    let gate = Arc::new(RequestGate::new(wiring.tokens.clone(), wiring.table.clone()));
    let gate_state = middleware::GateState { gate };
    let services = Arc::new(wiring.services);

    // Gated routes: every request passes the request gate first.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            gate_state,
            middleware::gate_middleware,
        ));

    // Login is how a caller obtains a token, so it cannot require one.
    let public = Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/user/login", post(routes::users::login))
        .layer(Extension(services));

    Ok(Router::new()
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new()))
}
