//! HTTP API: server, routing, the request gate and request/response mapping.

pub mod app;
pub mod authz;
pub mod config;
pub mod middleware;
