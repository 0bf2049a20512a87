//! Health probes and a small users API backed by PostgreSQL.
//!
//! # Routes
//!
//! ```text
//! GET  /startup | /liveness | /readiness   200 "OK"
//! GET  /users                              200 {"users": [...]} or {"error": ...}
//! POST /users   {"name": "Ana"}            201 {"message", "id", "name"} or {"error": ...}
//! GET  anything else                       200 greeting page
//! POST anything else                       404
//! ```
//!
//! Database failures never change the status code; callers have to look
//! for the `error` key.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`users`]: User types and database gateways
//! - [`api`]: HTTP routes, handlers and access log
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod users;
pub mod utils;

pub use config::Config;
pub use error::{GatewayError, Result, ServiceError};
