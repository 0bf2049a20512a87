//! HTTP API module: health probes and the users endpoints.

pub mod access_log;
pub mod handlers;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use routes::create_router;
pub use server::serve;
