//! HTTP API route definitions.

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::access_log::{access_log, RequestSpan};
use super::handlers::{create_user, list_users, probe, unmatched, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health probes
        .route("/startup", get(probe).fallback(unmatched))
        .route("/liveness", get(probe).fallback(unmatched))
        .route("/readiness", get(probe).fallback(unmatched))
        // Users
        // Users. Bodies are read whole, however large.
        .route(
            "/users",
            get(list_users)
                .post(create_user)
                .fallback(unmatched)
                .layer(DefaultBodyLimit::disable()),
        )
        .fallback(unmatched)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
                .layer(middleware::from_fn(access_log))
                .layer(middleware::from_fn(exact_target)),
        )
}

/// Routes match the whole request target, so a target carrying a query
/// string (even an empty `?`) matches none of them.
async fn exact_target(request: Request, next: Next) -> Response {
    if request.uri().query().is_some() {
        return unmatched(request.method().clone()).await;
    }
    next.run(request).await
}
