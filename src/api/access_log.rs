//! Per-request access logging.
//!
//! Every request gets a `request` span carrying the client address and the
//! request line, and one `info` line once the response is ready.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_http::trace::MakeSpan;
use tracing::{info, info_span, Span};

use crate::metrics;

/// Client address recorded by `into_make_service_with_connect_info`,
/// or `-` when the request did not come through a listener.
pub fn client_addr<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Span factory for `TraceLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        info_span!(
            "request",
            client = %client_addr(request),
            method = %request.method(),
            uri = %request.uri(),
        )
    }
}

/// Log the request line, client and outcome of every request.
pub async fn access_log(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let client = client_addr(&request);
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();
    info!(
        client = %client,
        status,
        latency_ms = latency.as_millis() as u64,
        "\"{} {} {:?}\" {}",
        method,
        uri,
        version,
        status
    );
    metrics::record_http_request(method.as_str(), status, latency);

    response
}
