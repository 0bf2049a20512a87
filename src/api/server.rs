//! HTTP listener.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

/// Serve `router` on `listener` until `shutdown` resolves.
///
/// In-flight requests are dropped when `shutdown` fires; connections are not
/// drained.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let addr = listener.local_addr()?;
    info!("HTTP server listening on {}", addr);

    let server = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .into_future();

    tokio::select! {
        result = server => result,
        () = shutdown => {
            info!("Stopping HTTP server");
            Ok(())
        }
    }
}
