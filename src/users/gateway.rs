//! Database gateway: the only path from the handlers to storage.
//!
//! Gateways are synchronous. Each operation opens its own connection and
//! closes it before returning, so the async wrappers at the bottom of this
//! module move the call onto a blocking thread.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::DatabaseSettings;
use crate::error::GatewayError;
use crate::metrics;

use super::types::{CreatedUser, User};

/// Storage operations on the `users` table.
pub trait UserGateway: Send + Sync {
    /// Read every user, in the order the store yields them.
    fn list_users(&self) -> Result<Vec<User>, GatewayError>;

    /// Insert a user and return the identifier the store assigned.
    fn create_user(&self, name: &str) -> Result<CreatedUser, GatewayError>;
}

/// Gateway shared between requests.
pub type SharedGateway = Arc<dyn UserGateway>;

/// Gateway used when the crate is built without the PostgreSQL driver.
///
/// Every operation fails with [`GatewayError::DriverUnavailable`] without
/// touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGateway;

impl UserGateway for UnavailableGateway {
    fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        Err(GatewayError::DriverUnavailable)
    }

    fn create_user(&self, _name: &str) -> Result<CreatedUser, GatewayError> {
        Err(GatewayError::DriverUnavailable)
    }
}

/// Whether this build carries the PostgreSQL driver.
pub const fn driver_available() -> bool {
    cfg!(feature = "postgres")
}

/// Pick the gateway for this build.
#[cfg(feature = "postgres")]
pub fn connect(settings: &DatabaseSettings) -> SharedGateway {
    debug!(target_db = %settings, "Using PostgreSQL gateway");
    Arc::new(super::postgres_gateway::PostgresGateway::new(settings))
}

/// Pick the gateway for this build.
#[cfg(not(feature = "postgres"))]
pub fn connect(settings: &DatabaseSettings) -> SharedGateway {
    warn!(
        target_db = %settings,
        "PostgreSQL driver not compiled in; database operations will fail"
    );
    Arc::new(UnavailableGateway)
}

/// Run [`UserGateway::list_users`] on a blocking thread.
pub async fn list_users(gateway: SharedGateway) -> Result<Vec<User>, GatewayError> {
    let _timer = metrics::timer_db("list_users");
    let result = tokio::task::spawn_blocking(move || gateway.list_users())
        .await
        .map_err(GatewayError::from)
        .and_then(|inner| inner);

    match &result {
        Ok(users) => debug!(count = users.len(), "Listed users"),
        Err(e) => {
            metrics::inc_db_failures("list_users", e.kind());
            warn!(kind = e.kind(), "Failed to list users: {}", e);
        }
    }
    result
}

/// Run [`UserGateway::create_user`] on a blocking thread.
pub async fn create_user(
    gateway: SharedGateway,
    name: String,
) -> Result<CreatedUser, GatewayError> {
    let _timer = metrics::timer_db("create_user");
    let result = tokio::task::spawn_blocking(move || gateway.create_user(&name))
        .await
        .map_err(GatewayError::from)
        .and_then(|inner| inner);

    match &result {
        Ok(created) => debug!(id = created.id, "Created user"),
        Err(e) => {
            metrics::inc_db_failures("create_user", e.kind());
            warn!(kind = e.kind(), "Failed to create user: {}", e);
        }
    }
    result
}
