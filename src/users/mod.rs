//! Users storage module.
//!
//! This module handles:
//! - User types
//! - The gateway trait and the driver-unavailable gateway
//! - The PostgreSQL gateway (behind the `postgres` feature)
//! - Mock gateway for testing

pub mod gateway;
pub mod mock;
#[cfg(feature = "postgres")]
pub mod postgres_gateway;
pub mod types;

pub use gateway::{SharedGateway, UnavailableGateway, UserGateway};
pub use mock::{MockConfig, MockUserGateway};
#[cfg(feature = "postgres")]
pub use postgres_gateway::PostgresGateway;
pub use types::{CreatedUser, User};
