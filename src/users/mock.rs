//! Mock user gateway for unit testing.
//!
//! This module provides an in-memory gateway that can be used in tests
//! without a running database.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::GatewayError;

use super::gateway::UserGateway;
use super::types::{CreatedUser, User};

/// Configuration for mock gateway behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail list requests.
    pub fail_list: bool,
    /// Whether to fail inserts.
    pub fail_create: bool,
}

/// In-memory user gateway.
///
/// Clones share the same storage, so a test can keep a handle while the
/// router owns another.
#[derive(Debug, Clone)]
pub struct MockUserGateway {
    /// Mock configuration.
    config: MockConfig,
    /// Stored users, in insertion order.
    users: Arc<Mutex<Vec<User>>>,
    /// Next identifier to hand out.
    next_id: Arc<AtomicI64>,
}

impl MockUserGateway {
    /// Create a new mock gateway with default configuration.
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// Create a mock gateway with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            users: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Create a gateway that fails every operation with a connection error.
    pub fn failing() -> Self {
        Self::with_config(MockConfig {
            fail_list: true,
            fail_create: true,
        })
    }

    /// Add a stored user directly, bypassing `create_user`.
    pub fn add_user(&self, user: User) {
        self.next_id.fetch_max(user.id + 1, Ordering::SeqCst);
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(user);
    }

    /// Snapshot of the stored users.
    pub fn users(&self) -> Vec<User> {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear all mock data.
    pub fn clear(&self) {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.next_id.store(1, Ordering::SeqCst);
    }
}

impl Default for MockUserGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl UserGateway for MockUserGateway {
    fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        if self.config.fail_list {
            return Err(GatewayError::connection("Mock list failure"));
        }

        Ok(self.users())
    }

    fn create_user(&self, name: &str) -> Result<CreatedUser, GatewayError> {
        if self.config.fail_create {
            return Err(GatewayError::connection("Mock create failure"));
        }

        let created = CreatedUser {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
        };
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(created.clone().into());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let gateway = MockUserGateway::new();
        assert_eq!(gateway.create_user("Ana").unwrap().id, 1);
        assert_eq!(gateway.create_user("Luis").unwrap().id, 2);
        assert_eq!(gateway.list_users().unwrap().len(), 2);
    }

    #[test]
    fn seeded_users_push_next_id_forward() {
        let gateway = MockUserGateway::new();
        gateway.add_user(User {
            id: 41,
            name: Some("Eva".to_string()),
        });
        assert_eq!(gateway.create_user("Ana").unwrap().id, 42);
    }

    #[test]
    fn failing_gateway_reports_connection_errors() {
        let gateway = MockUserGateway::failing();
        assert!(gateway.list_users().is_err());
        assert!(gateway.create_user("Ana").is_err());
        assert!(gateway.users().is_empty());
    }

    #[test]
    fn clear_resets_storage() {
        let gateway = MockUserGateway::new();
        gateway.create_user("Ana").unwrap();
        gateway.clear();
        assert!(gateway.users().is_empty());
        assert_eq!(gateway.create_user("Luis").unwrap().id, 1);
    }
}
