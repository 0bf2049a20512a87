//! User records as stored and as returned to callers.

use serde::{Deserialize, Serialize};

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Display name. `None` for rows stored with a NULL name.
    pub name: Option<String>,
}

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Name that was inserted.
    pub name: String,
}

impl From<CreatedUser> for User {
    fn from(created: CreatedUser) -> Self {
        Self {
            id: created.id,
            name: Some(created.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_serializes_id_and_name() {
        let user = User {
            id: 7,
            name: Some("Ana".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"id": 7, "name": "Ana"})
        );
    }

    #[test]
    fn null_name_serializes_as_null() {
        let user = User { id: 1, name: None };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"id": 1, "name": null})
        );
    }
}
