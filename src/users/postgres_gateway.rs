//! PostgreSQL-backed user gateway.

use postgres::{Client, NoTls, Row};
use tracing::{instrument, warn};

use crate::config::DatabaseSettings;
use crate::error::GatewayError;

use super::gateway::UserGateway;
use super::types::{CreatedUser, User};

const SELECT_USERS: &str = "SELECT id, name FROM users";
const INSERT_USER: &str = "INSERT INTO users (name) VALUES ($1) RETURNING id";

/// Opens one connection per operation; nothing is pooled.
#[derive(Debug, Clone)]
pub struct PostgresGateway {
    config: postgres::Config,
}

impl PostgresGateway {
    /// Build a gateway from connection settings. Does not connect.
    pub fn new(settings: &DatabaseSettings) -> Self {
        let mut config = postgres::Config::new();
        config
            .host(&settings.host)
            .port(settings.port)
            .dbname(&settings.name)
            .user(&settings.user);
        if !settings.password.is_empty() {
            config.password(&settings.password);
        }
        Self { config }
    }

    /// Driver configuration this gateway connects with.
    pub fn config(&self) -> &postgres::Config {
        &self.config
    }

    fn open(&self) -> Result<Client, GatewayError> {
        self.config
            .connect(NoTls)
            .map_err(|e| GatewayError::connection(e.to_string()))
    }
}

fn query_error(error: postgres::Error) -> GatewayError {
    GatewayError::query(error.to_string())
}

// `serial` columns are INT4; accept INT8 as well so a `bigserial` table works.
fn read_id(row: &Row) -> Result<i64, postgres::Error> {
    match row.try_get::<_, i64>(0) {
        Ok(id) => Ok(id),
        Err(_) => row.try_get::<_, i32>(0).map(i64::from),
    }
}

fn disconnect(client: Client) {
    if let Err(e) = client.close() {
        warn!("Error while closing database connection: {}", e);
    }
}

impl UserGateway for PostgresGateway {
    #[instrument(skip(self))]
    fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        let mut client = self.open()?;

        let rows = client.query(SELECT_USERS, &[]).map_err(query_error)?;
        let users = rows
            .iter()
            .map(|row| {
                Ok(User {
                    id: read_id(row)?,
                    name: row.try_get(1)?,
                })
            })
            .collect::<Result<Vec<_>, postgres::Error>>()
            .map_err(query_error)?;

        disconnect(client);
        Ok(users)
    }

    #[instrument(skip(self, name))]
    fn create_user(&self, name: &str) -> Result<CreatedUser, GatewayError> {
        let mut client = self.open()?;

        let mut transaction = client.transaction().map_err(query_error)?;
        let row = transaction
            .query_one(INSERT_USER, &[&name])
            .map_err(query_error)?;
        let id = read_id(&row).map_err(query_error)?;
        transaction.commit().map_err(query_error)?;

        disconnect(client);
        Ok(CreatedUser {
            id,
            name: name.to_string(),
        })
    }
}
