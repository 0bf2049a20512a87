//! Application configuration loaded from environment variables.

use std::fmt;

use serde::Deserialize;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct Config {
    // === Database ===
    /// PostgreSQL host name.
    #[serde(default = "default_database_host")]
    pub database_host: String,

    /// PostgreSQL port.
    #[serde(default = "default_database_port")]
    pub database_port: u16,

    /// Database name.
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Database role.
    #[serde(default = "default_database_user")]
    pub database_user: String,

    /// Password for `database_user`. May be empty.
    #[serde(default)]
    pub database_password: String,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Port for the Prometheus exporter. No exporter when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Connection parameters handed to the database gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Database name.
    pub name: String,
    /// Role.
    pub user: String,
    /// Password.
    pub password: String,
}

fn default_database_host() -> String {
    "mi-postgres-postgresql-primary.juanjcordero-dev.svc.cluster.local".to_string()
}

fn default_database_port() -> u16 {
    5432
}

fn default_database_name() -> String {
    "postgres".to_string()
}

fn default_database_user() -> String {
    "postgres".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build a configuration from explicit `(KEY, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.database_host.trim().is_empty() {
            return Err("DATABASE_HOST must not be empty".to_string());
        }

        if self.database_port == 0 {
            return Err("DATABASE_PORT must be greater than 0".to_string());
        }

        if self.database_name.trim().is_empty() {
            return Err("DATABASE_NAME must not be empty".to_string());
        }

        if self.database_user.trim().is_empty() {
            return Err("DATABASE_USER must not be empty".to_string());
        }

        if self.metrics_port.is_some_and(|p| p == self.port) {
            return Err("METRICS_PORT must differ from PORT".to_string());
        }

        Ok(())
    }

    /// Connection parameters for the database gateway.
    pub fn database(&self) -> DatabaseSettings {
        DatabaseSettings {
            host: self.database_host.clone(),
            port: self.database_port,
            name: self.database_name.clone(),
            user: self.database_user.clone(),
            password: self.database_password.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_host: default_database_host(),
            database_port: default_database_port(),
            database_name: default_database_name(),
            database_user: default_database_user(),
            database_password: String::new(),
            port: default_port(),
            metrics_port: None,
            rust_log: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "********"
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_host", &self.database_host)
            .field("database_port", &self.database_port)
            .field("database_name", &self.database_name)
            .field("database_user", &self.database_user)
            .field("database_password", &mask(&self.database_password))
            .field("port", &self.port)
            .field("metrics_port", &self.metrics_port)
            .field("rust_log", &self.rust_log)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &mask(&self.password))
            .finish()
    }
}

impl fmt::Display for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_vars(Vec::new()).unwrap();

        assert_eq!(
            config.database_host,
            "mi-postgres-postgresql-primary.juanjcordero-dev.svc.cluster.local"
        );
        assert_eq!(config.database_port, 5432);
        assert_eq!(config.database_name, "postgres");
        assert_eq!(config.database_user, "postgres");
        assert_eq!(config.database_password, "");
        assert_eq!(config.port, 3000);
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_HOST", "db.local"),
            ("DATABASE_PORT", "6543"),
            ("DATABASE_NAME", "app"),
            ("DATABASE_USER", "svc"),
            ("DATABASE_PASSWORD", "hunter2"),
            ("PORT", "8081"),
            ("METRICS_PORT", "9090"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(
            config.database(),
            DatabaseSettings {
                host: "db.local".to_string(),
                port: 6543,
                name: "app".to_string(),
                user: "svc".to_string(),
                password: "hunter2".to_string(),
            }
        );
        assert_eq!(config.port, 8081);
        assert_eq!(config.metrics_port, Some(9090));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn non_numeric_database_port_is_rejected() {
        let result = Config::from_vars(vars(&[("DATABASE_PORT", "five")]));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_host() {
        let config = Config {
            database_host: "  ".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_metrics_port_clash() {
        let config = Config {
            metrics_port: Some(3000),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_masks_password() {
        let config = Config {
            database_password: "hunter2".to_string(),
            ..Config::default()
        };

        let rendered = format!("{:?} {:?}", config, config.database());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("********"));
    }

    #[test]
    fn database_settings_display_omits_password() {
        let settings = Config::default().database();
        assert_eq!(
            settings.to_string(),
            "postgres@mi-postgres-postgresql-primary.juanjcordero-dev.svc.cluster.local:5432/postgres"
        );
    }
}
