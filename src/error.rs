//! Unified error types for the users service.

use thiserror::Error;

/// Unified error type for the users service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration values that load but make no sense.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Database gateway error.
    #[error("database error: {0}")]
    Gateway(#[from] GatewayError),

    /// Metrics exporter could not be installed.
    #[error("metrics exporter error: {0}")]
    Metrics(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database gateway errors.
///
/// The `Display` output is the bare message; it is what HTTP callers see in
/// the `error` field of the response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The crate was built without the PostgreSQL driver.
    #[error("el driver de PostgreSQL no está instalado")]
    DriverUnavailable,

    /// Opening the connection failed.
    #[error("{message}")]
    Connection {
        /// Message reported by the driver.
        message: String,
    },

    /// Running a statement, reading rows or committing failed.
    #[error("{message}")]
    Query {
        /// Message reported by the driver.
        message: String,
    },

    /// The blocking task running the operation did not complete.
    #[error("{message}")]
    Interrupted {
        /// Reason the task stopped.
        message: String,
    },
}

impl GatewayError {
    /// Connection failure with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Statement failure with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DriverUnavailable => "driver_unavailable",
            Self::Connection { .. } => "connection",
            Self::Query { .. } => "query",
            Self::Interrupted { .. } => "interrupted",
        }
    }
}

impl From<tokio::task::JoinError> for GatewayError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Interrupted {
            message: error.to_string(),
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
