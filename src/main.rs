//! Users service entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use users_service::api::{create_router, serve, AppState};
use users_service::config::{Config, LogFormat};
use users_service::metrics;
use users_service::users::gateway;
use users_service::utils::shutdown_signal;
use users_service::ServiceError;

/// Health probes and a users API backed by PostgreSQL.
#[derive(Parser, Debug)]
#[command(name = "users-service")]
#[command(about = "HTTP service with health probes and a PostgreSQL-backed users API")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (defaults to PORT, then 3000).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve HTTP requests (default).
    Serve {
        /// HTTP server port (defaults to PORT, then 3000).
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Run one users query against the configured database.
    CheckDatabase,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration is needed before logging to pick the format
    let config = Config::load().map_err(ServiceError::from)?;
    init_logging(&config, args.verbose);

    metrics::init_metrics();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::CheckDatabase) => cmd_check_database(&config).await,
        Some(Command::Serve { port }) => cmd_serve(config, port.or(args.port)).await,
        None => cmd_serve(config, args.port).await,
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("users_service=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("USERS SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(ServiceError::InvalidConfig(e).into());
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Database: {}", config.database());
    println!(
        "  Password: {}",
        if config.database_password.is_empty() { "not set" } else { "set" }
    );
    println!(
        "  Driver: {}",
        if gateway::driver_available() { "PostgreSQL" } else { "NOT INSTALLED" }
    );
    println!("  HTTP Port: {}", config.port);
    match config.metrics_port {
        Some(port) => println!("  Metrics Port: {}", port),
        None => println!("  Metrics: Disabled"),
    }
    println!("  Log Level: {}", config.rust_log);
    println!("  Log Format: {:?}", config.log_format);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run one users query against the configured database.
async fn cmd_check_database(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("USERS SERVICE - DATABASE CHECK");
    println!("======================================================================");
    println!("Database: {}", config.database());

    print!("Listing users... ");
    let gateway = gateway::connect(&config.database());
    match gateway::list_users(gateway).await {
        Ok(users) => {
            println!("OK");
            println!("  Users: {}", users.len());
            for user in users.iter().take(5) {
                println!("  - {}: {}", user.id, user.name.as_deref().unwrap_or("<null>"));
            }
            if users.len() > 5 {
                println!("  ... and {} more", users.len() - 5);
            }
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(ServiceError::from(e).into());
        }
    }

    println!("======================================================================");
    println!("DATABASE CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve HTTP requests until interrupted.
async fn cmd_serve(mut config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(ServiceError::InvalidConfig(e).into());
    }

    info!("Configuration loaded successfully");
    info!("Database: {}", config.database());

    if let Some(port) = config.metrics_port {
        metrics::install_exporter(port)?;
    }

    // Driver capability is decided once here
    let gateway = gateway::connect(&config.database());
    let router = create_router(AppState::new(gateway));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await.map_err(ServiceError::from)?;
    info!("Press Ctrl+C to stop");

    serve(listener, router, shutdown_signal()).await?;
    Ok(())
}
