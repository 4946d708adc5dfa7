//! Haulyard API server binary.
//!
//! Loads configuration from the environment (token secrets are required and
//! abort startup when missing), connects to PostgreSQL, runs migrations, and
//! serves the REST API.

use std::sync::Arc;

use clap::Parser;
use haulyard_api::config::ApiConfig;
use haulyard_core::mail::LogMailer;
use haulyard_core::notify::LogPublisher;
use haulyard_core::otp::OtpStore;
use haulyard_core::store::{AccountStore, MemoryAccountStore, PgAccountStore};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "haulyard_api_server", about = "Haulyard API server")]
struct Args {
    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/haulyard"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Use an in-memory account store instead of PostgreSQL. Development
    /// only; all data is lost on exit.
    #[arg(long, default_value_t = false)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,haulyard_api=debug,haulyard_core=debug".parse().unwrap()
            }),
        )
        .init();

    let args = Args::parse();

    // Fatal here when token secrets or TTLs are missing from the environment.
    let config = ApiConfig::from_env()?;

    info!(
        bind_addr = %config.bind_addr,
        memory_store = args.memory_store,
        "starting haulyard_api_server"
    );

    let store: Arc<dyn AccountStore> = if args.memory_store {
        Arc::new(MemoryAccountStore::new())
    } else {
        info!(max_connections = args.max_connections, "configuring connection pool");
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&args.database_url)
            .await?;

        info!("running database migrations");
        haulyard_api::migrate(&pool).await?;

        Arc::new(PgAccountStore::new(pool))
    };

    let otp = Arc::new(OtpStore::new());
    let _otp_cleanup = otp.spawn_cleanup_task();

    let state = haulyard_api::AppState {
        store,
        config: config.clone(),
        otp,
        mailer: Arc::new(LogMailer),
        publisher: Arc::new(LogPublisher),
    };

    let app = haulyard_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
