//! cacm-desa - red-flag follow-up service for village finances

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{error, info};

use cacm_desa_postgres::{init_database, PostgresProcedures, PostgresRepositories};
use cacm_desa_server::{config::Args, logging, router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    logging::init(&args.log_level, args.log_format);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!(?args, "starting cacm-desa");

    let pool = PgPoolOptions::new()
        .max_connections(args.database_max_connections)
        .connect(&args.database_url)
        .await
        .context("failed to connect to Postgres")?;
    info!("Postgres connected");

    if args.run_migrations {
        init_database(&pool).await.context("failed to apply migrations")?;
        info!("migrations applied");
    }

    let pool = Arc::new(pool);
    let procedures = Arc::new(PostgresProcedures::new(pool.clone()));
    let state = AppState::new(
        Arc::new(PostgresRepositories::new(pool)),
        procedures.clone(),
        procedures,
        Settings::from(&args),
    )
    .context("invalid session configuration")?;

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!("listening on {}", args.listen);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
    }
}
