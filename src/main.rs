use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use todo_api::config::{self, AppConfig, StoreBackend};
use todo_api::database::{DatabaseManager, PgStore};
use todo_api::{app, AppState};

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(about = "Authenticated to-do list REST API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, short, help = "Port to listen on, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Create or update the PostgreSQL schema and exit")]
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = config::config().clone();
    config.validate()?;
    tracing::info!("Starting todo-api in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store = DatabaseManager::open(&config.database)
        .await
        .context("failed to open store")?;

    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "todo-api listening on http://{} ({} store)",
        bind_addr,
        store.backend_name()
    );

    axum::serve(listener, app(AppState::new(store, config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    if config.database.backend != StoreBackend::Postgres {
        bail!("migrate requires the postgres store backend (set DATABASE_URL)");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    PgStore::new(pool.clone()).migrate().await?;
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
