//! DocPulse server binary
//!
//! Wires the database, AI connector, and HTTP API together and serves
//! uploaded files alongside the API.

use clap::Parser;
use docpulse_ai::GeminiClient;
use docpulse_api::{ApiServer, ApiServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "docpulse-server",
    about = "DocPulse - document sharing and engagement tracking backend",
    version
)]
struct Cli {
    /// Address to bind the HTTP server
    #[arg(short = 'l', long, default_value = "127.0.0.1:8080", env = "DOCPULSE_LISTEN")]
    listen: SocketAddr,

    /// Database connection URL (SQLite or Postgres)
    #[arg(long, default_value = "sqlite://docpulse.db?mode=rwc", env = "DATABASE_URL")]
    database_url: String,

    /// Secret used to sign session tokens
    #[arg(long, env = "DOCPULSE_JWT_SECRET")]
    jwt_secret: String,

    /// API key for the Gemini Q&A connector
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_api_key: String,

    /// Directory uploaded documents are stored under
    #[arg(long, default_value = "./storage", env = "DOCPULSE_STORAGE_DIR")]
    storage_dir: PathBuf,

    /// Public base URL file links are derived from
    #[arg(long, default_value = "http://127.0.0.1:8080", env = "DOCPULSE_PUBLIC_URL")]
    public_base_url: String,

    /// Disable CORS (enabled by default for development)
    #[arg(long)]
    no_cors: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "docpulse_server=debug,docpulse_api=debug,tower_http=debug".into())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "docpulse_server=info,docpulse_api=info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DocPulse server");
    tracing::info!("Listen: {}", cli.listen);
    tracing::info!("Database: {}", cli.database_url);
    tracing::info!("Storage: {}", cli.storage_dir.display());

    tokio::fs::create_dir_all(&cli.storage_dir).await?;

    let db = docpulse_db::connect(&cli.database_url).await?;
    docpulse_db::migrate(&db).await?;
    tracing::info!("Database migrated");

    let qa = Arc::new(GeminiClient::new(cli.gemini_api_key));

    let config = ApiServerConfig {
        bind_addr: cli.listen,
        enable_cors: !cli.no_cors,
        jwt_secret: cli.jwt_secret,
        storage_dir: cli.storage_dir.clone(),
        public_base_url: cli.public_base_url,
    };

    let server = ApiServer::new(config, db, qa);
    let router = server
        .build_router()
        .nest_service("/files", ServeDir::new(&cli.storage_dir));

    tracing::info!("Swagger UI: http://{}/swagger-ui", cli.listen);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
