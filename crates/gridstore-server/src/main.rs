//! Gridstore Server - REST API for the Gridstore data store.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use clap::Parser;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridstore_core::Engine;
use gridstore_server::{
    delete_rows, filter_rows, get_rows, health_check, push_data, push_data_chunked, search, ApiDoc,
    AppState,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Gridstore Server - dynamic-schema tabular data store over MySQL
#[derive(Parser, Debug)]
#[command(name = "gridstore-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// MySQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Target table name (backticks are stripped)
    #[arg(long, default_value = "data_table", env = "TABLE_NAME")]
    table: String,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "GRIDSTORE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "PORT")]
    port: u16,

    /// Connection pool size
    #[arg(long, default_value = "10", env = "GRIDSTORE_MAX_CONNECTIONS")]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting Gridstore server...");
    tracing::info!("Target table: {}", args.table);

    // Connect the pool
    let pool = MySqlPoolOptions::new()
        .max_connections(args.max_connections)
        .connect(&args.database_url)
        .await?;
    let state = Arc::new(AppState {
        engine: Engine::new(pool, &args.table),
    });

    // Build API router with state
    let api_router = Router::new()
        .route("/", get(get_rows))
        // 100MB limit for whole-file imports; larger uploads go chunked
        .route("/push-data", post(push_data))
        .route("/push-data-chunked", post(push_data_chunked))
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .route("/search", get(search))
        .route("/filter", post(filter_rows))
        .route("/delete-row", delete(delete_rows))
        .route("/health", get(health_check))
        .with_state(state);

    // Swagger UI (stateless router)
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    // Build main app with Swagger UI
    let app = api_router
        .merge(Router::<()>::new().merge(swagger_ui))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Gridstore server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
