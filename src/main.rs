//! Alexandria Server - Library Catalog Microservice
//!
//! A Rust REST API server for managing a library catalog backed by a
//! MongoDB document store.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use mongodb::{options::ClientOptions, Client};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alexandria_server::{
    api, config::AppConfig, repository::Repository, services::Services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "alexandria_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Alexandria Server v{}", env!("CARGO_PKG_VERSION"));

    // Connect to the document store
    let mut options = ClientOptions::parse(&config.database.uri).await?;
    options.connect_timeout = Some(Duration::from_secs(config.database.connect_timeout_secs));
    options.server_selection_timeout = Some(Duration::from_secs(
        config.database.server_selection_timeout_secs,
    ));
    let client = Client::with_options(options)?;
    let db = client.database(&config.database.name);

    // Create repository and verify connectivity before serving traffic
    let repository = Repository::new(&db);
    repository
        .ping()
        .await
        .expect("Failed to reach document store");

    tracing::info!("Connected to document store `{}`", config.database.name);

    // Unique indexes back the ISBN and category-name constraints
    repository
        .ensure_indexes()
        .await
        .expect("Failed to create indexes");

    tracing::info!("Unique indexes in place");

    // Save server parameters before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    // Create services and application state
    let services = Services::new(repository);
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state, request_timeout);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        // Authors
        .route("/authors", get(api::authors::list_authors))
        .route("/authors", post(api::authors::create_author))
        .route("/authors/:id", get(api::authors::get_author))
        .route("/authors/:id", put(api::authors::update_author))
        .route("/authors/:id", delete(api::authors::delete_author))
        // Categories
        .route("/categories", get(api::categories::list_categories))
        .route("/categories", post(api::categories::create_category))
        .route("/categories/:id", get(api::categories::get_category))
        .route("/categories/:id", put(api::categories::update_category))
        .route("/categories/:id", delete(api::categories::delete_category))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
}
