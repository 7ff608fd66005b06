use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use crate::output;
use crate::storage::SharedStore;

pub mod routes;
pub mod schema;

pub use schema::{build_schema, ApiSchema};

/// Server state
pub struct AppState {
    pub schema: ApiSchema,
    pub store: SharedStore,
    pub playground: bool,
}

impl AppState {
    pub fn new(store: SharedStore, playground: bool) -> Self {
        Self {
            schema: build_schema(store.clone()),
            store,
            playground,
        }
    }
}

/// HTTP routes: GraphQL on `/` and `/graphql`, Playground on `GET /`, health on `/healthz`
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::playground).post(routes::graphql))
        .route("/graphql", post(routes::graphql))
        .route("/healthz", get(routes::healthz))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, store: SharedStore, playground: bool) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(store, playground));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Starting server on {}", addr);
    output::announce_server(addr, playground);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler, run until killed.
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
