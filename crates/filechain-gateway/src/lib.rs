//! filechain-gateway — a development chain node exposing the ledger over HTTP.
//!
//! Backed by the in-memory ledger; every write is signature-checked
//! before it lands. Not a real chain — a stand-in with the same
//! append-only, content-addressed contract.

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::GatewayState;

/// Build the gateway router. Exposed separately from [`serve`] so tests
/// can bind their own listener.
pub fn router(state: GatewayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(handlers::handle_status))
        .route("/node", post(handlers::handle_submit))
        .route("/node/{cid}", get(handlers::handle_get_node))
        .route("/search-file/{cid}", get(handlers::handle_search_file))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}

pub async fn serve(state: GatewayState, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!(port, "gateway listening on 127.0.0.1");
    axum::serve(listener, app).await?;
    Ok(())
}
