//! API Routes
//!
//! Configures the Axum router with every gateway endpoint.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    collection_nfts, current_stats, get_collection, get_nft, get_token, get_validator,
    health_handler, list_collections, list_tokens, list_validators, nft_history,
    performance_stats, search, token_holders, token_transfers, AppState,
};
use crate::error::AppError;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: any origin, method and header
/// - Tracing: one span per request
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/validators", get(list_validators))
        .route("/validators/:pubkey", get(get_validator))
        .route("/tokens", get(list_tokens))
        .route("/tokens/:address", get(get_token))
        .route("/tokens/:address/holders", get(token_holders))
        .route("/tokens/:address/transfers", get(token_transfers))
        .route("/nfts/collections", get(list_collections))
        .route("/nfts/collections/:address", get(get_collection))
        .route("/nfts/collections/:address/nfts", get(collection_nfts))
        .route("/nfts/collections/:address/:token_id", get(get_nft))
        .route(
            "/nfts/collections/:address/:token_id/history",
            get(nft_history),
        )
        .route("/search/:query", get(search))
        .route("/stats/current", get(current_stats))
        .route("/stats/performance", get(performance_stats));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .fallback(|| async { AppError::not_found("Route not found") })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
