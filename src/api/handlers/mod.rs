//! API Handlers
//!
//! Each handler hands its validation and lookup closures to the shared
//! [`Pipeline`], which owns admission, caching and error rendering.

mod nfts;
mod search;
mod stats;
mod tokens;
mod validators;

#[cfg(test)]
pub(crate) mod fixtures;

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use super::extract::ClientSource;
use crate::cache::{ResponseCache, TtlClass};
use crate::chain::ChainState;
use crate::clock::SharedClock;
use crate::config::Config;
use crate::error::Result;
use crate::limiter::{LimiterConfig, RateLimiter, RouteClass};
use crate::models::HealthResponse;
use crate::pipeline::{to_json, Pipeline, RoutePolicy};
use crate::storage::Storage;

pub use nfts::{collection_nfts, get_collection, get_nft, list_collections, nft_history};
pub use search::search;
pub use stats::{current_stats, performance_stats};
pub use tokens::{get_token, list_tokens, token_holders, token_transfers};
pub use validators::{get_validator, list_validators};

// == Route Policies ==
const GENERAL: &[RouteClass] = &[RouteClass::General];
const GENERAL_AND_SEARCH: &[RouteClass] = &[RouteClass::General, RouteClass::Search];

/// Lists and details
const STANDARD: RoutePolicy = RoutePolicy::cached(GENERAL, TtlClass::Standard);
/// Holders, transfers, NFT listings and live stats
const FRESH: RoutePolicy = RoutePolicy::cached(GENERAL, TtlClass::Fresh);
const SEARCHABLE_STANDARD: RoutePolicy =
    RoutePolicy::cached(GENERAL_AND_SEARCH, TtlClass::Standard);
const SEARCH: RoutePolicy = RoutePolicy::uncached(GENERAL_AND_SEARCH);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub storage: Arc<dyn Storage>,
    pub chain: Arc<dyn ChainState>,
    pub client_source: ClientSource,
}

impl AppState {
    pub fn new(pipeline: Pipeline, storage: Arc<dyn Storage>, chain: Arc<dyn ChainState>) -> Self {
        Self {
            pipeline,
            storage,
            chain,
            client_source: ClientSource::default(),
        }
    }

    pub fn with_client_source(mut self, client_source: ClientSource) -> Self {
        self.client_source = client_source;
        self
    }

    /// Builds the limiter, cache and pipeline from configuration.
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn Storage>,
        chain: Arc<dyn ChainState>,
        clock: SharedClock,
    ) -> Self {
        let limiter = RateLimiter::new(LimiterConfig::from_config(config), clock.clone());
        let cache = ResponseCache::new(config.cache_max_entries, clock);
        let pipeline = Pipeline::new(limiter, cache, !config.is_production());
        Self::new(pipeline, storage, chain)
            .with_client_source(ClientSource::from_trust_proxy(config.trust_proxy))
    }
}

impl FromRef<AppState> for ClientSource {
    fn from_ref(state: &AppState) -> Self {
        state.client_source
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.pipeline.cache().stats().await;
    Json(HealthResponse::healthy(
        stats,
        state.pipeline.limiter().tracked_windows(),
    ))
}

/// Wraps a payload as `{ name: payload }`.
fn wrap<T: Serialize>(name: &str, payload: &T) -> Result<Value> {
    let mut body = Map::new();
    body.insert(name.to_string(), to_json(payload)?);
    Ok(Value::Object(body))
}
