//! Network statistics

use axum::{extract::State, response::Response};
use serde_json::Value;

use super::{AppState, FRESH};
use crate::error::Result;
use crate::models::{CurrentStats, ListRequest, PerformanceReport};
use crate::pipeline::{to_json, RequestContext};

const DEFAULT_SAMPLES: usize = 30;

/// Handler for GET /api/stats/current
pub async fn current_stats(State(state): State<AppState>, request: RequestContext) -> Response {
    let outcome = state
        .pipeline
        .execute(&request, &FRESH, || Ok(()), |()| network_snapshot(&state))
        .await;
    state.pipeline.respond(outcome)
}

async fn network_snapshot(state: &AppState) -> Result<Value> {
    let (supply, accounts, epoch, transactions, blocks) = tokio::try_join!(
        state.chain.fetch_supply(),
        state.chain.fetch_vote_accounts(),
        state.chain.fetch_epoch_info(),
        state.storage.count_transactions(),
        state.storage.count_blocks(),
    )?;

    to_json(&CurrentStats::new(
        &supply,
        &accounts,
        transactions,
        blocks,
        epoch,
    ))
}

/// Handler for GET /api/stats/performance
pub async fn performance_stats(State(state): State<AppState>, request: RequestContext) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &FRESH,
            || ListRequest::parse(&request.query, &[]),
            |params| performance(&state, params),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn performance(state: &AppState, params: ListRequest) -> Result<Value> {
    let samples = state
        .chain
        .fetch_recent_performance_samples(params.limit.unwrap_or(DEFAULT_SAMPLES))
        .await?;
    to_json(&PerformanceReport::from_samples(samples))
}
