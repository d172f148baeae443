//! Free-text search

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::Value;
use tracing::warn;

use super::{AppState, SEARCH};
use crate::error::{AppError, Result};
use crate::models::{validate_search_query, SearchResult};
use crate::pipeline::{to_json, RequestContext};
use crate::storage::{Criteria, Field};

const SEARCH_RECENT_BLOCKS: usize = 10;

/// Handler for GET /api/search/:query
pub async fn search(
    State(state): State<AppState>,
    request: RequestContext,
    Path(query): Path<String>,
) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &SEARCH,
            || validate_search_query(&query),
            |query| first_match(&state, query),
        )
        .await;
    state.pipeline.respond(outcome)
}

/// Transaction hash, then validator pubkey, then token name or symbol.
async fn first_match(state: &AppState, query: String) -> Result<Value> {
    let found = lookup(state, &query).await.map_err(|err| {
        warn!(error = %err, "search lookup failed");
        AppError::internal("Search failed")
    })?;

    match found {
        Some(result) => to_json(&result),
        None => Err(AppError::not_found("No results found")),
    }
}

async fn lookup(state: &AppState, query: &str) -> Result<Option<SearchResult>> {
    if let Some(tx) = state.storage.find_transaction(query).await? {
        return Ok(Some(SearchResult::Transaction(tx)));
    }

    if let Some(validator) = state
        .storage
        .find_validator_by_pubkey(query, SEARCH_RECENT_BLOCKS)
        .await?
    {
        return Ok(Some(SearchResult::Validator(validator)));
    }

    let criteria = Criteria::text_search(query, &[Field::Symbol, Field::Name]);
    Ok(state
        .storage
        .find_first_token(&criteria)
        .await?
        .map(SearchResult::Token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::fixtures::{read, request, state, StubChain, TX_HASH, VOTE_A};
    use axum::http::StatusCode;

    async fn run(query: &str) -> (StatusCode, Value) {
        let path = format!("/api/search/{query}");
        let response = search(
            State(state(StubChain::default())),
            request(&path),
            Path(query.to_string()),
        )
        .await;
        read(response).await
    }

    #[tokio::test]
    async fn test_finds_transaction_first() {
        let (status, body) = run(TX_HASH).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "transaction");
        assert_eq!(body["result"]["hash"], TX_HASH);
    }

    #[tokio::test]
    async fn test_finds_validator_by_node_pubkey() {
        let node = VOTE_A.replacen("Vote", "Node", 1);
        let (status, body) = run(&node).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "validator");
        assert_eq!(body["result"]["votePubkey"], VOTE_A);
    }

    #[tokio::test]
    async fn test_finds_token_by_symbol_case_insensitively() {
        let (status, body) = run("gld").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "token");
        assert_eq!(body["result"]["name"], "Gold");
    }

    #[tokio::test]
    async fn test_short_query_rejected() {
        let (status, body) = run("ab").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid search parameters");
    }

    #[tokio::test]
    async fn test_no_results() {
        let (status, body) = run("zzzz").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No results found");
    }
}
