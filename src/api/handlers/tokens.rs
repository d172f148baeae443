//! Token endpoints

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::Value;

use super::{wrap, AppState, FRESH, STANDARD};
use crate::error::{AppError, Result};
use crate::models::{validate_address, validate_address_listing, ListRequest};
use crate::pipeline::{to_json, RequestContext};
use crate::storage::{Criteria, Field, ListQuery, TokenSort, TokenSummary};

const TOKEN_SORTS: &[&str] = &["createdAt", "amount", "holders"];

fn token_sort(sort_by: Option<&str>) -> TokenSort {
    match sort_by {
        Some("createdAt") => TokenSort::CreatedAt,
        Some("holders") => TokenSort::Holders,
        // "amount" and the default both order by supply
        _ => TokenSort::TotalSupply,
    }
}

async fn require_token(state: &AppState, address: &str) -> Result<TokenSummary> {
    state
        .storage
        .find_token(address)
        .await?
        .ok_or_else(|| AppError::not_found("Token not found"))
}

/// Handler for GET /api/tokens
pub async fn list_tokens(State(state): State<AppState>, request: RequestContext) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &STANDARD,
            || ListRequest::parse(&request.query, TOKEN_SORTS),
            |params| token_list(&state, params),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn token_list(state: &AppState, params: ListRequest) -> Result<Value> {
    let mut query = ListQuery::new(token_sort(params.sort_by.as_deref()));
    if let Some(term) = &params.search {
        query.criteria = Criteria::text_search(term, &[Field::Name, Field::Symbol]);
    }
    query.order = params.order;
    query.page = params.page();

    let tokens = state.storage.list_tokens(&query).await?;
    wrap("tokens", &tokens)
}

/// Handler for GET /api/tokens/:address
pub async fn get_token(
    State(state): State<AppState>,
    request: RequestContext,
    Path(address): Path<String>,
) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &STANDARD,
            || validate_address(&address),
            |address| token_detail(&state, address),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn token_detail(state: &AppState, address: String) -> Result<Value> {
    let token = require_token(state, &address).await?;
    to_json(&token)
}

/// Handler for GET /api/tokens/:address/holders
pub async fn token_holders(
    State(state): State<AppState>,
    request: RequestContext,
    Path(address): Path<String>,
) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &FRESH,
            || validate_address_listing(&address, &request.query, TOKEN_SORTS),
            |(address, params)| holder_page(&state, address, params),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn holder_page(state: &AppState, address: String, params: ListRequest) -> Result<Value> {
    require_token(state, &address).await?;
    let holders = state.storage.token_holders(&address, params.page()).await?;
    wrap("holders", &holders)
}

/// Handler for GET /api/tokens/:address/transfers
pub async fn token_transfers(
    State(state): State<AppState>,
    request: RequestContext,
    Path(address): Path<String>,
) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &FRESH,
            || validate_address_listing(&address, &request.query, TOKEN_SORTS),
            |(address, params)| transfer_page(&state, address, params),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn transfer_page(state: &AppState, address: String, params: ListRequest) -> Result<Value> {
    require_token(state, &address).await?;
    let transfers = state
        .storage
        .token_transfers(&address, params.page())
        .await?;
    wrap("transfers", &transfers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::fixtures::{read, request, request_with, state, StubChain, GOLD, SILVER};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_tokens_default_sort_is_supply_desc() {
        let response = list_tokens(State(state(StubChain::default())), request("/api/tokens")).await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::OK);
        let tokens = body["tokens"].as_array().unwrap();
        assert_eq!(tokens[0]["address"], GOLD);
        assert_eq!(tokens[0]["holderCount"], 2);
        assert_eq!(tokens[1]["address"], SILVER);
    }

    #[tokio::test]
    async fn test_list_tokens_search() {
        let response = list_tokens(
            State(state(StubChain::default())),
            request_with("/api/tokens", &[("search", "slv")]),
        )
        .await;
        let (_, body) = read(response).await;

        let tokens = body["tokens"].as_array().unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0]["name"], "Silver");
    }

    #[tokio::test]
    async fn test_list_tokens_invalid_limit() {
        let response = list_tokens(
            State(state(StubChain::default())),
            request_with("/api/tokens", &[("limit", "0")]),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["data"]["errors"][0]["message"], "Limit must be between 1 and 100");
    }

    #[tokio::test]
    async fn test_get_token() {
        let path = format!("/api/tokens/{GOLD}");
        let response = get_token(
            State(state(StubChain::default())),
            request(&path),
            Path(GOLD.to_string()),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "GLD");
        assert_eq!(body["holderCount"], 2);
    }

    #[tokio::test]
    async fn test_get_token_not_found() {
        let missing = "Missing1111111111111111111111111111";
        let response = get_token(
            State(state(StubChain::default())),
            request("/api/tokens/missing"),
            Path(missing.to_string()),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Token not found");
    }

    #[tokio::test]
    async fn test_holders_by_balance() {
        let path = format!("/api/tokens/{GOLD}/holders");
        let response = token_holders(
            State(state(StubChain::default())),
            request(&path),
            Path(GOLD.to_string()),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::OK);
        let balances: Vec<u64> = body["holders"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["balance"].as_u64().unwrap())
            .collect();
        assert_eq!(balances, vec![900, 70]);
    }

    #[tokio::test]
    async fn test_transfers_for_mint() {
        let path = format!("/api/tokens/{GOLD}/transfers");
        let response = token_transfers(
            State(state(StubChain::default())),
            request(&path),
            Path(GOLD.to_string()),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transfers"][0]["type"], "TOKEN_TRANSFER");

        let path = format!("/api/tokens/{SILVER}/transfers");
        let response = token_transfers(
            State(state(StubChain::default())),
            request(&path),
            Path(SILVER.to_string()),
        )
        .await;
        let (_, body) = read(response).await;
        assert!(body["transfers"].as_array().unwrap().is_empty());
    }
}
