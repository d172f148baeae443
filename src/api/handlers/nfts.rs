//! NFT collection endpoints

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::Value;

use super::{wrap, AppState, FRESH, SEARCHABLE_STANDARD, STANDARD};
use crate::error::{AppError, Result};
use crate::models::{
    validate_address, validate_address_listing, validate_nft_listing, validate_nft_path,
    ListRequest, NftDetail,
};
use crate::pipeline::RequestContext;
use crate::storage::{CollectionDetail, CollectionSort, Criteria, Field, ListQuery};

const COLLECTION_SORTS: &[&str] = &["createdAt", "name", "symbol"];

fn collection_sort(sort_by: Option<&str>) -> CollectionSort {
    match sort_by {
        Some("createdAt") => CollectionSort::CreatedAt,
        Some("name") => CollectionSort::Name,
        Some("symbol") => CollectionSort::Symbol,
        _ => CollectionSort::TotalVolume,
    }
}

async fn require_collection(state: &AppState, address: &str) -> Result<CollectionDetail> {
    state
        .storage
        .find_collection(address)
        .await?
        .ok_or_else(|| AppError::not_found("Collection not found"))
}

async fn require_nft(state: &AppState, address: &str, token_id: &str) -> Result<NftDetail> {
    let detail = require_collection(state, address).await?;
    let nft = state
        .storage
        .find_nft(detail.collection.id, token_id)
        .await?
        .ok_or_else(|| AppError::not_found("NFT not found"))?;

    Ok(NftDetail {
        nft,
        collection: detail.collection,
    })
}

/// Handler for GET /api/nfts/collections
pub async fn list_collections(State(state): State<AppState>, request: RequestContext) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &SEARCHABLE_STANDARD,
            || ListRequest::parse(&request.query, COLLECTION_SORTS),
            |params| collection_list(&state, params),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn collection_list(state: &AppState, params: ListRequest) -> Result<Value> {
    let mut query = ListQuery::new(collection_sort(params.sort_by.as_deref()));
    if let Some(term) = &params.search {
        query.criteria = Criteria::text_search(term, &[Field::Name, Field::Symbol]);
    }
    query.order = params.order;
    query.page = params.page();

    let collections = state.storage.list_collections(&query).await?;
    wrap("collections", &collections)
}

/// Handler for GET /api/nfts/collections/:address
pub async fn get_collection(
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
            |address| collection_detail(&state, address),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn collection_detail(state: &AppState, address: String) -> Result<Value> {
    let collection = require_collection(state, &address).await?;
    wrap("collection", &collection)
}

/// Handler for GET /api/nfts/collections/:address/nfts
pub async fn collection_nfts(
    State(state): State<AppState>,
    request: RequestContext,
    Path(address): Path<String>,
) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &FRESH,
            || validate_address_listing(&address, &request.query, &[]),
            |(address, params)| nft_page(&state, address, params),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn nft_page(state: &AppState, address: String, params: ListRequest) -> Result<Value> {
    let detail = require_collection(state, &address).await?;
    let nfts = state
        .storage
        .collection_nfts(detail.collection.id, params.page())
        .await?;
    wrap("nfts", &nfts)
}

/// Handler for GET /api/nfts/collections/:address/:tokenId
pub async fn get_nft(
    State(state): State<AppState>,
    request: RequestContext,
    Path((address, token_id)): Path<(String, String)>,
) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &STANDARD,
            || validate_nft_path(&address, &token_id),
            |(address, token_id)| nft_detail(&state, address, token_id),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn nft_detail(state: &AppState, address: String, token_id: String) -> Result<Value> {
    let nft = require_nft(state, &address, &token_id).await?;
    wrap("nft", &nft)
}

/// Handler for GET /api/nfts/collections/:address/:tokenId/history
pub async fn nft_history(
    State(state): State<AppState>,
    request: RequestContext,
    Path((address, token_id)): Path<(String, String)>,
) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &FRESH,
            || validate_nft_listing(&address, &token_id, &request.query),
            |(address, token_id, params)| history_page(&state, address, token_id, params),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn history_page(
    state: &AppState,
    address: String,
    token_id: String,
    params: ListRequest,
) -> Result<Value> {
    let detail = require_nft(state, &address, &token_id).await?;
    let transfers = state
        .storage
        .nft_transfers(detail.nft.id, params.page())
        .await?;
    wrap("transfers", &transfers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::fixtures::{read, request, request_with, state, StubChain, PUNKS};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_collections() {
        let response = list_collections(
            State(state(StubChain::default())),
            request_with("/api/nfts/collections", &[("search", "punk")]),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["collections"][0]["address"], PUNKS);
    }

    #[tokio::test]
    async fn test_list_collections_rejects_volume_sort() {
        // totalVolume is only the default, never a client choice
        let response = list_collections(
            State(state(StubChain::default())),
            request_with("/api/nfts/collections", &[("sortBy", "totalVolume")]),
        )
        .await;
        let (status, _) = read(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_collection_detail_counts_nfts() {
        let path = format!("/api/nfts/collections/{PUNKS}");
        let response = get_collection(
            State(state(StubChain::default())),
            request(&path),
            Path(PUNKS.to_string()),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["collection"]["nftCount"], 1);
    }

    #[tokio::test]
    async fn test_collection_nfts() {
        let path = format!("/api/nfts/collections/{PUNKS}/nfts");
        let response = collection_nfts(
            State(state(StubChain::default())),
            request(&path),
            Path(PUNKS.to_string()),
        )
        .await;
        let (_, body) = read(response).await;

        assert_eq!(body["nfts"][0]["tokenId"], "1");
    }

    #[tokio::test]
    async fn test_nft_detail_and_missing() {
        let path = format!("/api/nfts/collections/{PUNKS}/1");
        let response = get_nft(
            State(state(StubChain::default())),
            request(&path),
            Path((PUNKS.to_string(), "1".to_string())),
        )
        .await;
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nft"]["collection"]["symbol"], "PNK");

        let path = format!("/api/nfts/collections/{PUNKS}/99");
        let response = get_nft(
            State(state(StubChain::default())),
            request(&path),
            Path((PUNKS.to_string(), "99".to_string())),
        )
        .await;
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "NFT not found");
    }

    #[tokio::test]
    async fn test_unknown_collection() {
        let missing = "Missing1111111111111111111111111111";
        let response = get_collection(
            State(state(StubChain::default())),
            request("/api/nfts/collections/missing"),
            Path(missing.to_string()),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Collection not found");
    }

    #[tokio::test]
    async fn test_nft_history() {
        let path = format!("/api/nfts/collections/{PUNKS}/1/history");
        let response = nft_history(
            State(state(StubChain::default())),
            request(&path),
            Path((PUNKS.to_string(), "1".to_string())),
        )
        .await;
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transfers"][0]["slot"], 3);
    }
}
