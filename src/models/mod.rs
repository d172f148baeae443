//! Request and response models for the gateway API
//!
//! Request models validate raw path and query input; response models are
//! the JSON bodies handlers produce.

pub mod requests;
pub mod responses;

pub use requests::{
    validate_address, validate_address_listing, validate_nft_listing, validate_nft_path,
    validate_pubkey, validate_search_query, ListRequest, QueryPairs,
};
pub use responses::{
    CurrentStats, HealthResponse, NftDetail, PerformanceReport, SearchResult,
    ValidatorListResponse,
};
