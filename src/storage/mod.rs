//! Storage Module
//!
//! Query interface over the indexed chain data. The relational store is an
//! external collaborator; [`MemoryStorage`] serves the same interface from a
//! snapshot so the gateway and its tests run without a database.

mod memory;
pub mod query;
mod records;

use async_trait::async_trait;

pub use memory::MemoryStorage;
pub use query::{
    CollectionSort, Criteria, Field, Filter, Filterable, ListQuery, Page, SortOrder, TokenSort,
    ValidatorSort, MAX_PAGE_LIMIT,
};
pub use records::{
    AccountRecord, BlockRecord, CollectionDetail, NftCollectionRecord, NftRecord,
    NftTransferRecord, StorageSnapshot, TokenRecord, TokenSummary, TransactionKind,
    TransactionRecord, ValidatorRecord, ValidatorRow,
};

use crate::error::Result;

/// Read-only queries against the index.
///
/// Failures are reported as [`crate::error::AppError::InternalFailure`].
#[async_trait]
pub trait Storage: Send + Sync {
    // == Tokens ==
    async fn list_tokens(&self, query: &ListQuery<TokenSort>) -> Result<Vec<TokenSummary>>;

    async fn find_token(&self, address: &str) -> Result<Option<TokenSummary>>;

    /// First token matching `criteria`, in storage order.
    async fn find_first_token(&self, criteria: &Criteria) -> Result<Option<TokenSummary>>;

    /// Accounts holding the token, largest balance first.
    async fn token_holders(&self, token_address: &str, page: Page) -> Result<Vec<AccountRecord>>;

    /// Token transfer transactions for the mint, newest first.
    async fn token_transfers(
        &self,
        token_address: &str,
        page: Page,
    ) -> Result<Vec<TransactionRecord>>;

    // == NFTs ==
    async fn list_collections(
        &self,
        query: &ListQuery<CollectionSort>,
    ) -> Result<Vec<NftCollectionRecord>>;

    async fn find_collection(&self, address: &str) -> Result<Option<CollectionDetail>>;

    /// NFTs of a collection by ascending token id.
    async fn collection_nfts(&self, collection_id: u64, page: Page) -> Result<Vec<NftRecord>>;

    async fn find_nft(&self, collection_id: u64, token_id: &str) -> Result<Option<NftRecord>>;

    /// Transfer history of one NFT, newest first.
    async fn nft_transfers(&self, nft_id: u64, page: Page) -> Result<Vec<NftTransferRecord>>;

    // == Validators ==
    /// Every known validator with its block count and no history.
    async fn list_validators(&self) -> Result<Vec<ValidatorRecord>>;

    /// Validator by vote pubkey with up to `recent_blocks` newest blocks.
    async fn find_validator(
        &self,
        vote_pubkey: &str,
        recent_blocks: usize,
    ) -> Result<Option<ValidatorRecord>>;

    /// Validator whose vote or node pubkey equals `pubkey`.
    async fn find_validator_by_pubkey(
        &self,
        pubkey: &str,
        recent_blocks: usize,
    ) -> Result<Option<ValidatorRecord>>;

    // == Transactions and Blocks ==
    async fn find_transaction(&self, hash: &str) -> Result<Option<TransactionRecord>>;

    async fn count_transactions(&self) -> Result<u64>;

    async fn count_blocks(&self) -> Result<u64>;
}
