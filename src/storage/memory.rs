//! In-memory storage
//!
//! Answers every [`Storage`] query from a [`StorageSnapshot`] held in memory.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use super::query::{CollectionSort, Criteria, Field, Filter, ListQuery, Page, TokenSort};
use super::records::{
    AccountRecord, BlockRecord, CollectionDetail, NftCollectionRecord, NftRecord,
    NftTransferRecord, StorageSnapshot, TokenRecord, TokenSummary, TransactionKind,
    TransactionRecord, ValidatorRecord, ValidatorRow,
};
use super::Storage;
use crate::error::Result;

// == Memory Storage ==
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<StorageSnapshot>,
}

impl MemoryStorage {
    pub fn new(snapshot: StorageSnapshot) -> Self {
        Self {
            data: Arc::new(snapshot),
        }
    }

    /// Loads a JSON snapshot from disk.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading storage snapshot {}", path.display()))?;
        let snapshot: StorageSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("parsing storage snapshot {}", path.display()))?;
        Ok(Self::new(snapshot))
    }

    fn holder_counts(&self) -> HashMap<u64, usize> {
        let mut counts = HashMap::new();
        for account in &self.data.accounts {
            for token_id in &account.token_ids {
                *counts.entry(*token_id).or_insert(0) += 1;
            }
        }
        counts
    }

    fn summarize(&self, token: &TokenRecord) -> TokenSummary {
        let holder_count = self
            .data
            .accounts
            .iter()
            .filter(|a| a.token_ids.contains(&token.id))
            .count();
        TokenSummary {
            token: token.clone(),
            holder_count,
        }
    }

    fn blocks_by(&self, vote_pubkey: &str) -> impl Iterator<Item = &BlockRecord> {
        let vote_pubkey = vote_pubkey.to_string();
        self.data
            .blocks
            .iter()
            .filter(move |b| b.validator == vote_pubkey)
    }

    fn validator_record(&self, row: &ValidatorRow, recent_blocks: usize) -> ValidatorRecord {
        let mut blocks: Vec<BlockRecord> = self.blocks_by(&row.vote_pubkey).cloned().collect();
        let block_count = blocks.len() as u64;
        blocks.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        blocks.truncate(recent_blocks);

        ValidatorRecord {
            vote_pubkey: row.vote_pubkey.clone(),
            node_pubkey: row.node_pubkey.clone(),
            name: row.name.clone(),
            block_count,
            historical_blocks: blocks,
        }
    }

    fn find_token_record(&self, address: &str) -> Option<&TokenRecord> {
        let by_address = Filter::Equals(Field::Address, address.to_string());
        self.data.tokens.iter().find(|t| by_address.matches(*t))
    }
}

fn compare_tokens(
    a: &TokenSummary,
    b: &TokenSummary,
    sort: TokenSort,
) -> Ordering {
    match sort {
        TokenSort::CreatedAt => a.token.created_at.cmp(&b.token.created_at),
        TokenSort::TotalSupply => a.token.total_supply.cmp(&b.token.total_supply),
        TokenSort::Holders => a.holder_count.cmp(&b.holder_count),
    }
}

fn compare_collections(
    a: &NftCollectionRecord,
    b: &NftCollectionRecord,
    sort: CollectionSort,
) -> Ordering {
    match sort {
        CollectionSort::CreatedAt => a.created_at.cmp(&b.created_at),
        CollectionSort::Name => a.name.cmp(&b.name),
        CollectionSort::Symbol => a.symbol.cmp(&b.symbol),
        CollectionSort::TotalVolume => a.total_volume.cmp(&b.total_volume),
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list_tokens(&self, query: &ListQuery<TokenSort>) -> Result<Vec<TokenSummary>> {
        let counts = self.holder_counts();
        let mut tokens: Vec<TokenSummary> = self
            .data
            .tokens
            .iter()
            .filter(|t| query.criteria.matches(*t))
            .map(|t| TokenSummary {
                token: t.clone(),
                holder_count: counts.get(&t.id).copied().unwrap_or(0),
            })
            .collect();

        tokens.sort_by(|a, b| query.order.apply(compare_tokens(a, b, query.sort)));
        Ok(query.page.slice(tokens))
    }

    async fn find_token(&self, address: &str) -> Result<Option<TokenSummary>> {
        Ok(self.find_token_record(address).map(|t| self.summarize(t)))
    }

    async fn find_first_token(&self, criteria: &Criteria) -> Result<Option<TokenSummary>> {
        Ok(self
            .data
            .tokens
            .iter()
            .find(|t| criteria.matches(*t))
            .map(|t| self.summarize(t)))
    }

    async fn token_holders(&self, token_address: &str, page: Page) -> Result<Vec<AccountRecord>> {
        let Some(token) = self.find_token_record(token_address) else {
            return Ok(Vec::new());
        };

        let mut holders: Vec<AccountRecord> = self
            .data
            .accounts
            .iter()
            .filter(|a| a.token_ids.contains(&token.id))
            .cloned()
            .collect();
        holders.sort_by(|a, b| b.balance.cmp(&a.balance));
        Ok(page.slice(holders))
    }

    async fn token_transfers(
        &self,
        token_address: &str,
        page: Page,
    ) -> Result<Vec<TransactionRecord>> {
        let mut transfers: Vec<TransactionRecord> = self
            .data
            .transactions
            .iter()
            .filter(|tx| {
                tx.kind == TransactionKind::TokenTransfer
                    && tx.token_address.as_deref() == Some(token_address)
            })
            .cloned()
            .collect();
        transfers.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(page.slice(transfers))
    }

    async fn list_collections(
        &self,
        query: &ListQuery<CollectionSort>,
    ) -> Result<Vec<NftCollectionRecord>> {
        let mut collections: Vec<NftCollectionRecord> = self
            .data
            .nft_collections
            .iter()
            .filter(|c| query.criteria.matches(*c))
            .cloned()
            .collect();

        collections.sort_by(|a, b| query.order.apply(compare_collections(a, b, query.sort)));
        Ok(query.page.slice(collections))
    }

    async fn find_collection(&self, address: &str) -> Result<Option<CollectionDetail>> {
        let Some(collection) = self.data.nft_collections.iter().find(|c| c.address == address)
        else {
            return Ok(None);
        };

        let nft_count = self
            .data
            .nfts
            .iter()
            .filter(|n| n.collection_id == collection.id)
            .count();
        Ok(Some(CollectionDetail {
            collection: collection.clone(),
            nft_count,
        }))
    }

    async fn collection_nfts(&self, collection_id: u64, page: Page) -> Result<Vec<NftRecord>> {
        let mut nfts: Vec<NftRecord> = self
            .data
            .nfts
            .iter()
            .filter(|n| n.collection_id == collection_id)
            .cloned()
            .collect();
        nfts.sort_by(|a, b| a.token_id.cmp(&b.token_id));
        Ok(page.slice(nfts))
    }

    async fn find_nft(&self, collection_id: u64, token_id: &str) -> Result<Option<NftRecord>> {
        Ok(self
            .data
            .nfts
            .iter()
            .find(|n| n.collection_id == collection_id && n.token_id == token_id)
            .cloned())
    }

    async fn nft_transfers(&self, nft_id: u64, page: Page) -> Result<Vec<NftTransferRecord>> {
        let mut transfers: Vec<NftTransferRecord> = self
            .data
            .nft_transfers
            .iter()
            .filter(|t| t.nft_id == nft_id)
            .cloned()
            .collect();
        transfers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(transfers))
    }

    async fn list_validators(&self) -> Result<Vec<ValidatorRecord>> {
        Ok(self
            .data
            .validators
            .iter()
            .map(|row| self.validator_record(row, 0))
            .collect())
    }

    async fn find_validator(
        &self,
        vote_pubkey: &str,
        recent_blocks: usize,
    ) -> Result<Option<ValidatorRecord>> {
        Ok(self
            .data
            .validators
            .iter()
            .find(|row| row.vote_pubkey == vote_pubkey)
            .map(|row| self.validator_record(row, recent_blocks)))
    }

    async fn find_validator_by_pubkey(
        &self,
        pubkey: &str,
        recent_blocks: usize,
    ) -> Result<Option<ValidatorRecord>> {
        let either_key = Criteria::all()
            .or(Filter::Equals(Field::VotePubkey, pubkey.to_string()))
            .or(Filter::Equals(Field::NodePubkey, pubkey.to_string()));
        Ok(self
            .data
            .validators
            .iter()
            .find(|row| either_key.matches(*row))
            .map(|row| self.validator_record(row, recent_blocks)))
    }

    async fn find_transaction(&self, hash: &str) -> Result<Option<TransactionRecord>> {
        let by_hash = Filter::Equals(Field::Hash, hash.to_string());
        Ok(self
            .data
            .transactions
            .iter()
            .find(|tx| by_hash.matches(*tx))
            .cloned())
    }

    async fn count_transactions(&self) -> Result<u64> {
        Ok(self.data.transactions.len() as u64)
    }

    async fn count_blocks(&self) -> Result<u64> {
        Ok(self.data.blocks.len() as u64)
    }
}
