//! Persisted record types
//!
//! Rows as the index stores them, plus the joined shapes queries return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::query::{Field, Filterable};

// == Tokens ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub id: u64,
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: u64,
    pub created_at: DateTime<Utc>,
}

/// Token joined with the number of accounts holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    #[serde(flatten)]
    pub token: TokenRecord,
    pub holder_count: usize,
}

impl Filterable for TokenRecord {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Address => Some(&self.address),
            Field::Name => Some(&self.name),
            Field::Symbol => Some(&self.symbol),
            _ => None,
        }
    }
}

// == Accounts ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: u64,
    pub address: String,
    pub balance: u64,
    /// Tokens this account holds
    #[serde(default)]
    pub token_ids: Vec<u64>,
}

// == Transactions and Blocks ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Transfer,
    TokenTransfer,
    NftTransfer,
    Vote,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: u64,
    pub hash: String,
    pub slot: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub amount: u64,
    /// Mint address for token transfers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
}

impl Filterable for TransactionRecord {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Hash => Some(&self.hash),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub slot: u64,
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    /// Vote account of the leader that produced the block
    pub validator: String,
    #[serde(default)]
    pub transaction_count: u64,
}

// == Validators ==
/// Validator row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorRow {
    pub vote_pubkey: String,
    pub node_pubkey: String,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Filterable for ValidatorRow {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::VotePubkey => Some(&self.vote_pubkey),
            Field::NodePubkey => Some(&self.node_pubkey),
            Field::Name => self.name.as_deref(),
            _ => None,
        }
    }
}

/// Validator with its produced-block count and, on detail lookups, its most
/// recent blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorRecord {
    pub vote_pubkey: String,
    pub node_pubkey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub block_count: u64,
    pub historical_blocks: Vec<BlockRecord>,
}

// == NFTs ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftCollectionRecord {
    pub id: u64,
    pub address: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub total_volume: u64,
    pub created_at: DateTime<Utc>,
}

impl Filterable for NftCollectionRecord {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Address => Some(&self.address),
            Field::Name => Some(&self.name),
            Field::Symbol => Some(&self.symbol),
            _ => None,
        }
    }
}

/// Collection joined with the number of NFTs it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetail {
    #[serde(flatten)]
    pub collection: NftCollectionRecord,
    pub nft_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftRecord {
    pub id: u64,
    pub collection_id: u64,
    pub token_id: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub metadata_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftTransferRecord {
    pub id: u64,
    pub nft_id: u64,
    pub from: Option<String>,
    pub to: Option<String>,
    pub transaction_hash: String,
    pub slot: u64,
    pub created_at: DateTime<Utc>,
}

// == Snapshot ==
/// Complete storage contents, as loaded from a JSON snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSnapshot {
    pub tokens: Vec<TokenRecord>,
    pub accounts: Vec<AccountRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub blocks: Vec<BlockRecord>,
    pub validators: Vec<ValidatorRow>,
    pub nft_collections: Vec<NftCollectionRecord>,
    pub nfts: Vec<NftRecord>,
    pub nft_transfers: Vec<NftTransferRecord>,
}
