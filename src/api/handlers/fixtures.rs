//! Shared handler test fixtures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::AppState;
use crate::chain::{ChainState, EpochInfo, PerformanceSample, SupplyInfo, VoteAccountInfo, VoteAccounts};
use crate::clock::{ManualClock, SharedClock};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::pipeline::RequestContext;
use crate::storage::{
    AccountRecord, BlockRecord, MemoryStorage, NftCollectionRecord, NftRecord, NftTransferRecord,
    StorageSnapshot, TokenRecord, TransactionKind, TransactionRecord, ValidatorRow,
};

pub const VOTE_A: &str = "VoteA111111111111111111111111111111";
pub const VOTE_B: &str = "VoteB111111111111111111111111111111";
pub const VOTE_UNINDEXED: &str = "VoteC111111111111111111111111111111";
pub const VOTE_OFFLINE: &str = "VoteD111111111111111111111111111111";
pub const GOLD: &str = "GoldMint11111111111111111111111111";
pub const SILVER: &str = "SilverMint111111111111111111111111";
pub const PUNKS: &str = "PunksCollection1111111111111111111";
pub const TX_HASH: &str = "TxHash1111111111111111111111111111111111";

/// Chain double with fixed answers and a call counter.
#[derive(Debug, Default)]
pub struct StubChain {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl StubChain {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AppError::ChainUnavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

pub fn vote_account(vote: &str, stake: u64, delinquent: bool) -> VoteAccountInfo {
    VoteAccountInfo {
        node_pubkey: vote.replacen("Vote", "Node", 1),
        vote_pubkey: vote.to_string(),
        commission: if delinquent { 100 } else { 5 },
        last_vote: 1_000,
        root_slot: 968,
        activated_stake: stake,
        delinquent,
    }
}

#[async_trait]
impl ChainState for StubChain {
    async fn fetch_supply(&self) -> Result<SupplyInfo> {
        self.enter()?;
        Ok(SupplyInfo {
            total: 1_000_000,
            circulating: 750_000,
            non_circulating: 250_000,
        })
    }

    async fn fetch_vote_accounts(&self) -> Result<VoteAccounts> {
        self.enter()?;
        Ok(VoteAccounts {
            current: vec![
                vote_account(VOTE_A, 600, false),
                vote_account(VOTE_B, 300, false),
                vote_account(VOTE_UNINDEXED, 50, false),
            ],
            delinquent: vec![vote_account("VoteE111111111111111111111111111111", 25, true)],
        })
    }

    async fn fetch_epoch_info(&self) -> Result<EpochInfo> {
        self.enter()?;
        Ok(EpochInfo {
            epoch: 42,
            slot_index: 100,
            slots_in_epoch: 432_000,
            absolute_slot: 18_144_100,
            block_height: 17_000_000,
            transaction_count: Some(9_999),
        })
    }

    async fn fetch_recent_performance_samples(&self, limit: usize) -> Result<Vec<PerformanceSample>> {
        self.enter()?;
        Ok((0..limit.min(3) as u64)
            .map(|i| PerformanceSample {
                slot: 1_000 - i,
                num_transactions: 1_200,
                num_slots: 150,
                sample_period_secs: 60,
            })
            .collect())
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0)
        .single()
        .unwrap_or_default()
}

fn block(slot: u64, validator: &str) -> BlockRecord {
    BlockRecord {
        slot,
        hash: format!("Block{slot:0>30}"),
        timestamp: at(slot as i64),
        validator: validator.to_string(),
        transaction_count: 2,
    }
}

pub fn snapshot() -> StorageSnapshot {
    StorageSnapshot {
        tokens: vec![
            TokenRecord {
                id: 1,
                address: GOLD.into(),
                name: "Gold".into(),
                symbol: "GLD".into(),
                decimals: 9,
                total_supply: 9_000,
                created_at: at(1),
            },
            TokenRecord {
                id: 2,
                address: SILVER.into(),
                name: "Silver".into(),
                symbol: "SLV".into(),
                decimals: 6,
                total_supply: 100,
                created_at: at(2),
            },
        ],
        accounts: vec![
            AccountRecord {
                id: 1,
                address: "Holder1111111111111111111111111111".into(),
                balance: 70,
                token_ids: vec![1],
            },
            AccountRecord {
                id: 2,
                address: "Holder2222222222222222222222222222".into(),
                balance: 900,
                token_ids: vec![1, 2],
            },
        ],
        transactions: vec![TransactionRecord {
            id: 1,
            hash: TX_HASH.into(),
            slot: 3,
            timestamp: at(3),
            kind: TransactionKind::TokenTransfer,
            from: Some("Holder1111111111111111111111111111".into()),
            to: Some("Holder2222222222222222222222222222".into()),
            amount: 5,
            token_address: Some(GOLD.into()),
        }],
        blocks: vec![block(1, VOTE_A), block(2, VOTE_A), block(3, VOTE_B)],
        validators: vec![
            ValidatorRow {
                vote_pubkey: VOTE_A.into(),
                node_pubkey: VOTE_A.replacen("Vote", "Node", 1),
                name: Some("Alpha".into()),
                created_at: at(0),
            },
            ValidatorRow {
                vote_pubkey: VOTE_B.into(),
                node_pubkey: VOTE_B.replacen("Vote", "Node", 1),
                name: None,
                created_at: at(0),
            },
            ValidatorRow {
                vote_pubkey: VOTE_OFFLINE.into(),
                node_pubkey: VOTE_OFFLINE.replacen("Vote", "Node", 1),
                name: None,
                created_at: at(0),
            },
        ],
        nft_collections: vec![NftCollectionRecord {
            id: 7,
            address: PUNKS.into(),
            name: "Punks".into(),
            symbol: "PNK".into(),
            total_volume: 1_000,
            created_at: at(5),
        }],
        nfts: vec![NftRecord {
            id: 70,
            collection_id: 7,
            token_id: "1".into(),
            owner: Some("Holder1111111111111111111111111111".into()),
            metadata_uri: None,
        }],
        nft_transfers: vec![NftTransferRecord {
            id: 700,
            nft_id: 70,
            from: None,
            to: Some("Holder1111111111111111111111111111".into()),
            transaction_hash: TX_HASH.into(),
            slot: 3,
            created_at: at(3),
        }],
    }
}

/// Fresh state over the fixture snapshot with a manual clock.
pub fn state_with(chain: Arc<StubChain>) -> AppState {
    let clock: SharedClock = Arc::new(ManualClock::new(1_700_000_000_000));
    AppState::from_config(
        &Config::default(),
        Arc::new(MemoryStorage::new(snapshot())),
        chain,
        clock,
    )
}

pub fn state(chain: StubChain) -> AppState {
    state_with(Arc::new(chain))
}

pub fn request(path: &str) -> RequestContext {
    RequestContext::new("127.0.0.1", path)
}

pub fn request_with(path: &str, query: &[(&str, &str)]) -> RequestContext {
    request(path).with_query(
        query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

/// Status and JSON body of a handler response.
pub async fn read(response: axum::response::Response) -> (axum::http::StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
