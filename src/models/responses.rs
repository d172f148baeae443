//! Response payloads for the gateway API
//!
//! Field names are camelCase on the wire. Stake totals are decimal strings.

use num_bigint::BigUint;
use serde::Serialize;

use crate::cache::CacheStats;
use crate::chain::{EpochInfo, PerformanceSample, SupplyInfo, VoteAccounts};
use crate::reconcile::{serialize_decimal, sum_stake, NetworkTotals, ReconciledValidator};
use crate::storage::{NftCollectionRecord, NftRecord, TokenSummary, TransactionRecord, ValidatorRecord};

// == Health ==
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339
    pub timestamp: String,
    pub cache: CacheStats,
    pub cache_hit_rate: f64,
    /// Rate windows currently tracked across all clients
    pub rate_limit_windows: usize,
}

impl HealthResponse {
    pub fn healthy(cache: CacheStats, rate_limit_windows: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache_hit_rate: cache.hit_rate(),
            cache,
            rate_limit_windows,
        }
    }
}

// == Validators ==
/// `GET /api/validators`
#[derive(Debug, Clone, Serialize)]
pub struct ValidatorListResponse {
    pub validators: Vec<ReconciledValidator>,
    #[serde(flatten)]
    pub totals: NetworkTotals,
}

// == NFTs ==
/// One NFT together with its collection.
#[derive(Debug, Clone, Serialize)]
pub struct NftDetail {
    #[serde(flatten)]
    pub nft: NftRecord,
    pub collection: NftCollectionRecord,
}

// == Search ==
/// First match of a free-text search, rendered as `{type, result}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "result", rename_all = "lowercase")]
pub enum SearchResult {
    Transaction(TransactionRecord),
    Validator(ValidatorRecord),
    Token(TokenSummary),
}

// == Stats ==
#[derive(Debug, Clone, Serialize)]
pub struct SupplySummary {
    pub total: u64,
    pub circulating: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorCounts {
    pub total: usize,
    pub active: usize,
    pub delinquent: usize,
    /// Stake of the current (non-delinquent) set
    #[serde(serialize_with = "serialize_decimal")]
    pub active_stake: BigUint,
}

impl ValidatorCounts {
    pub fn from_accounts(accounts: &VoteAccounts) -> Self {
        Self {
            total: accounts.current.len() + accounts.delinquent.len(),
            active: accounts.current.len(),
            delinquent: accounts.delinquent.len(),
            active_stake: sum_stake(&accounts.current),
        }
    }
}

/// `GET /api/stats/current`
#[derive(Debug, Clone, Serialize)]
pub struct CurrentStats {
    pub supply: SupplySummary,
    pub validators: ValidatorCounts,
    pub transactions: u64,
    pub blocks: u64,
    pub epoch: EpochInfo,
}

impl CurrentStats {
    pub fn new(
        supply: &SupplyInfo,
        accounts: &VoteAccounts,
        transactions: u64,
        blocks: u64,
        epoch: EpochInfo,
    ) -> Self {
        Self {
            supply: SupplySummary {
                total: supply.total,
                circulating: supply.circulating,
            },
            validators: ValidatorCounts::from_accounts(accounts),
            transactions,
            blocks,
            epoch,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceEntry {
    #[serde(flatten)]
    pub sample: PerformanceSample,
    pub tps: f64,
}

/// `GET /api/stats/performance`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub samples: Vec<PerformanceEntry>,
    /// Total transactions over total sampled seconds
    pub average_tps: f64,
}

impl PerformanceReport {
    pub fn from_samples(samples: Vec<PerformanceSample>) -> Self {
        let transactions: u64 = samples.iter().map(|s| s.num_transactions).sum();
        let seconds: u64 = samples.iter().map(|s| u64::from(s.sample_period_secs)).sum();
        let average_tps = if seconds == 0 {
            0.0
        } else {
            transactions as f64 / seconds as f64
        };

        Self {
            samples: samples
                .into_iter()
                .map(|sample| PerformanceEntry {
                    tps: sample.tps(),
                    sample,
                })
                .collect(),
            average_tps,
        }
    }
}
