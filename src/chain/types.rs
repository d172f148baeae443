//! Chain-state wire types
//!
//! Shapes returned by the JSON-RPC node, in the node's camelCase naming.

use serde::{Deserialize, Serialize};

/// One vote account as reported by `getVoteAccounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteAccountInfo {
    pub node_pubkey: String,
    pub vote_pubkey: String,
    pub commission: u8,
    #[serde(default)]
    pub last_vote: u64,
    #[serde(default)]
    pub root_slot: u64,
    /// Lamports; totals are summed in arbitrary precision
    pub activated_stake: u64,
    #[serde(default)]
    pub delinquent: bool,
}

/// Result of `getVoteAccounts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteAccounts {
    #[serde(default)]
    pub current: Vec<VoteAccountInfo>,
    #[serde(default)]
    pub delinquent: Vec<VoteAccountInfo>,
}

/// Result of `getSupply`, in lamports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyInfo {
    pub total: u64,
    pub circulating: u64,
    #[serde(default)]
    pub non_circulating: u64,
}

/// Result of `getEpochInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochInfo {
    pub epoch: u64,
    pub slot_index: u64,
    pub slots_in_epoch: u64,
    pub absolute_slot: u64,
    #[serde(default)]
    pub block_height: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<u64>,
}

/// One entry of `getRecentPerformanceSamples`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub slot: u64,
    pub num_transactions: u64,
    pub num_slots: u64,
    pub sample_period_secs: u16,
}

impl PerformanceSample {
    /// Transactions per second over the sample period.
    pub fn tps(&self) -> f64 {
        if self.sample_period_secs == 0 {
            0.0
        } else {
            self.num_transactions as f64 / f64::from(self.sample_period_secs)
        }
    }
}

/// Some results arrive wrapped in `{context, value}`, others bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MaybeContextual<T> {
    WithContext { value: T },
    Bare(T),
}

impl<T> MaybeContextual<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            MaybeContextual::WithContext { value } => value,
            MaybeContextual::Bare(value) => value,
        }
    }
}
