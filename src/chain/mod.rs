//! Chain-State Module
//!
//! Live data from the JSON-RPC node. No caching and no retries happen here.

mod client;
mod types;

use async_trait::async_trait;

pub use client::RpcChainClient;
pub use types::{EpochInfo, PerformanceSample, SupplyInfo, VoteAccountInfo, VoteAccounts};

use crate::error::Result;

/// Read access to live chain state.
///
/// Implementations convert every failure into
/// [`crate::error::AppError::ChainUnavailable`].
#[async_trait]
pub trait ChainState: Send + Sync {
    async fn fetch_supply(&self) -> Result<SupplyInfo>;

    async fn fetch_vote_accounts(&self) -> Result<VoteAccounts>;

    async fn fetch_epoch_info(&self) -> Result<EpochInfo>;

    /// Most recent performance samples, newest first, at most `limit`.
    async fn fetch_recent_performance_samples(&self, limit: usize) -> Result<Vec<PerformanceSample>>;
}
