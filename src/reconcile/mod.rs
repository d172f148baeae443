//! Data Reconciler
//!
//! Joins live vote accounts with indexed validator records. The node decides
//! which validators exist; storage only contributes block history.


use std::collections::{HashMap, HashSet};

use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::chain::{SupplyInfo, VoteAccountInfo, VoteAccounts};
use crate::error::AppError;
use crate::storage::{BlockRecord, Field, Filterable, SortOrder, ValidatorRecord, ValidatorSort};

// == Reconciled Validator ==
/// One validator as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledValidator {
    pub vote_pubkey: String,
    pub node_pubkey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub activated_stake: u64,
    pub commission: u8,
    pub last_vote: u64,
    pub root_slot: u64,
    pub delinquent: bool,
    /// Blocks produced according to the index, 0 when not yet indexed
    pub block_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_blocks: Option<Vec<BlockRecord>>,
}

impl ReconciledValidator {
    fn from_parts(
        account: &VoteAccountInfo,
        record: Option<&ValidatorRecord>,
        delinquent: bool,
    ) -> Self {
        Self {
            vote_pubkey: account.vote_pubkey.clone(),
            node_pubkey: account.node_pubkey.clone(),
            name: record.and_then(|r| r.name.clone()),
            activated_stake: account.activated_stake,
            commission: account.commission,
            last_vote: account.last_vote,
            root_slot: account.root_slot,
            delinquent,
            block_count: record.map(|r| r.block_count).unwrap_or(0),
            historical_blocks: None,
        }
    }
}

impl Filterable for ReconciledValidator {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::VotePubkey => Some(&self.vote_pubkey),
            Field::NodePubkey => Some(&self.node_pubkey),
            Field::Name => self.name.as_deref(),
            _ => None,
        }
    }
}

// == Errors ==
/// Why a single-validator lookup failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Known on-chain (or not) but never indexed
    #[error("Validator not found")]
    ValidatorNotFoundInStorage(String),

    /// Indexed, but absent from the node's current vote accounts
    #[error("Validator not found in current vote accounts")]
    ValidatorNotFoundInChainState(String),
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

// == Validators ==
/// Left outer join of `current ++ delinquent` with storage records.
///
/// One entry per distinct vote pubkey, first occurrence wins. `delinquent`
/// reflects membership in the delinquent list.
pub fn reconcile_validators(
    current: &[VoteAccountInfo],
    delinquent: &[VoteAccountInfo],
    records: &[ValidatorRecord],
) -> Vec<ReconciledValidator> {
    let by_vote: HashMap<&str, &ValidatorRecord> = records
        .iter()
        .map(|r| (r.vote_pubkey.as_str(), r))
        .collect();
    let delinquent_keys: HashSet<&str> =
        delinquent.iter().map(|v| v.vote_pubkey.as_str()).collect();

    let mut seen = HashSet::with_capacity(current.len() + delinquent.len());
    current
        .iter()
        .chain(delinquent)
        .filter(|account| seen.insert(account.vote_pubkey.as_str()))
        .map(|account| {
            let key = account.vote_pubkey.as_str();
            ReconciledValidator::from_parts(
                account,
                by_vote.get(key).copied(),
                delinquent_keys.contains(key),
            )
        })
        .collect()
}

/// Joins one validator, storage record first.
pub fn reconcile_one(
    vote_pubkey: &str,
    record: Option<ValidatorRecord>,
    accounts: &VoteAccounts,
) -> Result<ReconciledValidator, ReconcileError> {
    let record = record
        .ok_or_else(|| ReconcileError::ValidatorNotFoundInStorage(vote_pubkey.to_string()))?;

    let account = accounts
        .current
        .iter()
        .chain(&accounts.delinquent)
        .find(|v| v.vote_pubkey == vote_pubkey)
        .ok_or_else(|| ReconcileError::ValidatorNotFoundInChainState(vote_pubkey.to_string()))?;

    let delinquent = accounts
        .delinquent
        .iter()
        .any(|v| v.vote_pubkey == vote_pubkey);

    let mut validator = ReconciledValidator::from_parts(account, Some(&record), delinquent);
    validator.historical_blocks = Some(record.historical_blocks);
    Ok(validator)
}

/// Orders validators in place. `Natural` keeps node order.
pub fn sort_validators(validators: &mut [ReconciledValidator], sort: ValidatorSort, order: SortOrder) {
    match sort {
        ValidatorSort::Natural => {}
        ValidatorSort::Stake => {
            validators.sort_by(|a, b| order.apply(a.activated_stake.cmp(&b.activated_stake)))
        }
        ValidatorSort::Commission => {
            validators.sort_by(|a, b| order.apply(a.commission.cmp(&b.commission)))
        }
    }
}

// == Totals ==
/// Network-wide stake and supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTotals {
    #[serde(serialize_with = "serialize_decimal")]
    pub total_stake: BigUint,
    pub total_supply: u64,
}

/// Sums activated stake without overflow.
pub fn sum_stake<'a, I>(validators: I) -> BigUint
where
    I: IntoIterator<Item = &'a VoteAccountInfo>,
{
    validators
        .into_iter()
        .fold(BigUint::default(), |acc, v| acc + v.activated_stake)
}

/// Total stake across `validators` alongside the supply total, unchanged.
pub fn reconcile_network_totals<'a, I>(validators: I, supply: &SupplyInfo) -> NetworkTotals
where
    I: IntoIterator<Item = &'a VoteAccountInfo>,
{
    NetworkTotals {
        total_stake: sum_stake(validators),
        total_supply: supply.total,
    }
}

/// Renders a big integer as a JSON string of decimal digits.
pub fn serialize_decimal<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_str_radix(10))
}
