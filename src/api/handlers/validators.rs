//! Validator endpoints

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::Value;

use super::{AppState, STANDARD};
use crate::chain::VoteAccounts;
use crate::error::Result;
use crate::models::{validate_pubkey, ListRequest, ValidatorListResponse};
use crate::pipeline::{to_json, RequestContext};
use crate::reconcile::{reconcile_network_totals, reconcile_one, reconcile_validators, sort_validators};
use crate::storage::{Criteria, Field, ValidatorSort};

const VALIDATOR_SORTS: &[&str] = &["createdAt", "stake", "commission"];
const DETAIL_RECENT_BLOCKS: usize = 100;

/// Validators keep node order unless sorted by stake or commission.
fn validator_sort(sort_by: Option<&str>) -> ValidatorSort {
    match sort_by {
        Some("stake") => ValidatorSort::Stake,
        Some("commission") => ValidatorSort::Commission,
        _ => ValidatorSort::Natural,
    }
}

/// Handler for GET /api/validators
pub async fn list_validators(State(state): State<AppState>, request: RequestContext) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &STANDARD,
            || ListRequest::parse(&request.query, VALIDATOR_SORTS),
            |params| validator_list(&state, params),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn validator_list(state: &AppState, params: ListRequest) -> Result<Value> {
    let (accounts, supply, records) = tokio::try_join!(
        state.chain.fetch_vote_accounts(),
        state.chain.fetch_supply(),
        state.storage.list_validators(),
    )?;

    // Totals always cover the whole network, whatever the page shows
    let totals = reconcile_network_totals(
        accounts.current.iter().chain(&accounts.delinquent),
        &supply,
    );
    let mut validators = reconcile_validators(&accounts.current, &accounts.delinquent, &records);

    if let Some(term) = &params.search {
        let criteria =
            Criteria::text_search(term, &[Field::VotePubkey, Field::NodePubkey, Field::Name]);
        validators.retain(|validator| criteria.matches(validator));
    }
    sort_validators(
        &mut validators,
        validator_sort(params.sort_by.as_deref()),
        params.order,
    );
    if let Some(page) = params.explicit_page() {
        validators = page.slice(validators);
    }

    to_json(&ValidatorListResponse { validators, totals })
}

/// Handler for GET /api/validators/:pubkey
pub async fn get_validator(
    State(state): State<AppState>,
    request: RequestContext,
    Path(pubkey): Path<String>,
) -> Response {
    let outcome = state
        .pipeline
        .execute(
            &request,
            &STANDARD,
            || validate_pubkey(&pubkey),
            |pubkey| validator_detail(&state, pubkey),
        )
        .await;
    state.pipeline.respond(outcome)
}

async fn validator_detail(state: &AppState, pubkey: String) -> Result<Value> {
    let record = state
        .storage
        .find_validator(&pubkey, DETAIL_RECENT_BLOCKS)
        .await?;

    // An unindexed validator is reported without consulting the node
    let accounts = match record {
        Some(_) => state.chain.fetch_vote_accounts().await?,
        None => VoteAccounts::default(),
    };

    let validator = reconcile_one(&pubkey, record, &accounts)?;
    to_json(&validator)
}
