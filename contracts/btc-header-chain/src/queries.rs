use std::str::FromStr;

use babylon_bitcoin::BlockHash;
use cosmwasm_std::Deps;

use crate::error::ContractError;
use crate::msg::btc_header::{BtcHeaderResponse, BtcHeadersResponse, LargestReorgResponse};
use crate::state::header_chain::{contains_header, is_on_main_chain};
use crate::state::{
    get_base_header, get_header, get_header_by_hash, get_largest_reorg, get_main_chain, get_tip,
};

const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

pub fn btc_base_header(deps: &Deps) -> Result<BtcHeaderResponse, ContractError> {
    get_base_header(deps.storage)?.try_into()
}

pub fn btc_tip_header(deps: &Deps) -> Result<BtcHeaderResponse, ContractError> {
    get_tip(deps.storage)?.try_into()
}

pub fn btc_header(deps: &Deps, height: u32) -> Result<Option<BtcHeaderResponse>, ContractError> {
    get_header(deps.storage, height)?
        .map(TryInto::try_into)
        .transpose()
}

pub fn btc_header_by_hash(
    deps: &Deps,
    hash: &str,
) -> Result<Option<BtcHeaderResponse>, ContractError> {
    let hash = BlockHash::from_str(hash)?;
    get_header_by_hash(deps.storage, hash.as_ref())?
        .map(TryInto::try_into)
        .transpose()
}

pub fn btc_headers(
    deps: &Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
    reverse: Option<bool>,
) -> Result<BtcHeadersResponse, ContractError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    get_main_chain(deps.storage, start_after, Some(limit), reverse)?.try_into()
}

pub fn contains_btc_header(deps: &Deps, hash: &str) -> Result<bool, ContractError> {
    let hash = BlockHash::from_str(hash)?;
    Ok(contains_header(deps.storage, hash.as_ref()))
}

/// Depth of a main chain header, i.e. how many headers were built on top of it.
pub fn header_depth(deps: &Deps, hash: &str) -> Result<u32, ContractError> {
    let hash = BlockHash::from_str(hash)?;
    let header = crate::state::expect_header_by_hash(deps.storage, hash.as_ref())?;
    if !is_on_main_chain(deps.storage, &header)? {
        return Err(ContractError::HeaderNotOnMainChain(hash.to_string()));
    }
    let tip = get_tip(deps.storage)?;
    Ok(tip.height - header.height)
}

pub fn largest_reorg(deps: &Deps) -> Result<Option<LargestReorgResponse>, ContractError> {
    get_largest_reorg(deps.storage)?
        .map(TryInto::try_into)
        .transpose()
}
