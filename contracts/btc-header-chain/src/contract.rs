use cosmwasm_std::{
    to_json_binary, Addr, Deps, DepsMut, Env, MessageInfo, QueryResponse, Response,
};
use cw2::{get_contract_version, set_contract_version};
use cw_utils::maybe_addr;

use babylon_bitcoin::pow::verify_header_pow;
use babylon_bitcoin::work::to_uint256;
use babylon_bitcoin::BlockHeader;

use crate::access::ensure_authorized;
use crate::error::{ContractError, InitError};
use crate::events::insert_headers_events;
use crate::insert::insert_headers;
use crate::msg::btc_header::{BtcHeader, InsertHeadersResponse};
use crate::msg::contract::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state::header_chain::init_base_header;
use crate::state::{Config, Params, ADMIN, CONFIG, PARAMS};
use crate::validation::BitcoinHeaderValidator;
use crate::{hc, queries};

pub const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn instantiate(
    mut deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let InstantiateMsg {
        network,
        base_header,
        allowed_reporters,
        admin,
    } = msg;

    // The base header is trusted, but it must still carry valid proof-of-work
    let base_btc_header = base_header.block_header()?;
    verify_header_pow(&network.chain_params(), &base_btc_header).map_err(InitError::from)?;
    let own_work = to_uint256(base_btc_header.work());
    if base_header.total_work < own_work {
        return Err(InitError::BaseWorkTooLow {
            total: base_header.total_work,
            own: own_work,
        }
        .into());
    }

    let base = base_header.to_btc_header_info()?;
    init_base_header(deps.storage, &base)?;

    CONFIG.save(deps.storage, &Config { network })?;
    let params = Params::new(deps.api, &allowed_reporters)?;
    PARAMS.save(deps.storage, &params)?;

    let api = deps.api;
    ADMIN.set(deps.branch(), maybe_addr(api, admin)?)?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    hc!(
        deps,
        format!("initialized at height {} with base {}", base.height, base.hash_hex())
    );
    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("base_height", base.height.to_string())
        .add_attribute("base_hash", base.hash_hex()))
}

pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::InvalidContractName {
            expected: CONTRACT_NAME.to_string(),
            actual: stored.contract,
        });
    }
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let api = deps.api;
    match msg {
        ExecuteMsg::BtcHeaders { headers } => {
            let headers_len = headers.len();
            match handle_btc_headers(deps, &info.sender, headers) {
                Ok(resp) => {
                    api.debug(&format!("Successfully handled {headers_len} BTC headers"));
                    Ok(resp)
                }
                Err(e) => {
                    api.debug(&format!("Failed to handle {headers_len} BTC headers: {e}"));
                    Err(e)
                }
            }
        }
        ExecuteMsg::UpdateParams { allowed_reporters } => {
            handle_update_params(deps, &info, &allowed_reporters)
        }
        ExecuteMsg::UpdateAdmin { admin } => ADMIN
            .execute_update_admin(deps, info, maybe_addr(api, admin)?)
            .map_err(Into::into),
    }
}

pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<QueryResponse, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(to_json_binary(&CONFIG.load(deps.storage)?)?),
        QueryMsg::Params {} => Ok(to_json_binary(&PARAMS.load(deps.storage)?)?),
        QueryMsg::Admin {} => to_json_binary(&ADMIN.query_admin(deps)?).map_err(Into::into),
        QueryMsg::BtcBaseHeader {} => Ok(to_json_binary(&queries::btc_base_header(&deps)?)?),
        QueryMsg::BtcTipHeader {} => Ok(to_json_binary(&queries::btc_tip_header(&deps)?)?),
        QueryMsg::BtcHeader { height } => {
            Ok(to_json_binary(&queries::btc_header(&deps, height)?)?)
        }
        QueryMsg::BtcHeaderByHash { hash } => {
            Ok(to_json_binary(&queries::btc_header_by_hash(&deps, &hash)?)?)
        }
        QueryMsg::BtcHeaders {
            start_after,
            limit,
            reverse,
        } => Ok(to_json_binary(&queries::btc_headers(
            &deps,
            start_after,
            limit,
            reverse,
        )?)?),
        QueryMsg::ContainsHeader { hash } => {
            Ok(to_json_binary(&queries::contains_btc_header(&deps, &hash)?)?)
        }
        QueryMsg::HeaderDepth { hash } => {
            Ok(to_json_binary(&queries::header_depth(&deps, &hash)?)?)
        }
        QueryMsg::LargestReorg {} => Ok(to_json_binary(&queries::largest_reorg(&deps)?)?),
    }
}

fn handle_btc_headers(
    deps: DepsMut,
    reporter: &Addr,
    headers: Vec<BtcHeader>,
) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    // Unauthorized reporters are rejected before their headers are even decoded
    ensure_authorized(&params, reporter)?;

    let headers = headers
        .iter()
        .map(BlockHeader::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let cfg = CONFIG.load(deps.storage)?;
    let validator = BitcoinHeaderValidator::new(cfg.network);
    let outcome = insert_headers(deps.storage, &validator, &params, reporter, &headers)?;

    if let Some(rollback) = &outcome.rollback {
        hc!(
            deps,
            format!(
                "reorg of {} headers, from {} to {}",
                rollback.block_diff(),
                rollback.from.hash_hex(),
                rollback.to.hash_hex()
            )
        );
    }

    let data = InsertHeadersResponse {
        tip_height: outcome.tip.height,
        tip_hash: outcome.tip.hash_hex(),
    };
    Ok(Response::new()
        .set_data(to_json_binary(&data)?)
        .add_events(insert_headers_events(&outcome))
        .add_attribute("action", "insert_headers")
        .add_attribute("tip_height", data.tip_height.to_string())
        .add_attribute("tip_hash", data.tip_hash))
}

fn handle_update_params(
    deps: DepsMut,
    info: &MessageInfo,
    allowed_reporters: &[String],
) -> Result<Response, ContractError> {
    ADMIN.assert_admin(deps.as_ref(), &info.sender)?;

    let params = Params::new(deps.api, allowed_reporters)?;
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("action", "update_params")
        .add_attribute(
            "allowed_reporters",
            params.allowed_reporters.len().to_string(),
        ))
}
