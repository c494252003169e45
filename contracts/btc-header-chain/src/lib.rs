#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{Binary, Deps, DepsMut, Env, MessageInfo, Response};

use crate::error::ContractError;
pub use crate::msg::ExecuteMsg;
use crate::msg::contract::MigrateMsg;
use crate::msg::InstantiateMsg;
use crate::msg::QueryMsg;
pub use babylon_bitcoin::Network;

pub mod access;
pub mod contract;
pub mod error;
pub mod events;
pub mod fork_choice;
pub mod insert;
pub mod msg;
pub mod queries;
pub mod reorg;
pub mod state;
pub mod validation;

#[cfg(test)]
mod multitest;
#[cfg(test)]
mod test_utils;

#[macro_export]
macro_rules! contract_debug {
    // Generic version (contract_debug!("prefix", "..."))
    ($deps:expr, $prefix:expr, $msg:expr) => {
        $deps
            .api
            .debug(&format!("contracts::cosmos::{}: {}", $prefix, $msg))
    };
    // With error (contract_debug!("prefix", "error: {e:?}"))
    ($deps:expr, $prefix:expr, $msg:expr, $e:expr) => {
        $deps.api.debug(&format!(
            "contracts::cosmos::{}: {}: {:?}",
            $prefix, $msg, $e
        ))
    };
}

// Contract-specific shortcuts
#[macro_export]
macro_rules! hc {
    ($deps:expr, $($arg:tt)*) => {
        // Shortcut for the header chain contract (hc!("..."))
        $crate::contract_debug!($deps, "hc", $($arg)*)
    };
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    contract::instantiate(deps, env, info, msg)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    contract::query(deps, env, msg)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, env: Env, msg: MigrateMsg) -> Result<Response, ContractError> {
    contract::migrate(deps, env, msg)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    contract::execute(deps, env, info, msg)
}
