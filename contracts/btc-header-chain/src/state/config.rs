use babylon_bitcoin::Network;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, StdResult};
use cw_controllers::Admin;
use cw_storage_plus::Item;

pub const CONFIG: Item<Config> = Item::new("config");
pub const PARAMS: Item<Params> = Item::new("params");
/// Storage for admin
pub const ADMIN: Admin = Admin::new("admin");

/// Config holds the settings fixed at instantiation.
#[cw_serde]
pub struct Config {
    /// Network whose consensus rules the submitted headers must follow.
    pub network: Network,
}

/// Params are the governance-updatable settings of the header chain.
#[cw_serde]
#[derive(Default)]
pub struct Params {
    /// Addresses allowed to submit BTC headers.
    /// An empty list means anyone can submit headers.
    pub allowed_reporters: Vec<Addr>,
}

impl Params {
    /// Builds params from unchecked addresses, rejecting malformed ones.
    pub fn new(api: &dyn Api, allowed_reporters: &[String]) -> StdResult<Self> {
        let mut allowed_reporters = allowed_reporters
            .iter()
            .map(|addr| api.addr_validate(addr))
            .collect::<StdResult<Vec<_>>>()?;
        allowed_reporters.sort();
        allowed_reporters.dedup();
        Ok(Self { allowed_reporters })
    }
}
