use babylon_bitcoin::work::from_uint256;
use babylon_bitcoin::{BlockHeader, Network, Uint256};
use cosmwasm_schema::{cw_serde, QueryResponses};
#[cfg(not(target_arch = "wasm32"))]
use {
    crate::msg::btc_header::{BtcHeaderResponse, BtcHeadersResponse, LargestReorgResponse},
    crate::state::{Config, Params},
    cw_controllers::AdminResponse,
};

use crate::error::ContractError;
use crate::msg::btc_header::BtcHeader;
use crate::state::BtcHeaderInfo;

#[cw_serde]
pub struct InstantiateMsg {
    pub network: Network,
    /// The header the chain starts from. It does not need to be the genesis block.
    pub base_header: BaseHeader,
    /// Addresses allowed to submit headers. Empty means anyone can.
    #[serde(default)]
    pub allowed_reporters: Vec<String>,
    pub admin: Option<String>,
}

/// A trusted header together with its position in the Bitcoin chain.
#[cw_serde]
pub struct BaseHeader {
    pub header: BtcHeader,
    pub height: u32,
    /// Cumulative work of the chain up to and including this header.
    pub total_work: Uint256,
}

impl BaseHeader {
    pub fn block_header(&self) -> Result<BlockHeader, ContractError> {
        BlockHeader::try_from(&self.header)
    }

    pub fn to_btc_header_info(&self) -> Result<BtcHeaderInfo, ContractError> {
        let block_header = self.block_header()?;
        Ok(BtcHeaderInfo::new(
            &block_header,
            self.height,
            from_uint256(self.total_work),
        ))
    }
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Submit new BTC headers to the header chain.
    ///
    /// The headers must be consecutive, and the first one must extend a header already in
    /// the chain (on any branch).
    BtcHeaders { headers: Vec<BtcHeader> },
    /// Replaces the set of allowed reporters.
    /// Only the admin can update it.
    UpdateParams { allowed_reporters: Vec<String> },
    /// Sets or unsets the admin of the contract.
    UpdateAdmin { admin: Option<String> },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(Params)]
    Params {},
    /// Returns the current admin of the contract.
    #[returns(AdminResponse)]
    Admin {},
    #[returns(BtcHeaderResponse)]
    BtcBaseHeader {},
    #[returns(BtcHeaderResponse)]
    BtcTipHeader {},
    /// Main chain header at the given height.
    #[returns(Option<BtcHeaderResponse>)]
    BtcHeader { height: u32 },
    /// Header with the given hash, on any branch.
    #[returns(Option<BtcHeaderResponse>)]
    BtcHeaderByHash { hash: String },
    /// Main chain headers, in ascending height order unless `reverse` is set.
    #[returns(BtcHeadersResponse)]
    BtcHeaders {
        start_after: Option<u32>,
        limit: Option<u32>,
        reverse: Option<bool>,
    },
    /// Whether a header with the given hash is stored, on any branch.
    #[returns(bool)]
    ContainsHeader { hash: String },
    /// Number of headers on top of the given main chain header.
    #[returns(u32)]
    HeaderDepth { hash: String },
    #[returns(Option<LargestReorgResponse>)]
    LargestReorg {},
}

#[cw_serde]
pub struct MigrateMsg {}
