use std::str::FromStr;

use babylon_bitcoin::hash_types::TxMerkleNode;
use babylon_bitcoin::{BlockHash, BlockHeader, CompactTarget, Version};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

use crate::error::ContractError;
use crate::state::{BtcHeaderInfo, LargestReorg};

/// Bitcoin header.
///
/// Contains all the block's information except the actual transactions, but
/// including a root of a [merkle tree] committing to all transactions in the block.
///
/// This struct is for use in RPC requests and responses. It has convenience trait impls to convert
/// to and from the internal representation (`BlockHeader`).
/// Adapted from `BlockHeader`.
#[cw_serde]
pub struct BtcHeader {
    /// Originally protocol version, but repurposed for soft-fork signaling.
    ///
    /// ### Relevant BIPs
    ///
    /// * [BIP9 - Version bits with timeout and delay](https://github.com/bitcoin/bips/blob/master/bip-0009.mediawiki) (current usage)
    /// * [BIP34 - Block v2, Height in Coinbase](https://github.com/bitcoin/bips/blob/master/bip-0034.mediawiki)
    pub version: i32,
    /// Reference to the previous block in the chain.
    /// Encoded as a (byte-reversed) hex string.
    pub prev_blockhash: String,
    /// The root hash of the merkle tree of transactions in the block.
    /// Encoded as a (byte-reversed) hex string.
    pub merkle_root: String,
    pub time: u32,
    /// The target value below which the blockhash must lie, encoded as a
    /// a float (with well-defined rounding, of course).
    pub bits: u32,
    /// The nonce, selected to obtain a low enough blockhash.
    pub nonce: u32,
}

/// Try to convert &BtcHeader to/into BlockHeader
impl TryFrom<&BtcHeader> for BlockHeader {
    type Error = ContractError;

    fn try_from(header: &BtcHeader) -> Result<Self, Self::Error> {
        Ok(Self {
            version: Version::from_consensus(header.version),
            prev_blockhash: BlockHash::from_str(&header.prev_blockhash)?,
            merkle_root: TxMerkleNode::from_str(&header.merkle_root)?,
            time: header.time,
            bits: CompactTarget::from_consensus(header.bits),
            nonce: header.nonce,
        })
    }
}

/// Try to convert BtcHeader to/into BlockHeader
impl TryFrom<BtcHeader> for BlockHeader {
    type Error = ContractError;

    fn try_from(header: BtcHeader) -> Result<Self, Self::Error> {
        Self::try_from(&header)
    }
}

/// Convert &BlockHeader to/into BtcHeader
impl From<&BlockHeader> for BtcHeader {
    fn from(header: &BlockHeader) -> Self {
        Self {
            version: header.version.to_consensus(),
            prev_blockhash: header.prev_blockhash.to_string(),
            merkle_root: header.merkle_root.to_string(),
            time: header.time,
            bits: header.bits.to_consensus(),
            nonce: header.nonce,
        }
    }
}

/// Convert BlockHeader to/into BtcHeader
impl From<BlockHeader> for BtcHeader {
    fn from(header: BlockHeader) -> Self {
        Self::from(&header)
    }
}

/// Try to convert &BtcHeaderInfo to/into BtcHeader
impl TryFrom<&BtcHeaderInfo> for BtcHeader {
    type Error = ContractError;

    fn try_from(btc_header_info: &BtcHeaderInfo) -> Result<Self, Self::Error> {
        Ok(Self::from(btc_header_info.block_header()?))
    }
}

/// Bitcoin header response.
///
/// Adapted from `BtcHeaderInfo`.
#[cw_serde]
pub struct BtcHeaderResponse {
    /// The Bitcoin header.
    pub header: BtcHeader,
    /// Hash of the BTC header.
    /// Encoded as a (byte-reversed) hex string.
    pub hash: String,
    /// The height of the block in the BTC blockchain.
    pub height: u32,
    /// The cumulative total work of this block and all of its ancestors.
    pub cum_work: Uint256,
}

/// Try to convert from `&BtcHeaderInfo` to/into `BtcHeaderResponse`
impl TryFrom<&BtcHeaderInfo> for BtcHeaderResponse {
    type Error = ContractError;

    fn try_from(btc_header_info: &BtcHeaderInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            header: BtcHeader::try_from(btc_header_info)?,
            hash: btc_header_info.hash_hex(),
            height: btc_header_info.height,
            cum_work: btc_header_info.work,
        })
    }
}

/// Try to convert from `BtcHeaderInfo` to/into `BtcHeaderResponse`
impl TryFrom<BtcHeaderInfo> for BtcHeaderResponse {
    type Error = ContractError;

    fn try_from(header: BtcHeaderInfo) -> Result<Self, Self::Error> {
        Self::try_from(&header)
    }
}

/// Bitcoin header responses.
///
/// Vector of `BtcHeaderResponse`.
#[cw_serde]
pub struct BtcHeadersResponse {
    /// The Bitcoin headers.
    pub headers: Vec<BtcHeaderResponse>,
}

impl TryFrom<Vec<BtcHeaderInfo>> for BtcHeadersResponse {
    type Error = ContractError;

    fn try_from(headers: Vec<BtcHeaderInfo>) -> Result<Self, Self::Error> {
        Ok(Self {
            headers: headers
                .iter()
                .map(TryFrom::try_from)
                .collect::<Result<Vec<_>, ContractError>>()?,
        })
    }
}

/// The deepest reorg observed by the header chain.
#[cw_serde]
pub struct LargestReorgResponse {
    /// The tip that was rolled back.
    pub rollback_from: BtcHeaderResponse,
    /// The fork point it was rolled back to.
    pub rollback_to: BtcHeaderResponse,
    /// Number of main chain headers that were rolled back.
    pub block_diff: u32,
}

impl TryFrom<LargestReorg> for LargestReorgResponse {
    type Error = ContractError;

    fn try_from(reorg: LargestReorg) -> Result<Self, Self::Error> {
        Ok(Self {
            rollback_from: (&reorg.rollback_from).try_into()?,
            rollback_to: (&reorg.rollback_to).try_into()?,
            block_diff: reorg.block_diff,
        })
    }
}

/// Data set on the response of a successful `BtcHeaders` execution.
#[cw_serde]
pub struct InsertHeadersResponse {
    /// Height of the tip after the insertion.
    pub tip_height: u32,
    /// Hash of the tip after the insertion, as a (byte-reversed) hex string.
    pub tip_hash: String,
}
