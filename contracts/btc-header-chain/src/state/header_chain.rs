//! Storage of the BTC header chain.
//!
//! Every verified header is kept in an append-only arena keyed by block hash, across all
//! branches. The canonical branch is described separately by a height-to-hash index that
//! ends at the tip. Reorgs only rewrite that index and the tip pointer; header records are
//! never mutated or removed once stored.

use std::collections::BTreeMap;

use babylon_bitcoin::work::{from_uint256, to_uint256};
use babylon_bitcoin::{deserialize, serialize, BlockHash, BlockHeader, Work};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::Order::{Ascending, Descending};
use cosmwasm_std::{Binary, StdError, StdResult, Storage, Uint256};
use cw_storage_plus::{Bound, Item, Map};

pub const BTC_HEADERS: Map<&[u8], BtcHeaderInfo> = Map::new("btc_hc_headers");
pub const BTC_MAIN_CHAIN: Map<u32, Vec<u8>> = Map::new("btc_hc_main_chain");
pub const BTC_BASE_HEADER: Item<Vec<u8>> = Item::new("btc_hc_base");
pub const BTC_TIP: Item<Vec<u8>> = Item::new("btc_hc_tip");
pub const LARGEST_REORG: Item<LargestReorg> = Item::new("btc_hc_largest_reorg");

/// Error type for the state store.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("The BTC header bytes cannot be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    CosmwasmStd(#[from] StdError),
    #[error("The BTC height {height} is not found in the main chain")]
    HeightNotFound { height: u32 },
    #[error("The BTC header with hash {hash} is not found in the storage")]
    HeaderNotFound { hash: String },
    #[error("The BTC header chain has not been initialized")]
    NotInitialized,
}

impl From<babylon_bitcoin::EncodeError> for StoreError {
    fn from(e: babylon_bitcoin::EncodeError) -> Self {
        Self::Decode(e.to_string())
    }
}

/// A verified BTC header together with its position in the header chain.
#[cw_serde]
pub struct BtcHeaderInfo {
    /// Consensus-encoded 80-byte block header.
    pub header: Binary,
    /// Block hash, in internal byte order.
    pub hash: Binary,
    pub height: u32,
    /// Cumulative work of this header and all of its ancestors.
    pub work: Uint256,
}

impl BtcHeaderInfo {
    pub fn new(header: &BlockHeader, height: u32, cum_work: Work) -> Self {
        Self {
            header: serialize(header).into(),
            hash: serialize(&header.block_hash()).into(),
            height,
            work: to_uint256(cum_work),
        }
    }

    pub fn block_header(&self) -> Result<BlockHeader, StoreError> {
        Ok(deserialize(self.header.as_slice())?)
    }

    pub fn block_hash(&self) -> Result<BlockHash, StoreError> {
        Ok(deserialize(self.hash.as_slice())?)
    }

    pub fn prev_hash(&self) -> Result<BlockHash, StoreError> {
        Ok(self.block_header()?.prev_blockhash)
    }

    pub fn cum_work(&self) -> Work {
        from_uint256(self.work)
    }

    /// Hash as a (byte-reversed) hex string, the way Bitcoin displays block hashes.
    pub fn hash_hex(&self) -> String {
        hash_to_hex(self.hash.as_slice())
    }
}

/// The deepest rollback of the main chain observed so far.
#[cw_serde]
pub struct LargestReorg {
    /// The tip that was abandoned.
    pub rollback_from: BtcHeaderInfo,
    /// The fork point the chain was rolled back to.
    pub rollback_to: BtcHeaderInfo,
    /// `rollback_from.height - rollback_to.height`
    pub block_diff: u32,
}

pub fn hash_to_hex(hash: &[u8]) -> String {
    hex::encode(hash.iter().rev().copied().collect::<Vec<_>>())
}

// Checks if the BTC header chain has been initialised or not.
// The check is done by checking the existence of the base header
pub fn is_initialized(storage: &dyn Storage) -> bool {
    BTC_BASE_HEADER.exists(storage)
}

/// Stores the base header as the root of the main chain and points the tip at it.
pub fn init_base_header(storage: &mut dyn Storage, base_header: &BtcHeaderInfo) -> StdResult<()> {
    put_header(storage, base_header)?;
    BTC_BASE_HEADER.save(storage, &base_header.hash.to_vec())?;
    BTC_MAIN_CHAIN.save(storage, base_header.height, &base_header.hash.to_vec())?;
    set_tip(storage, base_header)
}

pub fn get_base_header(storage: &dyn Storage) -> Result<BtcHeaderInfo, StoreError> {
    let hash = BTC_BASE_HEADER
        .may_load(storage)?
        .ok_or(StoreError::NotInitialized)?;
    expect_header_by_hash(storage, &hash)
}

// getter/setter for chain tip
pub fn get_tip(storage: &dyn Storage) -> Result<BtcHeaderInfo, StoreError> {
    let hash = BTC_TIP.may_load(storage)?.ok_or(StoreError::NotInitialized)?;
    expect_header_by_hash(storage, &hash)
}

pub fn set_tip(storage: &mut dyn Storage, tip: &BtcHeaderInfo) -> StdResult<()> {
    BTC_TIP.save(storage, &tip.hash.to_vec())
}

// getter/setter for the largest reorg record
pub fn get_largest_reorg(storage: &dyn Storage) -> StdResult<Option<LargestReorg>> {
    LARGEST_REORG.may_load(storage)
}

pub fn set_largest_reorg(storage: &mut dyn Storage, reorg: &LargestReorg) -> StdResult<()> {
    LARGEST_REORG.save(storage, reorg)
}

/// Stores a verified header. Storing a hash that is already known is a no-op, as stored
/// headers are immutable.
pub fn put_header(storage: &mut dyn Storage, header: &BtcHeaderInfo) -> StdResult<()> {
    let hash: &[u8] = header.hash.as_slice();
    if BTC_HEADERS.has(storage, hash) {
        return Ok(());
    }
    BTC_HEADERS.save(storage, hash, header)
}

pub fn contains_header(storage: &dyn Storage, hash: &[u8]) -> bool {
    BTC_HEADERS.has(storage, hash)
}

/// Attempts to retrieve the BTC header with the given hash, on any branch.
pub fn get_header_by_hash(
    storage: &dyn Storage,
    hash: &[u8],
) -> StdResult<Option<BtcHeaderInfo>> {
    BTC_HEADERS.may_load(storage, hash)
}

/// Retrieves the BTC header associated with the given block hash.
///
/// Unlike [`get_header_by_hash`], a missing header is an error.
pub fn expect_header_by_hash(
    storage: &dyn Storage,
    hash: &[u8],
) -> Result<BtcHeaderInfo, StoreError> {
    get_header_by_hash(storage, hash)?.ok_or_else(|| StoreError::HeaderNotFound {
        hash: hash_to_hex(hash),
    })
}

/// Retrieves the main chain header at the given height, if the main chain reaches it.
pub fn get_header(storage: &dyn Storage, height: u32) -> Result<Option<BtcHeaderInfo>, StoreError> {
    match BTC_MAIN_CHAIN.may_load(storage, height)? {
        Some(hash) => Ok(Some(expect_header_by_hash(storage, &hash)?)),
        None => Ok(None),
    }
}

pub fn expect_header(storage: &dyn Storage, height: u32) -> Result<BtcHeaderInfo, StoreError> {
    get_header(storage, height)?.ok_or(StoreError::HeightNotFound { height })
}

pub fn is_on_main_chain(storage: &dyn Storage, header: &BtcHeaderInfo) -> StdResult<bool> {
    Ok(BTC_MAIN_CHAIN
        .may_load(storage, header.height)?
        .is_some_and(|hash| hash == header.hash.as_slice()))
}

/// Points the main chain at a new branch.
///
/// Heights in `(fork_height, old_tip_height]` are dropped from the main chain index, then
/// every header of `new_branch` (which must start right above the fork point) is indexed.
pub fn switch_main_chain(
    storage: &mut dyn Storage,
    fork_height: u32,
    old_tip_height: u32,
    new_branch: &[BtcHeaderInfo],
) -> StdResult<()> {
    for height in (fork_height + 1)..=old_tip_height {
        BTC_MAIN_CHAIN.remove(storage, height);
    }
    for header in new_branch {
        BTC_MAIN_CHAIN.save(storage, header.height, &header.hash.to_vec())?;
    }
    Ok(())
}

// Retrieves main chain BTC headers in a given range.
pub fn get_main_chain(
    storage: &dyn Storage,
    start_after: Option<u32>,
    limit: Option<u32>,
    reverse: Option<bool>,
) -> Result<Vec<BtcHeaderInfo>, StoreError> {
    let limit = limit.unwrap_or(10) as usize;
    let reverse = reverse.unwrap_or(false);

    let (start, end, order) = match (start_after, reverse) {
        (Some(start), true) => (None, Some(Bound::exclusive(start)), Descending),
        (Some(start), false) => (Some(Bound::exclusive(start)), None, Ascending),
        (None, true) => (None, None, Descending),
        (None, false) => (None, None, Ascending),
    };

    BTC_MAIN_CHAIN
        .range(storage, start, end, order)
        .take(limit)
        .map(|item| {
            let (_, hash) = item?;
            expect_header_by_hash(storage, &hash)
        })
        .collect()
}

/// Read-only view over the stored header chain and the headers staged by a batch that is
/// still being verified.
pub struct HeaderView<'a> {
    storage: &'a dyn Storage,
    staged: &'a BTreeMap<Vec<u8>, BtcHeaderInfo>,
}

impl<'a> HeaderView<'a> {
    pub fn new(storage: &'a dyn Storage, staged: &'a BTreeMap<Vec<u8>, BtcHeaderInfo>) -> Self {
        Self { storage, staged }
    }

    pub fn base_header(&self) -> Result<BtcHeaderInfo, StoreError> {
        get_base_header(self.storage)
    }

    pub fn header_by_hash(&self, hash: &[u8]) -> Result<Option<BtcHeaderInfo>, StoreError> {
        if let Some(header) = self.staged.get(hash) {
            return Ok(Some(header.clone()));
        }
        Ok(get_header_by_hash(self.storage, hash)?)
    }

    pub fn parent(&self, header: &BtcHeaderInfo) -> Result<BtcHeaderInfo, StoreError> {
        let prev_hash = header.prev_hash()?;
        self.header_by_hash(prev_hash.as_ref())?
            .ok_or_else(|| StoreError::HeaderNotFound {
                hash: prev_hash.to_string(),
            })
    }

    /// Returns the ancestor of `header` at `height`, following `header`'s own branch.
    ///
    /// Walks parent links until the branch meets the main chain, then answers from the
    /// height index.
    pub fn ancestor_at_height(
        &self,
        header: &BtcHeaderInfo,
        height: u32,
    ) -> Result<BtcHeaderInfo, StoreError> {
        let mut current = header.clone();
        loop {
            if current.height == height {
                return Ok(current);
            }
            if current.height < height {
                return Err(StoreError::HeightNotFound { height });
            }
            if is_on_main_chain(self.storage, &current)? {
                return expect_header(self.storage, height);
            }
            current = self.parent(&current)?;
        }
    }
}
