//! Helpers for generating regtest header chains in tests.

use babylon_bitcoin::hash_types::TxMerkleNode;
use babylon_bitcoin::work::from_uint256;
use babylon_bitcoin::{BlockHeader, Uint256, Version, Work};
use bitcoin::blockdata::constants::genesis_block;
use bitcoin::hashes::Hash;
use cosmwasm_std::Storage;
use rand::Rng;

use crate::msg::btc_header::BtcHeader;
use crate::msg::contract::BaseHeader;
use crate::state::header_chain::{init_base_header, BtcHeaderInfo};
use crate::state::HeaderView;
use crate::validation::{HeaderError, HeaderValidator};

/// Time between two generated headers, in seconds.
const BLOCK_INTERVAL: u32 = 600;

pub(crate) fn regtest_genesis() -> BlockHeader {
    genesis_block(bitcoin::Network::Regtest).header
}

pub(crate) fn work(value: u64) -> Work {
    from_uint256(Uint256::from(value))
}

/// Builds a header on top of `parent` and grinds the nonce until it meets the regtest target.
pub(crate) fn mine_header<R: Rng>(rng: &mut R, parent: &BlockHeader) -> BlockHeader {
    let mut header = BlockHeader {
        version: Version::from_consensus(4),
        prev_blockhash: parent.block_hash(),
        merkle_root: TxMerkleNode::from_byte_array(rng.gen()),
        time: parent.time + BLOCK_INTERVAL,
        bits: parent.bits,
        nonce: 0,
    };
    while header.validate_pow(header.target()).is_err() {
        header.nonce += 1;
    }
    header
}

/// Generates `len` consecutive valid regtest headers starting from `parent`.
pub(crate) fn gen_chain<R: Rng>(rng: &mut R, parent: &BlockHeader, len: usize) -> Vec<BlockHeader> {
    let mut parent = *parent;
    (0..len)
        .map(|_| {
            parent = mine_header(rng, &parent);
            parent
        })
        .collect()
}

pub(crate) fn to_btc_headers(headers: &[BlockHeader]) -> Vec<BtcHeader> {
    headers.iter().map(BtcHeader::from).collect()
}

/// Base header message for the regtest genesis block at the given height and work.
pub(crate) fn regtest_base_header(height: u32, total_work: u64) -> BaseHeader {
    BaseHeader {
        header: regtest_genesis().into(),
        height,
        total_work: Uint256::from(total_work),
    }
}

/// Initialises the header chain storage with the regtest genesis as base header.
pub(crate) fn init_storage(storage: &mut dyn Storage, height: u32, total_work: u64) -> BtcHeaderInfo {
    let base = BtcHeaderInfo::new(&regtest_genesis(), height, work(total_work));
    init_base_header(storage, &base).unwrap();
    base
}

/// Validator that only checks linkage and credits every header with the same work.
pub(crate) struct FixedWorkValidator {
    pub(crate) work: Work,
}

impl FixedWorkValidator {
    pub(crate) fn new(work_per_header: u64) -> Self {
        Self {
            work: work(work_per_header),
        }
    }
}

impl HeaderValidator for FixedWorkValidator {
    fn validate(
        &self,
        _view: &HeaderView,
        parent: &BtcHeaderInfo,
        header: &BlockHeader,
    ) -> Result<Work, HeaderError> {
        babylon_bitcoin::pow::verify_header_linkage(parent.block_hash()?, header)?;
        Ok(self.work)
    }
}
