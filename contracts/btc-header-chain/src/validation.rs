//! Verifies Bitcoin block headers before they are admitted into the header chain.
//!
//! The header chain itself is agnostic of how a header is judged valid: it asks a
//! [`HeaderValidator`] about each new header, in order, given the header it extends. The
//! [`BitcoinHeaderValidator`] enforces the Bitcoin consensus rules on headers:
//! - linkage to the parent header;
//! - difficulty bits matching the retarget rules;
//! - the BIP-113 median-time-past rule;
//! - proof-of-work.
//!
//! It mirrors the checks done by Bitcoin Core and Babylon's Go implementation.

use babylon_bitcoin::chain_params::MEDIAN_TIME_SPAN;
use babylon_bitcoin::pow::{
    is_difficulty_change_boundary, next_target, verify_header_linkage, verify_header_pow,
};
use babylon_bitcoin::{BlockHash, BlockHeader, Network, Params, Target, Work};

use crate::state::{BtcHeaderInfo, HeaderView, StoreError};

/// Errors that can occur during BTC header verification.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum HeaderError {
    #[error("Header's target exceeds the chain's maximum difficulty limit")]
    TargetTooLarge,

    #[error("Proof-of-work hash does not satisfy the claim difficulty: {0:?}")]
    InvalidProofOfWork(bitcoin::block::ValidationError),

    #[error("Header's prev_blockhash {got} does not match parent header's hash {expected}")]
    PrevHashMismatch { got: BlockHash, expected: BlockHash },

    #[error("Header's difficulty bits mismatch: {{ got: {got:?}, expected: {expected:?} }}")]
    BadDifficultyBits { got: Target, expected: Target },

    /// Block's timestamp is too old.
    #[error("Time is the median time of last 11 blocks or before")]
    TimeTooOld,

    #[error("The BTC header height overflows above {parent_height}")]
    HeightOverflow { parent_height: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<babylon_bitcoin::error::Error> for HeaderError {
    fn from(e: babylon_bitcoin::error::Error) -> Self {
        use babylon_bitcoin::error::Error;
        match e {
            Error::TargetTooLarge => Self::TargetTooLarge,
            Error::InvalidProofOfWork(e) => Self::InvalidProofOfWork(e),
            Error::PrevHashMismatch { got, expected } => Self::PrevHashMismatch { got, expected },
        }
    }
}

/// Height of a header extending `parent`.
pub fn child_height(parent: &BtcHeaderInfo) -> Result<u32, HeaderError> {
    parent
        .height
        .checked_add(1)
        .ok_or(HeaderError::HeightOverflow {
            parent_height: parent.height,
        })
}

/// Decides whether a header may extend a given parent.
pub trait HeaderValidator {
    /// Checks `header` as the child of `parent`, and returns the work it contributes.
    ///
    /// `view` gives access to the ancestors of `parent`, including the headers of the
    /// current batch that have not been committed yet.
    fn validate(
        &self,
        view: &HeaderView,
        parent: &BtcHeaderInfo,
        header: &BlockHeader,
    ) -> Result<Work, HeaderError>;
}

/// Validates headers against the consensus rules of a Bitcoin network.
pub struct BitcoinHeaderValidator {
    network: Network,
    params: Params,
}

impl BitcoinHeaderValidator {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            params: network.chain_params(),
        }
    }

    /// > Ensure the difficulty specified in the block header matches
    /// > the calculated difficulty based on the previous block and
    /// > difficulty retarget rules.
    ///
    /// Also enforces the BIP-113 timestamp rule once enough ancestors are known.
    ///
    /// https://pkg.go.dev/github.com/btcsuite/btcd@v0.24.2/blockchain#CheckBlockHeaderContext
    fn check_block_header_context(
        &self,
        view: &HeaderView,
        parent: &BtcHeaderInfo,
        parent_header: &BlockHeader,
        header: &BlockHeader,
    ) -> Result<(), HeaderError> {
        let expected_target = self.next_work_required(view, parent, parent_header)?;
        let expected_bits = expected_target.to_compact_lossy().to_consensus();

        let actual_target = header.target();
        let actual_bits = actual_target.to_compact_lossy().to_consensus();

        if actual_bits != expected_bits {
            return Err(HeaderError::BadDifficultyBits {
                got: actual_target,
                expected: expected_target,
            });
        }

        // BIP 113
        let height = child_height(parent)?;
        let base_height = view.base_header()?.height;

        if height.saturating_sub(base_height) >= MEDIAN_TIME_SPAN as u32
            && height >= self.network.csv_height()
        {
            let mtp = median_time_past(view, parent)?;
            if header.time <= mtp {
                return Err(HeaderError::TimeTooOld);
            }
        }

        Ok(())
    }

    /// Usually, it's just the target of the parent. However, if we are on a retarget
    /// boundary, it is calculated from the timestamps of the last difficulty period
    /// (2016 blocks, about two weeks on Bitcoin mainnet) on the parent's branch.
    ///
    /// <https://github.com/bitcoin/bitcoin/blob/89b910711c004c21b7d67baa888073742f7f94f0/src/pow.cpp#L13>
    fn next_work_required(
        &self,
        view: &HeaderView,
        parent: &BtcHeaderInfo,
        parent_header: &BlockHeader,
    ) -> Result<Target, HeaderError> {
        let height = child_height(parent)?;
        if self.params.no_pow_retargeting
            || !is_difficulty_change_boundary(height, &self.params)
        {
            return Ok(parent_header.target());
        }

        let interval = self.params.difficulty_adjustment_interval() as u32;
        let first_block = view
            .ancestor_at_height(parent, height - interval)?
            .block_header()?;

        Ok(next_target(
            parent_header.target(),
            first_block.time.into(),
            parent_header.time.into(),
            &self.params,
        ))
    }
}

impl HeaderValidator for BitcoinHeaderValidator {
    fn validate(
        &self,
        view: &HeaderView,
        parent: &BtcHeaderInfo,
        header: &BlockHeader,
    ) -> Result<Work, HeaderError> {
        let parent_header = parent.block_header()?;

        verify_header_linkage(parent_header.block_hash(), header)?;

        self.check_block_header_context(view, parent, &parent_header, header)?;

        // Perform proof-of-work check as specified in:
        // https://pkg.go.dev/github.com/btcsuite/btcd@v0.24.2/blockchain#CheckBlockHeaderSanity
        verify_header_pow(&self.params, header)?;

        Ok(header.work())
    }
}

/// Calculates the median timestamp of `header` and its ancestors, over the last
/// [`MEDIAN_TIME_SPAN`] headers.
fn median_time_past(view: &HeaderView, header: &BtcHeaderInfo) -> Result<u32, HeaderError> {
    let mut timestamps = Vec::with_capacity(MEDIAN_TIME_SPAN);
    let mut current = header.clone();
    loop {
        timestamps.push(current.block_header()?.time);
        if timestamps.len() == MEDIAN_TIME_SPAN {
            break;
        }
        current = view.parent(&current)?;
    }

    timestamps.sort_unstable();
    Ok(timestamps[timestamps.len() / 2])
}
