use cosmwasm_std::Uint512;

use crate::error::Error;
use crate::{BlockHash, BlockHeader, Params, Target, Uint256};

/// Ensures the header's hash <= the header's target <= pow limit.
pub fn verify_header_pow(chain_params: &Params, header: &BlockHeader) -> Result<(), Error> {
    let target = header.target();

    // ensure the target <= pow_limit
    if target > chain_params.max_attainable_target {
        return Err(Error::TargetTooLarge);
    }

    // ensure the header's hash <= target
    // NOTE: validate_pow ensures two things
    // - the given required_target is same
    // - the header hash is smaller than required_target
    // The former must be true since we give this header's target
    // Here we are interested in the latter check, in which the code is private
    header
        .validate_pow(target)
        .map_err(Error::InvalidProofOfWork)?;

    Ok(())
}

/// Ensures `header` points to the block with hash `parent_hash`.
pub fn verify_header_linkage(parent_hash: BlockHash, header: &BlockHeader) -> Result<(), Error> {
    if header.prev_blockhash != parent_hash {
        return Err(Error::PrevHashMismatch {
            got: header.prev_blockhash,
            expected: parent_hash,
        });
    }
    Ok(())
}

/// Checks if a Bitcoin height is on a difficulty change boundary.
///
/// In Bitcoin, difficulty is adjusted every 2016 blocks (approximately every 2 weeks).
pub fn is_difficulty_change_boundary(height: u32, chain_params: &Params) -> bool {
    let difficulty_adjustment_interval = chain_params.difficulty_adjustment_interval() as u32;
    height >= difficulty_adjustment_interval && height % difficulty_adjustment_interval == 0
}

/// Computes the target of the first block of a new difficulty period.
///
/// `first_block_time` is the timestamp of the first block of the closing period and
/// `last_block_time` the timestamp of its last block. The adjustment is clamped to
/// `[previous / 4, previous * 4]` and never exceeds the pow limit.
///
/// <https://github.com/bitcoin/bitcoin/blob/89b910711c004c21b7d67baa888073742f7f94f0/src/pow.cpp#L49-L72>
pub fn next_target(
    previous_target: Target,
    first_block_time: u64,
    last_block_time: u64,
    params: &Params,
) -> Target {
    let pow_target_timespan = params.pow_target_timespan;
    let actual_timespan = last_block_time
        .saturating_sub(first_block_time)
        .clamp(pow_target_timespan / 4, pow_target_timespan * 4);

    // the product may not fit in 256 bits for easy targets
    let target = Uint256::from_be_bytes(previous_target.to_be_bytes())
        .full_mul(Uint256::from(actual_timespan))
        / Uint512::from(Uint256::from(pow_target_timespan));

    let pow_limit = params.max_attainable_target;
    match Uint256::try_from(target) {
        Ok(target) if Target::from_be_bytes(target.to_be_bytes()) <= pow_limit => {
            Target::from_be_bytes(target.to_be_bytes())
        }
        _ => pow_limit,
    }
}
