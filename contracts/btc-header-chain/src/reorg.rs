//! Reorg detection and the largest-reorg record.

use cosmwasm_std::{StdResult, Storage};

use crate::state::header_chain::{
    expect_header_by_hash, get_largest_reorg, is_on_main_chain, set_largest_reorg,
};
use crate::state::{BtcHeaderInfo, LargestReorg, StoreError};

/// A rollback of the main chain caused by a tip switch.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollback {
    /// The tip before the switch.
    pub from: BtcHeaderInfo,
    /// The fork point, i.e. the highest header the old and new branch share.
    pub to: BtcHeaderInfo,
    /// Whether this rollback replaced the largest-reorg record.
    pub is_largest: bool,
}

impl Rollback {
    pub fn block_diff(&self) -> u32 {
        self.from.height - self.to.height
    }
}

/// Finds where the branch ending at `attachment` joins the main chain.
///
/// Returns the fork point and the stored headers between it (exclusive) and `attachment`
/// (inclusive), in ascending height order. When `attachment` is on the main chain it is
/// its own fork point and the list is empty.
pub fn find_fork_point(
    storage: &dyn Storage,
    attachment: &BtcHeaderInfo,
) -> Result<(BtcHeaderInfo, Vec<BtcHeaderInfo>), StoreError> {
    let mut off_main_chain = vec![];
    let mut current = attachment.clone();
    while !is_on_main_chain(storage, &current)? {
        let parent = expect_header_by_hash(storage, current.prev_hash()?.as_ref())?;
        off_main_chain.push(current);
        current = parent;
    }
    off_main_chain.reverse();
    Ok((current, off_main_chain))
}

/// Records the rollback from `old_tip` down to `fork_point`, if there is one.
///
/// Returns `None` when the new branch directly extends `old_tip`. The largest-reorg
/// record is only replaced by a strictly deeper rollback.
pub fn track_reorg(
    storage: &mut dyn Storage,
    old_tip: &BtcHeaderInfo,
    fork_point: &BtcHeaderInfo,
) -> StdResult<Option<Rollback>> {
    if old_tip.hash == fork_point.hash || old_tip.height <= fork_point.height {
        return Ok(None);
    }

    let block_diff = old_tip.height - fork_point.height;
    let is_largest = match get_largest_reorg(storage)? {
        Some(recorded) => block_diff > recorded.block_diff,
        None => true,
    };
    if is_largest {
        set_largest_reorg(
            storage,
            &LargestReorg {
                rollback_from: old_tip.clone(),
                rollback_to: fork_point.clone(),
                block_diff,
            },
        )?;
    }

    Ok(Some(Rollback {
        from: old_tip.clone(),
        to: fork_point.clone(),
        is_largest,
    }))
}
