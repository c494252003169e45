//! Admission of new BTC headers into the header chain.
//!
//! A batch is fully verified before anything is written: the reporter must be authorized,
//! the batch must attach to a stored header, every header in it must be new, and every
//! header must pass the [`HeaderValidator`] on top of its predecessor. Only then are the
//! headers stored and the fork choice rule applied to the branch they end.

use std::collections::BTreeMap;

use babylon_bitcoin::BlockHeader;
use cosmwasm_std::{Addr, Storage};

use crate::access::ensure_authorized;
use crate::error::InsertError;
use crate::fork_choice::{self, Decision};
use crate::reorg::{find_fork_point, track_reorg, Rollback};
use crate::state::header_chain::{
    contains_header, get_header_by_hash, get_tip, is_initialized, put_header, set_tip,
    switch_main_chain,
};
use crate::state::{BtcHeaderInfo, HeaderView, Params, StoreError};
use crate::validation::{child_height, HeaderValidator};

/// Result of a successful insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    /// The tip after the insertion, whether or not it changed.
    pub tip: BtcHeaderInfo,
    /// The newly stored headers, in the order they were submitted.
    pub inserted: Vec<BtcHeaderInfo>,
    /// Headers that joined the main chain, in ascending height order. Besides new
    /// headers this includes previously stored side-branch headers the new tip builds on.
    /// Empty if the tip did not change.
    pub roll_forward: Vec<BtcHeaderInfo>,
    /// Set when the new tip does not directly extend the previous one.
    pub rollback: Option<Rollback>,
}

impl InsertOutcome {
    pub fn tip_changed(&self) -> bool {
        !self.roll_forward.is_empty()
    }
}

/// Inserts a batch of consecutive headers submitted by `reporter`.
///
/// The first header must extend a stored header, which does not need to be on the main
/// chain. The headers are stored even if their branch does not end up as the tip.
pub fn insert_headers<V: HeaderValidator + ?Sized>(
    storage: &mut dyn Storage,
    validator: &V,
    params: &Params,
    reporter: &Addr,
    headers: &[BlockHeader],
) -> Result<InsertOutcome, InsertError> {
    ensure_authorized(params, reporter)?;
    if !is_initialized(storage) {
        return Err(StoreError::NotInitialized.into());
    }

    let first = headers.first().ok_or(InsertError::EmptyHeaders)?;
    let attachment = get_header_by_hash(storage, first.prev_blockhash.as_ref())?
        .ok_or_else(|| InsertError::ParentNotFound(first.prev_blockhash.to_string()))?;

    for header in headers {
        let hash = header.block_hash();
        if contains_header(storage, hash.as_ref()) {
            return Err(InsertError::ForkStartWithKnownHeader(hash.to_string()));
        }
    }

    let (staged, candidate) = stage_headers(storage, validator, &attachment, headers)?;
    commit(storage, &attachment, staged, candidate)
}

/// Verifies `headers` on top of `attachment`, computing the height and cumulative work
/// of each.
///
/// Returns the staged headers together with the last one, which is `attachment` itself
/// only if `headers` is empty.
fn stage_headers<V: HeaderValidator + ?Sized>(
    storage: &dyn Storage,
    validator: &V,
    attachment: &BtcHeaderInfo,
    headers: &[BlockHeader],
) -> Result<(Vec<BtcHeaderInfo>, BtcHeaderInfo), InsertError> {
    let mut staged = Vec::with_capacity(headers.len());
    let mut staged_by_hash = BTreeMap::new();
    let mut parent = attachment.clone();

    for (index, header) in headers.iter().enumerate() {
        let invalid = |source| InsertError::InvalidHeader { index, source };
        let height = child_height(&parent).map_err(invalid)?;

        let view = HeaderView::new(storage, &staged_by_hash);
        let work = validator
            .validate(&view, &parent, header)
            .map_err(invalid)?;

        let info = BtcHeaderInfo::new(header, height, parent.cum_work() + work);
        staged_by_hash.insert(info.hash.to_vec(), info.clone());
        staged.push(info.clone());
        parent = info;
    }

    Ok((staged, parent))
}

fn commit(
    storage: &mut dyn Storage,
    attachment: &BtcHeaderInfo,
    staged: Vec<BtcHeaderInfo>,
    candidate: BtcHeaderInfo,
) -> Result<InsertOutcome, InsertError> {
    let current_tip = get_tip(storage)?;

    match fork_choice::select(&current_tip, &candidate) {
        Decision::KeepCurrent => {
            for header in &staged {
                put_header(storage, header)?;
            }
            Ok(InsertOutcome {
                tip: current_tip,
                inserted: staged,
                roll_forward: vec![],
                rollback: None,
            })
        }
        Decision::SwitchToCandidate => {
            let (fork_point, mut roll_forward) = find_fork_point(storage, attachment)?;
            roll_forward.extend(staged.iter().cloned());

            for header in &staged {
                put_header(storage, header)?;
            }
            let rollback = track_reorg(storage, &current_tip, &fork_point)?;
            switch_main_chain(storage, fork_point.height, current_tip.height, &roll_forward)?;
            set_tip(storage, &candidate)?;

            Ok(InsertOutcome {
                tip: candidate,
                inserted: staged,
                roll_forward,
                rollback,
            })
        }
    }
}
