//! Selection of the canonical tip among competing branches.

use crate::state::BtcHeaderInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    KeepCurrent,
    SwitchToCandidate,
}

/// The branch with the most cumulative work wins.
///
/// Ties keep the current tip, so equal-work branches cannot make the tip flap. Height is
/// never considered, as with variable difficulty it says little about the work behind a
/// branch.
pub fn select(current_tip: &BtcHeaderInfo, candidate_tip: &BtcHeaderInfo) -> Decision {
    if candidate_tip.work > current_tip.work {
        Decision::SwitchToCandidate
    } else {
        Decision::KeepCurrent
    }
}
