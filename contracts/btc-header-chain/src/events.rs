use cosmwasm_std::Event;

use crate::insert::InsertOutcome;
use crate::reorg::Rollback;
use crate::state::BtcHeaderInfo;

/// Emitted for every header stored by a batch, on any branch.
pub fn new_header_inserted_event(header: &BtcHeaderInfo) -> Event {
    Event::new("btc_header_inserted")
        .add_attribute("hash", header.hash_hex())
        .add_attribute("height", header.height.to_string())
        .add_attribute("cum_work", header.work.to_string())
}

/// Emitted for every header that joined the main chain.
pub fn new_roll_forward_event(header: &BtcHeaderInfo) -> Event {
    Event::new("btc_roll_forward")
        .add_attribute("hash", header.hash_hex())
        .add_attribute("height", header.height.to_string())
}

/// Emitted once per tip switch that did not extend the previous tip.
pub fn new_roll_back_event(rollback: &Rollback) -> Event {
    Event::new("btc_roll_back")
        .add_attribute("from_hash", rollback.from.hash_hex())
        .add_attribute("from_height", rollback.from.height.to_string())
        .add_attribute("to_hash", rollback.to.hash_hex())
        .add_attribute("to_height", rollback.to.height.to_string())
        .add_attribute("block_diff", rollback.block_diff().to_string())
}

pub fn new_largest_reorg_updated_event(rollback: &Rollback) -> Event {
    Event::new("btc_largest_reorg_updated")
        .add_attribute("from_hash", rollback.from.hash_hex())
        .add_attribute("to_hash", rollback.to.hash_hex())
        .add_attribute("block_diff", rollback.block_diff().to_string())
}

/// All events describing the effects of an insertion.
///
/// The roll back (if any) comes before the roll forward events, the same order in which a
/// node would observe the switch.
pub fn insert_headers_events(outcome: &InsertOutcome) -> Vec<Event> {
    let mut events: Vec<Event> = outcome
        .inserted
        .iter()
        .map(new_header_inserted_event)
        .collect();

    if let Some(rollback) = &outcome.rollback {
        events.push(new_roll_back_event(rollback));
        if rollback.is_largest {
            events.push(new_largest_reorg_updated_event(rollback));
        }
    }
    events.extend(outcome.roll_forward.iter().map(new_roll_forward_event));

    events
}
