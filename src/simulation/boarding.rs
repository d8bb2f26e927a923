//! Station boarding engine.
//!
//! # Algorithm
//!
//! 1. Passengers still waiting from earlier slots are swept forward into
//!    the arrival slot. Each swept passenger costs 10 minutes per slot
//!    waited.
//! 2. Passengers in the arrival slot board in FIFO fashion up to the
//!    train's remaining capacity. Each boarder costs the minutes between
//!    the slot boundary and the train's arrival.
//!
//! The demand model is consumed in place, so calls for one station must
//! be applied in the order trains are processed.

use serde::{Deserialize, Serialize};

use crate::models::clock::SLOT_MINUTES;
use crate::models::{ClockTime, DemandModel, Station};

/// Outcome of one train stopping at one station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boarding {
    /// Passengers who boarded.
    pub boarded: u32,
    /// Passenger-minutes of waiting charged by this stop.
    pub wait_cost: u64,
}

/// Boards waiting passengers at `station` onto a train arriving at `arrival`.
///
/// A train with no free capacity boards nobody, costs nothing and leaves
/// `demand` untouched. A station without a profile (or a profile shorter
/// than the arrival slot) is treated as having no passengers.
pub fn board(
    capacity: u32,
    arrival: ClockTime,
    station: Station,
    demand: &mut DemandModel,
) -> Boarding {
    if capacity == 0 {
        return Boarding::default();
    }
    let Some(profile) = demand.profile_mut(station) else {
        return Boarding::default();
    };
    let counts = profile.counts_mut();
    let slot = arrival.slot_index();
    if slot >= counts.len() {
        return Boarding::default();
    }

    let mut wait_cost = 0u64;
    let (earlier, rest) = counts.split_at_mut(slot);
    let queue = &mut rest[0];

    // Sweep unserved passengers forward
    for (idx, count) in earlier.iter_mut().enumerate() {
        let waiting = std::mem::take(count);
        if waiting > 0 {
            let slots_waited = (slot - idx) as u64;
            *queue += waiting;
            wait_cost += waiting as u64 * slots_waited * SLOT_MINUTES as u64;
        }
    }

    let boarded = (*queue).min(capacity);
    *queue -= boarded;
    wait_cost += boarded as u64 * arrival.minutes_since(arrival.slot()) as u64;

    Boarding { boarded, wait_cost }
}
