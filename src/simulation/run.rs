//! Train run simulator.
//!
//! Drives one train through A, B and C to the terminus, boarding at each
//! station with whatever capacity is left.

use crate::models::{
    ClockError, ClockTime, DemandModel, Departure, LineConfig, RunRecord, Station, StopRecord,
};

use super::board;

/// A simulated train: its trace plus the waiting cost it charged.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainRun {
    /// Per-station trace.
    pub record: RunRecord,
    /// Passenger-minutes charged by this train's stops.
    pub wait_cost: u64,
}

/// Arrival times at A, B, C and the terminus.
///
/// Fails if any arrival falls outside the operating window.
pub fn arrival_times(departure: ClockTime, line: &LineConfig) -> Result<[ClockTime; 4], ClockError> {
    let [ab, bc, cu] = line.leg_minutes();
    let at_b = departure.advance(ab)?;
    let at_c = at_b.advance(bc)?;
    let at_u = at_c.advance(cu)?;
    Ok([departure, at_b, at_c, at_u])
}

/// Runs train `train_number` (1-based) against the working demand.
///
/// Arrival times are resolved before any passenger boards, so a train that
/// would overrun the operating window leaves `demand` untouched.
pub fn run_train(
    train_number: usize,
    departure: &Departure,
    line: &LineConfig,
    demand: &mut DemandModel,
) -> Result<TrainRun, ClockError> {
    let arrivals = arrival_times(departure.time, line)?;
    let max_capacity = line.capacity(departure.train_type);
    let mut capacity = max_capacity;
    let mut wait_cost = 0;

    let stops = Station::ALL.map(|station| {
        let arrival = arrivals[station.index()];
        let boarding = board(capacity, arrival, station, demand);
        let stop = StopRecord {
            arrival,
            available_capacity: capacity,
            boarded: boarding.boarded,
        };
        capacity -= boarding.boarded;
        wait_cost += boarding.wait_cost;
        stop
    });

    Ok(TrainRun {
        record: RunRecord {
            train_number,
            train_type: departure.train_type,
            stops,
            terminus_arrival: arrivals[3],
            terminus_available: capacity,
            offloaded: max_capacity - capacity,
        },
        wait_cost,
    })
}
