//! Schedule and run-record models.
//!
//! A [`Schedule`] assigns a departure time and train type to every train
//! on the line. Trains are numbered by position (1-based) and simulated
//! in that order, which need not be departure order.
//!
//! A [`RunRecord`] is the trace of one simulated train: arrival time,
//! available capacity and boarding count at each station, and the
//! offload at the terminus.

use serde::{Deserialize, Serialize};

use super::{ClockTime, Departure, TrainType};

/// A complete timetable (solution to the planning problem).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    departures: Vec<Departure>,
}

impl Schedule {
    /// Creates a schedule from departures in train-number order.
    pub fn new(departures: Vec<Departure>) -> Self {
        Self { departures }
    }

    /// Builds a schedule from parallel time and type lists.
    ///
    /// Extra entries in the longer list are ignored.
    pub fn from_parts(times: &[ClockTime], types: &[TrainType]) -> Self {
        Self::new(
            times
                .iter()
                .zip(types)
                .map(|(&time, &train_type)| Departure::new(time, train_type))
                .collect(),
        )
    }

    /// Departures in train-number order.
    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    /// Departure for a 1-based train number.
    pub fn departure(&self, train_number: usize) -> Option<&Departure> {
        train_number
            .checked_sub(1)
            .and_then(|idx| self.departures.get(idx))
    }

    /// Departure times in train-number order.
    pub fn times(&self) -> Vec<ClockTime> {
        self.departures.iter().map(|d| d.time).collect()
    }

    /// Replaces the departure time of the train at `index` (0-based).
    pub fn set_time(&mut self, index: usize, time: ClockTime) {
        if let Some(d) = self.departures.get_mut(index) {
            *d = d.at(time);
        }
    }

    /// Number of trains.
    pub fn len(&self) -> usize {
        self.departures.len()
    }

    /// Whether the schedule has no trains.
    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// Whether all departure times are pairwise distinct.
    pub fn has_distinct_times(&self) -> bool {
        let mut times = self.times();
        times.sort_unstable();
        times.windows(2).all(|w| w[0] != w[1])
    }
}

/// Arrival at one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRecord {
    /// Arrival time.
    pub arrival: ClockTime,
    /// Free capacity on arrival.
    pub available_capacity: u32,
    /// Passengers boarded.
    pub boarded: u32,
}

/// Trace of one train through the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// 1-based train number.
    pub train_number: usize,
    /// Rolling-stock class.
    pub train_type: TrainType,
    /// Stops at A, B and C, in order.
    pub stops: [StopRecord; 3],
    /// Arrival at the terminus.
    pub terminus_arrival: ClockTime,
    /// Free capacity on arrival at the terminus.
    pub terminus_available: u32,
    /// Passengers leaving the train at the terminus.
    pub offloaded: u32,
}

impl RunRecord {
    /// Total boarded across all stations.
    pub fn total_boarded(&self) -> u32 {
        self.stops.iter().map(|s| s.boarded).sum()
    }

    /// Fraction of seats occupied on arrival at the terminus.
    pub fn load_factor(&self) -> f64 {
        let capacity = self.stops[0].available_capacity;
        if capacity == 0 {
            return 0.0;
        }
        self.offloaded as f64 / capacity as f64
    }
}
