//! Train and departure models.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ClockTime;

/// Rolling-stock class of a train.
///
/// Capacities are configured per line, see [`super::LineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainType {
    /// Four-car set (small).
    L4,
    /// Eight-car set (large).
    L8,
}

impl fmt::Display for TrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainType::L4 => f.write_str("L4"),
            TrainType::L8 => f.write_str("L8"),
        }
    }
}

/// Departure of one train from the origin station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// Departure time from station A.
    pub time: ClockTime,
    /// Rolling-stock class.
    pub train_type: TrainType,
}

impl Departure {
    /// Creates a departure.
    pub fn new(time: ClockTime, train_type: TrainType) -> Self {
        Self { time, train_type }
    }

    /// Returns a copy departing at `time`.
    pub fn at(self, time: ClockTime) -> Self {
        Self { time, ..self }
    }
}
