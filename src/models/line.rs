//! Line topology constants.
//!
//! The line is fixed: stations A, B and C in order, then the terminus U.
//! Only run times and train capacities are configurable.

use serde::{Deserialize, Serialize};

use super::TrainType;

/// Run times (minutes) and capacities for the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Dwell at each station before departing (minutes).
    pub dwell_minutes: u32,
    /// Travel time A → B (minutes).
    pub a_to_b_minutes: u32,
    /// Travel time B → C (minutes).
    pub b_to_c_minutes: u32,
    /// Travel time C → terminus (minutes).
    pub c_to_terminus_minutes: u32,
    /// Passenger capacity of an L4 set.
    pub l4_capacity: u32,
    /// Passenger capacity of an L8 set.
    pub l8_capacity: u32,
}

impl LineConfig {
    /// Capacity of a train type.
    pub fn capacity(&self, train_type: TrainType) -> u32 {
        match train_type {
            TrainType::L4 => self.l4_capacity,
            TrainType::L8 => self.l8_capacity,
        }
    }

    /// Minutes from arriving at each stop to arriving at the next:
    /// A → B, B → C, C → terminus.
    pub fn leg_minutes(&self) -> [u32; 3] {
        [
            self.dwell_minutes + self.a_to_b_minutes,
            self.dwell_minutes + self.b_to_c_minutes,
            self.dwell_minutes + self.c_to_terminus_minutes,
        ]
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            dwell_minutes: 3,
            a_to_b_minutes: 8,
            b_to_c_minutes: 9,
            c_to_terminus_minutes: 11,
            l4_capacity: 200,
            l8_capacity: 400,
        }
    }
}
