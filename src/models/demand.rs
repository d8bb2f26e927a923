//! Passenger demand model.
//!
//! Each station holds a [`DemandProfile`]: the number of passengers
//! arriving in each 10-minute slot between 07:00 and 10:00. During a
//! simulation the profile doubles as the waiting queue: unserved
//! passengers are swept forward into later slots and removed as they
//! board. A [`DemandModel`] is therefore cloned for every evaluation and
//! the canonical copy is never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::clock::SLOT_COUNT;

/// A passenger-bearing station, in line order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Station {
    /// First stop; trains originate here.
    A,
    /// Second stop.
    B,
    /// Third stop before the terminus.
    C,
}

impl Station {
    /// All stations in visiting order.
    pub const ALL: [Station; 3] = [Station::A, Station::B, Station::C];

    /// Position in visiting order.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Station::A => "A",
            Station::B => "B",
            Station::C => "C",
        };
        f.write_str(id)
    }
}

/// Passenger counts per slot at one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandProfile {
    counts: Vec<u32>,
}

impl DemandProfile {
    /// Creates a profile from per-slot counts.
    ///
    /// Length is checked by [`crate::validation::validate_problem`].
    pub fn new(counts: Vec<u32>) -> Self {
        Self { counts }
    }

    /// Per-slot counts.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Mutable per-slot counts.
    pub fn counts_mut(&mut self) -> &mut [u32] {
        &mut self.counts
    }

    /// Passengers still waiting or yet to arrive.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Whether the profile covers every slot.
    pub fn is_complete(&self) -> bool {
        self.counts.len() == SLOT_COUNT
    }
}

/// Demand for every station on the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandModel {
    stations: BTreeMap<Station, DemandProfile>,
}

impl DemandModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self {
            stations: BTreeMap::new(),
        }
    }

    /// Sets the profile for a station.
    pub fn with_station(mut self, station: Station, counts: Vec<u32>) -> Self {
        self.stations.insert(station, DemandProfile::new(counts));
        self
    }

    /// Profile for a station.
    pub fn profile(&self, station: Station) -> Option<&DemandProfile> {
        self.stations.get(&station)
    }

    /// Mutable profile for a station.
    pub fn profile_mut(&mut self, station: Station) -> Option<&mut DemandProfile> {
        self.stations.get_mut(&station)
    }

    /// Stations that carry a profile.
    pub fn stations(&self) -> impl Iterator<Item = Station> + '_ {
        self.stations.keys().copied()
    }

    /// Total passengers across all stations and slots.
    pub fn total_passengers(&self) -> u64 {
        self.stations.values().map(DemandProfile::total).sum()
    }

    /// The reference morning peak for the three-station line.
    pub fn reference() -> Self {
        Self::new()
            .with_station(
                Station::A,
                vec![
                    25, 50, 75, 100, 125, 150, 125, 100, 75, 50, 45, 40, 35, 30, 25, 20, 15, 10, 5,
                ],
            )
            .with_station(
                Station::B,
                vec![
                    50, 75, 100, 125, 150, 175, 150, 125, 100, 100, 75, 75, 50, 45, 35, 25, 20, 15,
                    10,
                ],
            )
            .with_station(
                Station::C,
                vec![
                    50, 100, 150, 200, 250, 200, 175, 150, 150, 125, 100, 75, 50, 50, 45, 40, 35,
                    30, 25,
                ],
            )
    }
}

impl Default for DemandModel {
    fn default() -> Self {
        Self::new()
    }
}
