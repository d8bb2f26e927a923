//! Move neighborhoods for timetable local search.
//!
//! A move shifts a few departure times by small signed offsets. The
//! neighborhood decides which trains are touched and by how much.
//!
//! # Offsets
//!
//! An offset width `w` yields the deltas `0..w` shifted down by `w / 2`.
//! A width of 10 gives -5..=4 minutes, a width of 20 gives -10..=9.

use itertools::Itertools;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{ClockError, Schedule};

/// Shifts applied in order to one or more departure times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftMove {
    /// `(train index, minutes)` pairs; an index may repeat.
    pub shifts: Vec<(usize, i32)>,
}

impl ShiftMove {
    /// Creates a move from `(train index, minutes)` pairs.
    pub fn new(shifts: Vec<(usize, i32)>) -> Self {
        Self { shifts }
    }

    /// Applies the move to a copy of `schedule`.
    ///
    /// Indices past the end are ignored.
    pub fn apply(&self, schedule: &Schedule) -> Result<Schedule, ClockError> {
        let mut candidate = schedule.clone();
        for &(idx, delta) in &self.shifts {
            if let Some(d) = candidate.departures().get(idx) {
                let shifted = d.time.shift(delta)?;
                candidate.set_time(idx, shifted);
            }
        }
        Ok(candidate)
    }

    /// Whether the move leaves every time unchanged.
    pub fn is_identity(&self) -> bool {
        self.shifts.iter().all(|&(_, delta)| delta == 0)
    }
}

/// Generates candidate moves for a timetable of `len` trains.
pub trait Neighborhood {
    /// Moves to evaluate in search pass `pass` (0-based).
    fn moves(&self, len: usize, pass: usize) -> Vec<ShiftMove>;

    /// Offset width used by this neighborhood.
    fn offset_width(&self) -> u32;
}

fn deltas(width: u32) -> impl Iterator<Item = i32> + Clone {
    let mid = (width / 2) as i32;
    (0..width as i32).map(move |i| i - mid)
}

/// Every combination of `coordinates` train indices and offsets.
///
/// Indices are drawn with repetition, so one train may be shifted twice
/// in a single move. With 2 coordinates, width 10 and 16 trains this is
/// 16² × 10² = 25,600 moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftNeighborhood {
    /// Number of times perturbed per move.
    pub coordinates: usize,
    /// Offset width.
    pub offset_width: u32,
}

impl ShiftNeighborhood {
    /// Creates an exhaustive neighborhood.
    pub fn new(coordinates: usize, offset_width: u32) -> Self {
        Self {
            coordinates,
            offset_width,
        }
    }
}

impl Neighborhood for ShiftNeighborhood {
    fn moves(&self, len: usize, _pass: usize) -> Vec<ShiftMove> {
        if self.coordinates == 0 || self.offset_width == 0 || len == 0 {
            return Vec::new();
        }
        let index_tuples: Vec<Vec<usize>> = (0..self.coordinates)
            .map(|_| 0..len)
            .multi_cartesian_product()
            .collect();

        // Offsets vary slowest, indices fastest
        (0..self.coordinates)
            .map(|_| deltas(self.offset_width))
            .multi_cartesian_product()
            .flat_map(|offsets| {
                index_tuples.iter().map(move |indices| {
                    ShiftMove::new(indices.iter().copied().zip(offsets.iter().copied()).collect())
                })
            })
            .collect()
    }

    fn offset_width(&self) -> u32 {
        self.offset_width
    }
}

/// A fixed number of random moves drawn from the same space as
/// [`ShiftNeighborhood`].
///
/// Each pass reseeds with `seed + pass`, so runs are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampledNeighborhood {
    /// Number of times perturbed per move.
    pub coordinates: usize,
    /// Offset width.
    pub offset_width: u32,
    /// Moves drawn per pass.
    pub samples: usize,
    /// Base RNG seed.
    pub seed: u64,
}

impl Neighborhood for SampledNeighborhood {
    fn moves(&self, len: usize, pass: usize) -> Vec<ShiftMove> {
        if self.coordinates == 0 || self.offset_width == 0 || len == 0 {
            return Vec::new();
        }
        let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(pass as u64));
        let mid = (self.offset_width / 2) as i32;
        (0..self.samples)
            .map(|_| {
                ShiftMove::new(
                    (0..self.coordinates)
                        .map(|_| {
                            let idx = rng.random_range(0..len);
                            let delta = rng.random_range(0..self.offset_width as i32) - mid;
                            (idx, delta)
                        })
                        .collect(),
                )
            })
            .collect()
    }

    fn offset_width(&self) -> u32 {
        self.offset_width
    }
}
