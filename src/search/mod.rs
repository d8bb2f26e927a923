//! Timetable optimization by local search.
//!
//! Hill climbing with a configurable shift neighborhood: each move nudges
//! a few departure times by a bounded number of minutes, the best move in
//! the neighborhood is kept if it lowers the average wait, and wider
//! offsets are tried when the search stalls.
//!
//! # Submodules
//!
//! - [`neighborhood`]: move generation (exhaustive or sampled)
//! - `local_search`: greedy acceptance loop

mod local_search;
pub mod neighborhood;

pub use local_search::{LocalSearch, PassSummary, SearchConfig, SearchOutcome, DEFAULT_OFFSET_WIDTH};
pub use neighborhood::{Neighborhood, SampledNeighborhood, ShiftMove, ShiftNeighborhood};
