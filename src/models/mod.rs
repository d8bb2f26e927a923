//! Line planning domain models.
//!
//! Provides the data types for a single commuter line: the operating
//! clock, per-station passenger demand, train types, timetables and
//! per-train run records.
//!
//! # Domain Mappings
//!
//! | line-schedule | Meaning |
//! |---------------|---------|
//! | ClockTime | Minute of the operating day (07:00..11:00) |
//! | DemandProfile | Passenger arrivals per 10-minute slot |
//! | Departure | Train leaving the origin station |
//! | Schedule | Full timetable, one departure per train |
//! | RunRecord | Simulated trace of one train |

pub mod clock;
mod demand;
mod line;
mod schedule;
mod train;

pub use clock::{normalize, slot_of, ClockError, ClockTime};
pub use demand::{DemandModel, DemandProfile, Station};
pub use line::LineConfig;
pub use schedule::{RunRecord, Schedule, StopRecord};
pub use train::{Departure, TrainType};
