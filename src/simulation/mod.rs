//! Passenger-accumulation simulation.
//!
//! Turns a timetable into run records and an average-wait objective.
//!
//! # Model
//!
//! - [`board`]: capacity-constrained FIFO boarding at one station.
//! - [`run_train`]: one train through A → B → C → terminus.
//! - [`ScheduleEvaluator`]: all trains against a fresh demand copy.
//!
//! Every evaluation clones the canonical demand, so evaluations are
//! independent and may run in parallel.

mod boarding;
mod evaluator;
mod run;

pub use boarding::{board, Boarding};
pub use evaluator::{Evaluation, OrderingConflict, ProcessingOrder, ScheduleEvaluator};
pub use run::{arrival_times, run_train, TrainRun};
