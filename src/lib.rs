//! Departure planning for a three-station commuter line.
//!
//! Simulates how passengers accumulate at stations A, B and C and board
//! trains bound for the terminus, computes the average wait for a
//! timetable, and searches for departure times that lower it.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ClockTime`, `DemandModel`, `Departure`,
//!   `Schedule`, `RunRecord`, `LineConfig`
//! - **`simulation`**: Boarding engine, train runs and schedule evaluation
//! - **`search`**: Hill-climbing over departure-time perturbations
//! - **`report`**: CSV run reports and KPI summaries
//! - **`validation`**: Input checks (duplicate departures, operating window, demand shape)
//! - **`config`**: Problem definition and JSON loading
//!
//! # Example
//!
//! ```
//! use line_schedule::config::Problem;
//! use line_schedule::simulation::ScheduleEvaluator;
//!
//! let problem = Problem::default();
//! let evaluation = ScheduleEvaluator::new(&problem)
//!     .evaluate(&problem.baseline)
//!     .unwrap();
//! assert_eq!(evaluation.records.len(), 16);
//! ```

pub mod config;
pub mod models;
pub mod report;
pub mod search;
pub mod simulation;
pub mod validation;
