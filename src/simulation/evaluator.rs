//! Schedule evaluator.
//!
//! Runs every train of a timetable against a private copy of the demand
//! and reports the average wait per passenger.
//!
//! # Processing order
//!
//! Boarding consumes shared per-station queues, so the order trains are
//! simulated in matters. [`ProcessingOrder::TrainNumber`] simulates in
//! timetable order and is the default. If a train is simulated at a
//! station before an earlier-arriving one, the later train can be credited
//! with passengers the earlier one should have carried. Such cases are
//! reported as [`OrderingConflict`]s. [`ProcessingOrder::Chronological`]
//! simulates by departure time instead, which never produces a conflict.

use serde::{Deserialize, Serialize};

use crate::config::Problem;
use crate::models::{ClockTime, DemandModel, LineConfig, RunRecord, Schedule, Station};
use crate::validation::{check_distinct_times, ValidationError};

use super::run_train;

/// Order in which trains are simulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingOrder {
    /// Train 1, 2, 3, ... regardless of departure time.
    #[default]
    TrainNumber,
    /// Earliest departure first.
    Chronological,
}

/// A train simulated at a station after a train that arrives there later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingConflict {
    /// Station where the inversion happens.
    pub station: Station,
    /// Train simulated first but arriving later.
    pub processed_first: usize,
    /// Its arrival time.
    pub processed_first_arrival: ClockTime,
    /// Train simulated afterwards but arriving earlier.
    pub processed_later: usize,
    /// Its arrival time.
    pub processed_later_arrival: ClockTime,
}

/// Result of evaluating one timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Average wait per passenger (minutes).
    pub average_wait: f64,
    /// Total passenger-minutes of waiting.
    pub total_wait: u64,
    /// Passengers in the demand before any train runs.
    pub total_passengers: u64,
    /// Passengers carried to the terminus.
    pub total_boarded: u64,
    /// Run records in train-number order.
    pub records: Vec<RunRecord>,
    /// Processing-order inversions detected during the run.
    pub conflicts: Vec<OrderingConflict>,
}

impl Evaluation {
    /// Passengers left waiting at the end of the run.
    pub fn stranded(&self) -> u64 {
        self.total_passengers.saturating_sub(self.total_boarded)
    }

    /// Serializes the evaluation as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Evaluates timetables against a fixed line and demand snapshot.
///
/// # Example
/// ```
/// use line_schedule::config::Problem;
/// use line_schedule::simulation::ScheduleEvaluator;
///
/// let problem = Problem::default();
/// let evaluator = ScheduleEvaluator::new(&problem);
/// let evaluation = evaluator.evaluate(&problem.baseline).unwrap();
/// assert!((evaluation.average_wait - 3.6576).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleEvaluator {
    line: LineConfig,
    demand: DemandModel,
    total_passengers: u64,
    order: ProcessingOrder,
}

impl ScheduleEvaluator {
    /// Creates an evaluator holding a snapshot of the problem's line and demand.
    pub fn new(problem: &Problem) -> Self {
        Self {
            line: problem.line.clone(),
            total_passengers: problem.demand.total_passengers(),
            demand: problem.demand.clone(),
            order: ProcessingOrder::default(),
        }
    }

    /// Sets the processing order.
    pub fn with_order(mut self, order: ProcessingOrder) -> Self {
        self.order = order;
        self
    }

    /// Passengers in the canonical demand.
    pub fn total_passengers(&self) -> u64 {
        self.total_passengers
    }

    /// Evaluates a timetable.
    ///
    /// # Errors
    /// - `DuplicateDepartureTime` if two trains share a departure time.
    /// - `DomainOutOfRange` if a train would run past the operating window.
    pub fn evaluate(&self, schedule: &Schedule) -> Result<Evaluation, ValidationError> {
        check_distinct_times(schedule)?;

        let departures = schedule.departures();
        let mut order: Vec<usize> = (0..departures.len()).collect();
        if self.order == ProcessingOrder::Chronological {
            order.sort_by_key(|&idx| departures[idx].time);
        }

        let mut demand = self.demand.clone();
        let mut records: Vec<Option<RunRecord>> = vec![None; departures.len()];
        let mut total_wait = 0u64;

        for &idx in &order {
            let run = run_train(idx + 1, &departures[idx], &self.line, &mut demand)?;
            total_wait += run.wait_cost;
            records[idx] = Some(run.record);
        }

        let records: Vec<RunRecord> = records.into_iter().flatten().collect();
        let conflicts = find_conflicts(&records, &order);
        let total_boarded = records.iter().map(|r| r.total_boarded() as u64).sum();

        let average_wait = if self.total_passengers == 0 {
            0.0
        } else {
            total_wait as f64 / self.total_passengers as f64
        };

        Ok(Evaluation {
            average_wait,
            total_wait,
            total_passengers: self.total_passengers,
            total_boarded,
            records,
            conflicts,
        })
    }
}

/// Finds stations where a train was simulated after one arriving later.
fn find_conflicts(records: &[RunRecord], order: &[usize]) -> Vec<OrderingConflict> {
    let mut conflicts = Vec::new();
    for station in Station::ALL {
        let mut latest: Option<&RunRecord> = None;
        for &idx in order {
            let record = &records[idx];
            let arrival = record.stops[station.index()].arrival;
            match latest {
                Some(prev) if prev.stops[station.index()].arrival > arrival => {
                    conflicts.push(OrderingConflict {
                        station,
                        processed_first: prev.train_number,
                        processed_first_arrival: prev.stops[station.index()].arrival,
                        processed_later: record.train_number,
                        processed_later_arrival: arrival,
                    });
                }
                _ => latest = Some(record),
            }
        }
    }
    conflicts
}
