//! Timetable quality metrics (KPIs).
//!
//! Summarizes an [`Evaluation`] for reporting and comparison.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Average wait | Total passenger-minutes / passengers |
//! | Stranded | Passengers never boarded |
//! | Boarded by station | Passengers picked up at A, B, C |
//! | Avg load factor | Mean offload / capacity at the terminus |
//! | Peak load factor | Largest single-train load factor |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Station;
use crate::simulation::Evaluation;

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Average wait per passenger (minutes).
    pub average_wait: f64,
    /// Total passenger-minutes of waiting.
    pub total_wait: u64,
    /// Passengers in the demand.
    pub total_passengers: u64,
    /// Passengers carried.
    pub total_boarded: u64,
    /// Passengers left at stations.
    pub stranded: u64,
    /// Boardings per station.
    pub boarded_by_station: BTreeMap<Station, u64>,
    /// Mean terminus load factor (0.0..1.0).
    pub avg_load_factor: f64,
    /// Highest terminus load factor (0.0..1.0).
    pub peak_load_factor: f64,
    /// Processing-order inversions.
    pub ordering_conflicts: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from an evaluation.
    pub fn calculate(evaluation: &Evaluation) -> Self {
        let mut boarded_by_station: BTreeMap<Station, u64> =
            Station::ALL.iter().map(|&s| (s, 0)).collect();
        let mut load_sum = 0.0;
        let mut peak_load_factor: f64 = 0.0;

        for record in &evaluation.records {
            for station in Station::ALL {
                *boarded_by_station.entry(station).or_insert(0) +=
                    record.stops[station.index()].boarded as u64;
            }
            let load = record.load_factor();
            load_sum += load;
            peak_load_factor = peak_load_factor.max(load);
        }

        let avg_load_factor = if evaluation.records.is_empty() {
            0.0
        } else {
            load_sum / evaluation.records.len() as f64
        };

        Self {
            average_wait: evaluation.average_wait,
            total_wait: evaluation.total_wait,
            total_passengers: evaluation.total_passengers,
            total_boarded: evaluation.total_boarded,
            stranded: evaluation.stranded(),
            boarded_by_station,
            avg_load_factor,
            peak_load_factor,
            ordering_conflicts: evaluation.conflicts.len(),
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_average_wait: f64, max_stranded: u64) -> bool {
        self.average_wait <= max_average_wait && self.stranded <= max_stranded
    }
}
