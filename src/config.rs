//! Problem configuration.
//!
//! A [`Problem`] bundles the static inputs of a planning run: line
//! constants, per-station demand and the seed timetable. The reference
//! data set is available via [`Problem::default`]; other data sets are
//! read from JSON:
//!
//! ```json
//! {
//!   "line": { "dwell_minutes": 3, "l4_capacity": 200 },
//!   "demand": { "A": [25, 50, ...], "B": [...], "C": [...] },
//!   "baseline": [ { "time": 700, "train_type": "L8" }, ... ]
//! }
//! ```
//!
//! Omitted sections fall back to the reference values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::models::{ClockTime, DemandModel, LineConfig, Schedule, TrainType};
use crate::validation::{validate_problem, ValidationError};

/// Errors raised while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The content is not valid JSON for the expected shape.
    Parse(serde_json::Error),
    /// The content parsed but failed validation.
    Invalid(Vec<ValidationError>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read configuration: {err}"),
            ConfigError::Parse(err) => write!(f, "cannot parse configuration: {err}"),
            ConfigError::Invalid(errors) => {
                write!(f, "invalid configuration:")?;
                for err in errors {
                    write!(f, "\n  - {err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Static inputs of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Problem {
    /// Run times and capacities.
    pub line: LineConfig,
    /// Passenger arrivals per station and slot.
    pub demand: DemandModel,
    /// Seed timetable for evaluation and search.
    pub baseline: Schedule,
}

impl Problem {
    /// Parses and validates a problem from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let problem: Problem = serde_json::from_str(json)?;
        validate_problem(&problem).map_err(ConfigError::Invalid)?;
        Ok(problem)
    }

    /// Reads, parses and validates a problem from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the problem as pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The hand-tuned reference timetable.
    ///
    /// Sixteen trains; L4 sets run as trains 9, 13, 15 and 16.
    pub fn reference_schedule() -> Schedule {
        use TrainType::{L4, L8};
        const fn at(hmm: u16) -> ClockTime {
            ClockTime::from_hmm_const(hmm)
        }
        const TIMES: [ClockTime; 16] = [
            at(700), at(710), at(720), at(729), at(737), at(740), at(750), at(800),
            at(807), at(810), at(820), at(840), at(900), at(910), at(930), at(1000),
        ];
        const TYPES: [TrainType; 16] = [
            L8, L8, L8, L8, L8, L8, L8, L8, L4, L8, L8, L8, L4, L8, L4, L4,
        ];
        Schedule::from_parts(&TIMES, &TYPES)
    }
}

impl Default for Problem {
    fn default() -> Self {
        Self {
            line: LineConfig::default(),
            demand: DemandModel::reference(),
            baseline: Self::reference_schedule(),
        }
    }
}

/// Reads any JSON-deserializable value from a file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Station;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_reference_schedule() {
        let s = Problem::reference_schedule();
        assert_eq!(s.len(), 16);
        let hmm: Vec<u32> = s.times().iter().map(|t| t.to_hmm()).collect();
        assert_eq!(
            hmm,
            vec![700, 710, 720, 729, 737, 740, 750, 800, 807, 810, 820, 840, 900, 910, 930, 1000]
        );
        assert_eq!(s.departure(4).unwrap().time.to_hmm(), 729);
        assert_eq!(s.departure(16).unwrap().time.to_hmm(), 1000);
        let l4: Vec<usize> = (1..=16)
            .filter(|&n| s.departure(n).unwrap().train_type == TrainType::L4)
            .collect();
        assert_eq!(l4, vec![9, 13, 15, 16]);
    }

    #[test]
    fn test_json_round_trip() {
        let problem = Problem::default();
        let json = problem.to_json().unwrap();
        let back = Problem::from_json_str(&json).unwrap();
        assert_eq!(back, problem);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let problem = Problem::from_json_str(r#"{"line": {"dwell_minutes": 2}}"#).unwrap();
        assert_eq!(problem.line.dwell_minutes, 2);
        assert_eq!(problem.line.l8_capacity, 400);
        assert_eq!(problem.demand.total_passengers(), 4600);
        assert_eq!(problem.baseline.len(), 16);
    }

    #[test]
    fn test_invalid_content() {
        let err = Problem::from_json_str(r#"{"demand": {"A": [1, 2, 3]}}"#).unwrap_err();
        match err {
            ConfigError::Invalid(errors) => {
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::ProfileLength));
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::MissingStation));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_demand_rejected() {
        let mut counts = vec![0u32; 19];
        counts[2] = u32::MAX;
        counts[5] = 10;
        let json = serde_json::json!({ "demand": { "A": counts, "B": counts, "C": counts } });
        let err = Problem::from_json_str(&json.to_string()).unwrap_err();
        match err {
            ConfigError::Invalid(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .all(|e| e.kind == ValidationErrorKind::DemandOverflow));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error() {
        let err = Problem::from_json_str(r#"{"baseline": [{"time": 775, "train_type": "L8"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Problem::from_path("/nonexistent/line-schedule.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_demand_by_station_id() {
        let problem = Problem::default();
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["demand"]["C"][4], 250);
        assert_eq!(
            problem.demand.profile(Station::C).unwrap().counts()[4],
            250
        );
    }
}
