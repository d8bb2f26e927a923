//! Input validation for line planning problems.
//!
//! Checks structural integrity of demand, line constants and timetables
//! before simulation. Detects:
//! - Duplicate departure times
//! - Times that leave the 07:00-10:59 operating window
//! - Missing or incomplete station demand profiles
//! - Station demand too large to queue in one slot
//! - Empty timetables
//!
//! A rejected candidate during search is not fatal: the optimizer skips
//! it and records the [`ValidationErrorKind`] it failed with.

use std::collections::HashSet;
use std::fmt;

use crate::config::Problem;
use crate::models::{ClockError, LineConfig, Schedule, Station};
use crate::models::clock::SLOT_COUNT;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Two trains share a departure time.
    DuplicateDepartureTime,
    /// A time falls outside the operating window.
    DomainOutOfRange,
    /// The timetable has no trains.
    EmptySchedule,
    /// A station has no demand profile.
    MissingStation,
    /// A demand profile does not cover every slot.
    ProfileLength,
    /// Line run times are unusable.
    InvalidLine,
    /// A station's demand does not fit a single boarding queue.
    DemandOverflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ClockError> for ValidationError {
    fn from(err: ClockError) -> Self {
        Self::new(ValidationErrorKind::DomainOutOfRange, err.to_string())
    }
}

/// Checks only that departure times are pairwise distinct.
///
/// This is the cheap check run on every search candidate.
pub fn check_distinct_times(schedule: &Schedule) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (idx, d) in schedule.departures().iter().enumerate() {
        if !seen.insert(d.time) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateDepartureTime,
                format!("Train {} departs at {} like an earlier train", idx + 1, d.time),
            ));
        }
    }
    Ok(())
}

/// Validates a timetable against the line.
///
/// Checks:
/// 1. At least one train
/// 2. No two trains depart at the same time
/// 3. Every train reaches the terminus inside the operating window
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_schedule(schedule: &Schedule, line: &LineConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if schedule.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptySchedule,
            "Schedule has no trains",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, d) in schedule.departures().iter().enumerate() {
        let number = idx + 1;
        if !seen.insert(d.time) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDepartureTime,
                format!("Duplicate departure time {} (train {number})", d.time),
            ));
        }

        let mut time = d.time;
        for leg in line.leg_minutes() {
            match time.advance(leg) {
                Ok(next) => time = next,
                Err(err) => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DomainOutOfRange,
                        format!("Train {number} departing {}: {err}", d.time),
                    ));
                    break;
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a full planning problem.
///
/// Checks:
/// 1. Every station has a demand profile covering all 19 slots, with
///    at most `u32::MAX` passengers in total
/// 2. Each leg (dwell + travel) is shorter than an hour
/// 3. The baseline timetable passes [`validate_schedule`]
pub fn validate_problem(problem: &Problem) -> ValidationResult {
    let mut errors = Vec::new();

    for station in Station::ALL {
        match problem.demand.profile(station) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingStation,
                format!("Station {station} has no demand profile"),
            )),
            Some(profile) if !profile.is_complete() => errors.push(ValidationError::new(
                ValidationErrorKind::ProfileLength,
                format!(
                    "Station {station} has {} demand slots, expected {SLOT_COUNT}",
                    profile.counts().len()
                ),
            )),
            Some(profile) if profile.total() > u32::MAX as u64 => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DemandOverflow,
                    format!(
                        "Station {station} has {} passengers, at most {} can queue",
                        profile.total(),
                        u32::MAX
                    ),
                ))
            }
            Some(_) => {}
        }
    }

    for leg in problem.line.leg_minutes() {
        if leg == 0 || leg >= 60 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidLine,
                format!("Leg time of {leg} minutes must be between 1 and 59"),
            ));
        }
    }

    if let Err(schedule_errors) = validate_schedule(&problem.baseline, &problem.line) {
        errors.extend(schedule_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, DemandModel, TrainType};

    fn t(hmm: u32) -> ClockTime {
        ClockTime::from_hmm(hmm).unwrap()
    }

    fn schedule(times: &[u32]) -> Schedule {
        let times: Vec<_> = times.iter().map(|&hmm| t(hmm)).collect();
        Schedule::from_parts(&times, &vec![TrainType::L8; times.len()])
    }

    #[test]
    fn test_valid_reference_problem() {
        assert!(validate_problem(&Problem::default()).is_ok());
    }

    #[test]
    fn test_duplicate_departure() {
        let s = schedule(&[700, 710, 700]);
        let errors = validate_schedule(&s, &LineConfig::default()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateDepartureTime));
        assert_eq!(
            check_distinct_times(&s).unwrap_err().kind,
            ValidationErrorKind::DuplicateDepartureTime
        );
    }

    #[test]
    fn test_distinct_ok() {
        assert!(check_distinct_times(&schedule(&[700, 701])).is_ok());
    }

    #[test]
    fn test_empty_schedule() {
        let errors = validate_schedule(&Schedule::default(), &LineConfig::default()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptySchedule);
    }

    #[test]
    fn test_terminus_after_close() {
        // 10:30 + 11 + 12 + 14 = 11:07
        let errors = validate_schedule(&schedule(&[1030]), &LineConfig::default()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::DomainOutOfRange);
    }

    #[test]
    fn test_missing_station_and_short_profile() {
        let problem = Problem {
            demand: DemandModel::new().with_station(Station::A, vec![1; 5]),
            ..Problem::default()
        };
        let errors = validate_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::ProfileLength));
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::MissingStation)
                .count(),
            2
        );
    }

    #[test]
    fn test_demand_overflow() {
        let mut counts = vec![0; SLOT_COUNT];
        counts[0] = u32::MAX;
        counts[1] = 1;
        let problem = Problem {
            demand: DemandModel::reference().with_station(Station::B, counts),
            ..Problem::default()
        };
        let errors = validate_problem(&problem).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DemandOverflow);
    }

    #[test]
    fn test_demand_at_limit_accepted() {
        let mut counts = vec![0; SLOT_COUNT];
        counts[0] = u32::MAX;
        let problem = Problem {
            demand: DemandModel::reference().with_station(Station::C, counts),
            ..Problem::default()
        };
        assert!(validate_problem(&problem).is_ok());
    }

    #[test]
    fn test_invalid_leg() {
        let mut problem = Problem::default();
        problem.line.c_to_terminus_minutes = 70;
        let errors = validate_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidLine));
    }

    #[test]
    fn test_clock_error_conversion() {
        let err: ValidationError = ClockTime::from_hmm(1130).unwrap_err().into();
        assert_eq!(err.kind, ValidationErrorKind::DomainOutOfRange);
        assert!(err.to_string().contains("1130"));
    }
}
