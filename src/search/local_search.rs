//! Greedy local search over departure times.
//!
//! # Algorithm
//!
//! 1. Evaluate the starting timetable.
//! 2. Generate the neighborhood for the current offset width and
//!    evaluate every candidate in parallel. Candidates that leave the
//!    operating window or repeat a departure time are skipped.
//! 3. If the best candidate is strictly better, it becomes the incumbent
//!    and the width resets to the first rung of the ladder. Otherwise the
//!    next (wider) rung is tried.
//! 4. Stop when every rung stalls or the pass budget is spent.
//!
//! Ties are broken by enumeration order, so results do not depend on
//! thread scheduling.
//!
//! # Complexity
//! O(P · n^k · w^k · S) for P passes, n trains, k coordinates, width w
//! and S the cost of one simulation.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::Schedule;
use crate::simulation::ScheduleEvaluator;
use crate::validation::{ValidationError, ValidationErrorKind};

use super::{Neighborhood, SampledNeighborhood, ShiftNeighborhood};

/// Default offset width (-5..=4 minutes).
pub const DEFAULT_OFFSET_WIDTH: u32 = 10;

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Departure times perturbed per move.
    pub coordinates: usize,
    /// Escalation ladder of offset widths, narrowest first.
    pub offset_widths: Vec<u32>,
    /// Upper bound on search passes.
    pub max_passes: usize,
    /// Draw this many random moves per pass instead of enumerating.
    pub samples: Option<usize>,
    /// Seed for sampled neighborhoods.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            coordinates: 2,
            offset_widths: vec![DEFAULT_OFFSET_WIDTH],
            max_passes: 1,
            samples: None,
            seed: 0,
        }
    }
}

impl SearchConfig {
    /// Sets the escalation ladder.
    pub fn with_offset_widths(mut self, widths: Vec<u32>) -> Self {
        self.offset_widths = widths;
        self
    }

    /// Sets the pass budget.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Sets the number of coordinates per move.
    pub fn with_coordinates(mut self, coordinates: usize) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// Switches to random sampling.
    pub fn with_sampling(mut self, samples: usize, seed: u64) -> Self {
        self.samples = Some(samples);
        self.seed = seed;
        self
    }

    /// Builds the neighborhood for one rung of the ladder.
    pub fn neighborhood(&self, offset_width: u32) -> Box<dyn Neighborhood> {
        match self.samples {
            Some(samples) => Box::new(SampledNeighborhood {
                coordinates: self.coordinates,
                offset_width,
                samples,
                seed: self.seed,
            }),
            None => Box::new(ShiftNeighborhood::new(self.coordinates, offset_width)),
        }
    }
}

/// Statistics of one search pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassSummary {
    /// 0-based pass number.
    pub pass: usize,
    /// Offset width used.
    pub offset_width: u32,
    /// Moves generated.
    pub candidates: usize,
    /// Candidates simulated.
    pub evaluated: usize,
    /// Candidates skipped for repeating a departure time.
    pub rejected_duplicate: usize,
    /// Candidates skipped for leaving the operating window.
    pub rejected_out_of_range: usize,
    /// Best average wait seen in the neighborhood (minutes).
    pub best_wait: Option<f64>,
    /// Whether the incumbent was replaced.
    pub improved: bool,
}

/// Result of a search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Average wait of the starting timetable.
    pub initial_wait: f64,
    /// Best timetable found.
    pub best: Schedule,
    /// Its average wait.
    pub best_wait: f64,
    /// Per-pass statistics.
    pub passes: Vec<PassSummary>,
    /// Whether the search stopped because no rung improved.
    pub converged: bool,
}

impl SearchOutcome {
    /// Reduction in average wait (minutes).
    pub fn improvement(&self) -> f64 {
        self.initial_wait - self.best_wait
    }
}

enum Candidate {
    Scored(f64),
    Rejected(ValidationErrorKind),
}

/// Hill-climbing optimizer over departure times.
///
/// # Example
/// ```no_run
/// use line_schedule::config::Problem;
/// use line_schedule::search::{LocalSearch, SearchConfig};
/// use line_schedule::simulation::ScheduleEvaluator;
///
/// let problem = Problem::default();
/// let evaluator = ScheduleEvaluator::new(&problem);
/// let search = LocalSearch::new(&evaluator, SearchConfig::default().with_max_passes(20));
/// let outcome = search.run(&problem.baseline).unwrap();
/// assert!(outcome.best_wait <= outcome.initial_wait);
/// ```
pub struct LocalSearch<'a> {
    evaluator: &'a ScheduleEvaluator,
    config: SearchConfig,
}

impl<'a> LocalSearch<'a> {
    /// Creates a search over the given evaluator.
    pub fn new(evaluator: &'a ScheduleEvaluator, config: SearchConfig) -> Self {
        Self { evaluator, config }
    }

    /// Search parameters in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the search from `start`.
    ///
    /// # Errors
    /// Fails only if `start` itself cannot be evaluated.
    pub fn run(&self, start: &Schedule) -> Result<SearchOutcome, ValidationError> {
        let initial_wait = self.evaluator.evaluate(start)?.average_wait;
        let widths: &[u32] = if self.config.offset_widths.is_empty() {
            &[DEFAULT_OFFSET_WIDTH]
        } else {
            &self.config.offset_widths
        };

        let mut incumbent = start.clone();
        let mut incumbent_wait = initial_wait;
        let mut passes = Vec::new();
        let mut rung = 0;
        let mut converged = false;

        log::info!("search start: average wait {initial_wait:.4} min");

        for pass in 0..self.config.max_passes {
            let neighborhood = self.config.neighborhood(widths[rung]);
            let (mut summary, best) =
                self.run_pass(&incumbent, incumbent_wait, neighborhood.as_ref(), pass);

            if let Some((schedule, wait)) = best {
                incumbent = schedule;
                incumbent_wait = wait;
                summary.improved = true;
                rung = 0;
            } else {
                rung += 1;
            }

            log::info!(
                "pass {pass} (width {}): {} evaluated, best {:.4}, incumbent {incumbent_wait:.4}{}",
                summary.offset_width,
                summary.evaluated,
                summary.best_wait.unwrap_or(f64::NAN),
                if summary.improved { " (improved)" } else { "" }
            );
            passes.push(summary);

            if rung == widths.len() {
                converged = true;
                break;
            }
        }

        Ok(SearchOutcome {
            initial_wait,
            best: incumbent,
            best_wait: incumbent_wait,
            passes,
            converged,
        })
    }

    /// Evaluates one neighborhood of `incumbent`.
    ///
    /// Returns the pass statistics and, if some candidate beats
    /// `incumbent_wait`, the best such candidate.
    pub fn run_pass(
        &self,
        incumbent: &Schedule,
        incumbent_wait: f64,
        neighborhood: &dyn Neighborhood,
        pass: usize,
    ) -> (PassSummary, Option<(Schedule, f64)>) {
        let moves = neighborhood.moves(incumbent.len(), pass);

        let results: Vec<Candidate> = moves
            .par_iter()
            .map(|mv| match mv.apply(incumbent) {
                Err(_) => Candidate::Rejected(ValidationErrorKind::DomainOutOfRange),
                Ok(candidate) => match self.evaluator.evaluate(&candidate) {
                    Ok(evaluation) => Candidate::Scored(evaluation.average_wait),
                    Err(err) => Candidate::Rejected(err.kind),
                },
            })
            .collect();

        let mut summary = PassSummary {
            pass,
            offset_width: neighborhood.offset_width(),
            candidates: moves.len(),
            evaluated: 0,
            rejected_duplicate: 0,
            rejected_out_of_range: 0,
            best_wait: None,
            improved: false,
        };
        let mut best: Option<(usize, f64)> = None;

        for (idx, result) in results.iter().enumerate() {
            match *result {
                Candidate::Scored(wait) => {
                    summary.evaluated += 1;
                    if best.map_or(true, |(_, b)| wait < b) {
                        best = Some((idx, wait));
                    }
                }
                Candidate::Rejected(ValidationErrorKind::DuplicateDepartureTime) => {
                    summary.rejected_duplicate += 1;
                }
                Candidate::Rejected(_) => summary.rejected_out_of_range += 1,
            }
        }
        summary.best_wait = best.map(|(_, wait)| wait);

        log::debug!(
            "pass {pass}: {} candidates, {} duplicates, {} out of range",
            summary.candidates,
            summary.rejected_duplicate,
            summary.rejected_out_of_range
        );

        let improved = best
            .filter(|&(_, wait)| wait < incumbent_wait)
            .and_then(|(idx, wait)| moves[idx].apply(incumbent).ok().map(|s| (s, wait)));
        (summary, improved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Problem;
    use crate::models::{ClockTime, TrainType};

    fn t(hmm: u32) -> ClockTime {
        ClockTime::from_hmm(hmm).unwrap()
    }

    fn schedule(times: &[u32]) -> Schedule {
        let times: Vec<_> = times.iter().map(|&hmm| t(hmm)).collect();
        Schedule::from_parts(&times, &vec![TrainType::L8; times.len()])
    }

    #[test]
    fn test_default_config_is_reference_pass() {
        let config = SearchConfig::default();
        assert_eq!(config.coordinates, 2);
        assert_eq!(config.offset_widths, vec![10]);
        assert_eq!(config.max_passes, 1);
        assert!(config.samples.is_none());
    }

    #[test]
    fn test_search_keeps_config() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        let config = SearchConfig::default()
            .with_coordinates(1)
            .with_offset_widths(vec![4, 8]);
        let search = LocalSearch::new(&evaluator, config.clone());
        assert_eq!(search.config(), &config);
    }

    #[test]
    fn test_config_json_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"offset_widths": [10, 20], "max_passes": 5}"#).unwrap();
        assert_eq!(config.offset_widths, vec![10, 20]);
        assert_eq!(config.max_passes, 5);
        assert_eq!(config.coordinates, 2);
    }

    #[test]
    fn test_single_pass_never_worsens() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        let config = SearchConfig::default().with_coordinates(1);
        let outcome = LocalSearch::new(&evaluator, config)
            .run(&problem.baseline)
            .unwrap();
        assert!(outcome.best_wait <= outcome.initial_wait);
        assert_eq!(outcome.passes.len(), 1);
        assert_eq!(outcome.passes[0].candidates, 16 * 10);
        assert!(outcome.best.has_distinct_times());
        let check = evaluator.evaluate(&outcome.best).unwrap();
        assert_eq!(check.average_wait, outcome.best_wait);
    }

    #[test]
    fn test_rejections_counted() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        // 7:00 and 7:01: shifting either one minute onto the other duplicates
        let start = schedule(&[700, 701, 800]);
        let search = LocalSearch::new(&evaluator, SearchConfig::default().with_coordinates(1));
        let neighborhood = ShiftNeighborhood::new(1, 10);
        let (summary, _) = search.run_pass(&start, f64::INFINITY, &neighborhood, 0);
        assert_eq!(summary.candidates, 30);
        assert!(summary.rejected_duplicate > 0);
        assert_eq!(
            summary.evaluated + summary.rejected_duplicate + summary.rejected_out_of_range,
            30
        );
    }

    #[test]
    fn test_out_of_range_counted() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        // Departures after 10:22 reach the terminus after 10:59
        let start = schedule(&[1020]);
        let search = LocalSearch::new(&evaluator, SearchConfig::default());
        let neighborhood = ShiftNeighborhood::new(1, 10);
        let (summary, _) = search.run_pass(&start, f64::INFINITY, &neighborhood, 0);
        assert_eq!(summary.rejected_out_of_range, 2);
        assert_eq!(summary.evaluated, 8);
    }

    #[test]
    fn test_backward_moves_from_ten_leave_window() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        // 10:00 - 1..=5 becomes 10:35..=10:39, too late to reach the terminus
        let start = schedule(&[1000]);
        let search = LocalSearch::new(&evaluator, SearchConfig::default());
        let neighborhood = ShiftNeighborhood::new(1, 10);
        let (summary, _) = search.run_pass(&start, f64::INFINITY, &neighborhood, 0);
        assert_eq!(summary.rejected_out_of_range, 5);
        assert_eq!(summary.evaluated, 5);
    }

    #[test]
    fn test_converges_on_small_problem() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        let config = SearchConfig::default()
            .with_coordinates(1)
            .with_max_passes(200);
        let start = schedule(&[705, 745, 830, 915]);
        let outcome = LocalSearch::new(&evaluator, config).run(&start).unwrap();
        assert!(outcome.converged);
        assert!(outcome.best_wait < outcome.initial_wait);
        assert!(outcome.improvement() > 0.0);
        assert!(!outcome.passes.last().unwrap().improved);
        // Every accepted pass strictly improves
        let bests: Vec<f64> = outcome
            .passes
            .iter()
            .filter(|p| p.improved)
            .filter_map(|p| p.best_wait)
            .collect();
        assert!(bests.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_escalation_ladder() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        let config = SearchConfig::default()
            .with_coordinates(1)
            .with_offset_widths(vec![2, 6])
            .with_max_passes(500);
        let outcome = LocalSearch::new(&evaluator, config)
            .run(&schedule(&[705, 745, 830, 915]))
            .unwrap();
        assert!(outcome.converged);
        let last_two: Vec<u32> = outcome.passes[outcome.passes.len() - 2..]
            .iter()
            .map(|p| p.offset_width)
            .collect();
        assert_eq!(last_two, vec![2, 6]);
    }

    #[test]
    fn test_sampled_search() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        let config = SearchConfig::default()
            .with_sampling(200, 11)
            .with_max_passes(3);
        let a = LocalSearch::new(&evaluator, config.clone())
            .run(&problem.baseline)
            .unwrap();
        let b = LocalSearch::new(&evaluator, config)
            .run(&problem.baseline)
            .unwrap();
        assert!(a.best_wait <= a.initial_wait);
        assert_eq!(a, b);
        assert!(a.passes.iter().all(|p| p.candidates == 200));
    }

    #[test]
    fn test_zero_passes() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        let outcome = LocalSearch::new(&evaluator, SearchConfig::default().with_max_passes(0))
            .run(&problem.baseline)
            .unwrap();
        assert!(outcome.passes.is_empty());
        assert!(!outcome.converged);
        assert_eq!(outcome.best, problem.baseline);
    }

    #[test]
    fn test_invalid_start_rejected() {
        let problem = Problem::default();
        let evaluator = ScheduleEvaluator::new(&problem);
        let err = LocalSearch::new(&evaluator, SearchConfig::default())
            .run(&schedule(&[700, 700]))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DuplicateDepartureTime);
    }
}
