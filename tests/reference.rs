//! End-to-end checks against the reference line and timetable.

use line_schedule::config::Problem;
use line_schedule::models::{ClockTime, Schedule, TrainType};
use line_schedule::report::{format_wait, to_csv, ScheduleKpi};
use line_schedule::search::{LocalSearch, SearchConfig};
use line_schedule::simulation::{ProcessingOrder, ScheduleEvaluator};

const REFERENCE_REPORT: &str = "\
TrainNum,TrainType,A_ArrivalTime,A_AvailCap,A_Boarding,B_ArrivalTime,B_AvailCap,B_Boarding,C_ArrivalTime,C_AvailCap,C_Boarding,U_Arrival,U_AvailCap,U_Offloading\n\
1,L8,7:00,400,25,7:11,375,125,7:23,250,250,7:37,0,400\n\
2,L8,7:10,400,50,7:21,350,100,7:33,250,250,7:47,0,400\n\
3,L8,7:20,400,75,7:31,325,125,7:43,200,200,7:57,0,400\n\
4,L8,7:29,400,0,7:40,400,150,7:52,250,250,8:00,0,400\n\
5,L8,7:37,400,100,7:48,300,0,8:00,300,175,8:14,125,275\n\
6,L8,7:40,400,125,7:51,275,175,8:00,100,0,8:14,100,300\n\
7,L8,7:50,400,150,8:00,250,150,8:12,100,100,8:26,0,400\n\
8,L8,8:00,400,125,8:11,275,125,8:23,150,150,8:37,0,400\n\
9,L4,8:07,200,0,8:18,200,0,8:30,200,175,8:44,25,175\n\
10,L8,8:10,400,100,8:21,300,100,8:33,200,0,8:47,200,200\n\
11,L8,8:20,400,75,8:31,325,100,8:43,225,100,8:57,125,275\n\
12,L8,8:40,400,95,8:51,305,150,9:00,155,125,9:14,30,370\n\
13,L4,9:00,200,75,9:11,125,95,9:23,30,30,9:37,0,200\n\
14,L8,9:10,400,30,9:21,370,35,9:33,335,105,9:47,230,170\n\
15,L4,9:30,200,45,9:41,155,45,9:53,110,65,10:07,45,155\n\
16,L4,10:00,200,30,10:11,170,25,10:23,145,25,10:37,120,80\n\
";

#[test]
fn test_reference_average_wait() {
    let problem = Problem::default();
    let evaluation = ScheduleEvaluator::new(&problem)
        .evaluate(&problem.baseline)
        .unwrap();
    assert!((evaluation.average_wait - 3.657608695652174).abs() < 1e-9);
    assert_eq!(format_wait(evaluation.average_wait), "3:39");
}

#[test]
fn test_reference_report() {
    let problem = Problem::default();
    let evaluation = ScheduleEvaluator::new(&problem)
        .evaluate(&problem.baseline)
        .unwrap();
    assert_eq!(to_csv(&evaluation.records), REFERENCE_REPORT);
}

#[test]
fn test_search_seed_types() {
    // Same departures with the four L4 sets at the end of the day
    let problem = Problem::default();
    let types: Vec<TrainType> = (0..16)
        .map(|i| if i < 12 { TrainType::L8 } else { TrainType::L4 })
        .collect();
    let schedule = Schedule::from_parts(&problem.baseline.times(), &types);
    let evaluation = ScheduleEvaluator::new(&problem).evaluate(&schedule).unwrap();
    assert_eq!(evaluation.total_wait, 16825);
}

#[test]
fn test_reference_is_local_minimum_for_two_coordinate_pass() {
    let problem = Problem::default();
    let evaluator = ScheduleEvaluator::new(&problem);
    let outcome = LocalSearch::new(&evaluator, SearchConfig::default())
        .run(&problem.baseline)
        .unwrap();
    let pass = &outcome.passes[0];
    assert_eq!(pass.candidates, 16 * 16 * 10 * 10);
    assert!(pass.rejected_duplicate > 0);
    assert!(outcome.best_wait <= outcome.initial_wait);
    assert_eq!(outcome.best, problem.baseline);
    assert!(outcome.converged);
}

#[test]
fn test_search_improves_poor_timetable() {
    let problem = Problem::default();
    let evaluator = ScheduleEvaluator::new(&problem);
    let times: Vec<ClockTime> = (0..16)
        .map(|i| ClockTime::from_minutes(7 * 60 + 2 + i * 12).unwrap())
        .collect();
    let start = Schedule::from_parts(&times, &[TrainType::L8; 16]);
    let config = SearchConfig::default()
        .with_coordinates(1)
        .with_max_passes(5);
    let outcome = LocalSearch::new(&evaluator, config).run(&start).unwrap();
    assert!(outcome.best_wait < outcome.initial_wait);

    let kpi = ScheduleKpi::calculate(&evaluator.evaluate(&outcome.best).unwrap());
    assert!(kpi.total_boarded <= kpi.total_passengers);
}

#[test]
fn test_chronological_order_agrees_on_reference() {
    let problem = Problem::default();
    let by_number = ScheduleEvaluator::new(&problem)
        .evaluate(&problem.baseline)
        .unwrap();
    let chrono = ScheduleEvaluator::new(&problem)
        .with_order(ProcessingOrder::Chronological)
        .evaluate(&problem.baseline)
        .unwrap();
    assert_eq!(by_number.total_wait, chrono.total_wait);
}
