use anyhow::{anyhow, Context, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use line_schedule::config::{load_json, Problem};
use line_schedule::models::Schedule;
use line_schedule::report::{format_wait, to_csv, write_csv, ScheduleKpi};
use line_schedule::search::{LocalSearch, SearchConfig};
use line_schedule::simulation::{Evaluation, ProcessingOrder, ScheduleEvaluator};
use line_schedule::validation::{validate_schedule, ValidationError};
use std::path::{Path, PathBuf};

fn common_args(cmd: Command) -> Command {
    cmd.arg(
        arg!(--config [CONFIG] "Path to a problem json file (defaults to the reference line)")
            .value_parser(clap::value_parser!(PathBuf)),
    )
    .arg(
        arg!(--schedule [SCHEDULE] "Path to a schedule json file (defaults to the baseline)")
            .value_parser(clap::value_parser!(PathBuf)),
    )
    .arg(
        arg!(--output [OUTPUT_FILE] "Path of the csv report")
            .default_value("result.csv")
            .value_parser(clap::value_parser!(PathBuf)),
    )
    .arg(
        arg!(--chronological "Simulate trains by departure time instead of train number")
            .action(ArgAction::SetTrue),
    )
}

fn cli() -> Command {
    Command::new("line-schedule")
        .about("Evaluates and optimizes commuter line timetables")
        .arg_required_else_help(true)
        .subcommand(
            common_args(Command::new("evaluate").about("Computes the average wait of a schedule"))
                .arg(
                    arg!(--json "Print the evaluation and KPIs as json instead of csv")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            common_args(Command::new("optimize").about("Searches for a lower average wait"))
                .arg(
                    arg!(--search [SEARCH] "Path to a search config json file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--width [WIDTH] "Offset width; repeat to build an escalation ladder")
                        .action(ArgAction::Append)
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--coordinates [COORDINATES] "Departure times perturbed per move")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"max-passes" [MAX_PASSES] "Upper bound on search passes")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--samples [SAMPLES] "Random moves per pass instead of full enumeration")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for sampled moves")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
}

fn main() {
    pretty_env_logger::init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("evaluate", sub_m)) => evaluate(sub_m),
        Some(("optimize", sub_m)) => optimize(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_problem(sub_m: &ArgMatches) -> Result<Problem> {
    match sub_m.get_one::<PathBuf>("config") {
        Some(path) => Problem::from_path(path)
            .with_context(|| format!("Failed to load problem from {}", path.display())),
        None => Ok(Problem::default()),
    }
}

fn load_schedule(sub_m: &ArgMatches, problem: &Problem) -> Result<Schedule> {
    let schedule = match sub_m.get_one::<PathBuf>("schedule") {
        Some(path) => load_json::<Schedule>(path)
            .with_context(|| format!("Failed to load schedule from {}", path.display()))?,
        None => problem.baseline.clone(),
    };
    validate_schedule(&schedule, &problem.line).map_err(join_errors)?;
    Ok(schedule)
}

fn join_errors(errors: Vec<ValidationError>) -> anyhow::Error {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    anyhow!("Invalid schedule: {}", messages.join("; "))
}

fn processing_order(sub_m: &ArgMatches) -> ProcessingOrder {
    if sub_m.get_flag("chronological") {
        ProcessingOrder::Chronological
    } else {
        ProcessingOrder::TrainNumber
    }
}

fn log_conflicts(evaluation: &Evaluation) {
    for c in &evaluation.conflicts {
        log::warn!(
            "station {}: train {} ({}) simulated before train {} ({})",
            c.station,
            c.processed_first,
            c.processed_first_arrival,
            c.processed_later,
            c.processed_later_arrival
        );
    }
}

fn write_report(path: &Path, evaluation: &Evaluation) -> Result<()> {
    write_csv(path, &evaluation.records)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    log::info!("report written to {}", path.display());
    Ok(())
}

pub fn evaluate(sub_m: &ArgMatches) -> Result<()> {
    let problem = load_problem(sub_m)?;
    let schedule = load_schedule(sub_m, &problem)?;
    let evaluator = ScheduleEvaluator::new(&problem).with_order(processing_order(sub_m));
    log::info!(
        "evaluating {} trains for {} passengers",
        schedule.len(),
        evaluator.total_passengers()
    );
    let evaluation = evaluator.evaluate(&schedule)?;
    log_conflicts(&evaluation);

    if sub_m.get_flag("json") {
        let kpi = ScheduleKpi::calculate(&evaluation);
        let out = serde_json::json!({ "kpi": kpi, "evaluation": evaluation });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "The average delay per passenger with this schedule is {:.2} minutes, or {}.",
            evaluation.average_wait,
            format_wait(evaluation.average_wait)
        );
        print!("{}", to_csv(&evaluation.records));
    }

    let output = sub_m
        .get_one::<PathBuf>("output")
        .ok_or_else(|| anyhow!("Missing output path"))?;
    write_report(output, &evaluation)
}

pub fn optimize(sub_m: &ArgMatches) -> Result<()> {
    let problem = load_problem(sub_m)?;
    let start = load_schedule(sub_m, &problem)?;

    let mut config = match sub_m.get_one::<PathBuf>("search") {
        Some(path) => load_json::<SearchConfig>(path)
            .with_context(|| format!("Failed to load search config from {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(widths) = sub_m.get_many::<u32>("width") {
        config.offset_widths = widths.copied().collect();
    }
    if let Some(&coordinates) = sub_m.get_one::<usize>("coordinates") {
        config.coordinates = coordinates;
    }
    if let Some(&max_passes) = sub_m.get_one::<usize>("max-passes") {
        config.max_passes = max_passes;
    }
    if let Some(&samples) = sub_m.get_one::<usize>("samples") {
        let seed = sub_m.get_one::<u64>("seed").copied().unwrap_or_default();
        config = config.with_sampling(samples, seed);
    }

    let evaluator = ScheduleEvaluator::new(&problem).with_order(processing_order(sub_m));
    let search = LocalSearch::new(&evaluator, config);
    log::info!(
        "searching {} coordinates per move, widths {:?}, up to {} passes",
        search.config().coordinates,
        search.config().offset_widths,
        search.config().max_passes
    );
    let outcome = search.run(&start)?;

    println!(
        "Average delay {:.4} ({}) -> {:.4} ({}) after {} passes{}",
        outcome.initial_wait,
        format_wait(outcome.initial_wait),
        outcome.best_wait,
        format_wait(outcome.best_wait),
        outcome.passes.len(),
        if outcome.converged { ", converged" } else { "" }
    );
    let times: Vec<String> = outcome.best.times().iter().map(|t| t.to_hmm().to_string()).collect();
    println!("Best departure times: [{}]", times.join(","));

    let evaluation = evaluator.evaluate(&outcome.best)?;
    log_conflicts(&evaluation);
    let output = sub_m
        .get_one::<PathBuf>("output")
        .ok_or_else(|| anyhow!("Missing output path"))?;
    write_report(output, &evaluation)
}
