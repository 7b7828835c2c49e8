use std::process::ExitCode;

use clap::Parser;
use log::{Level, LevelFilter, Metadata, Record, error, info, warn};
use rand::prelude::*;
use sched_sim::{
    Algorithm, ProcessRow, ProcessTable, RawRow, Report, SimConfig, SimError, simulate,
};

/// Simulate CPU scheduling disciplines and print per-process metrics.
#[derive(Parser, Debug)]
#[command(name = "sched-sim", version)]
struct Args {
    /// Algorithm to run; repeat to run several. Runs every applicable one when omitted
    #[arg(short, long, value_enum)]
    algorithm: Vec<Algorithm>,

    /// Process as ARRIVAL:BURST[:PRIORITY]; repeat once per process
    #[arg(short, long, value_name = "ROW", conflicts_with = "random")]
    process: Vec<String>,

    /// Generate this many random processes instead of reading --process
    #[arg(short, long, value_name = "COUNT")]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Latest arrival time for generated processes
    #[arg(long, default_value_t = 10)]
    max_arrival: u32,

    /// Longest burst for generated processes
    #[arg(long, default_value_t = 8)]
    max_burst: u32,

    /// Largest priority value for generated processes
    #[arg(long, default_value_t = 5)]
    max_priority: u32,

    /// Slice length of SRTF and LRTF
    #[arg(short, long, default_value_t = sched_sim::sim::DEFAULT_QUANTUM)]
    quantum: f64,

    /// Print the execution trace of every run
    #[arg(short, long)]
    trace: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(err) = log::set_logger(&LOGGER).map(|()| log::set_max_level(level)) {
        eprintln!("[{}] logger already initialized: {err}", Level::Warn);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let table = build_table(args)?;
    let config = SimConfig {
        quantum: args.quantum,
        ..SimConfig::default()
    };

    let algorithms: Vec<Algorithm> = if args.algorithm.is_empty() {
        let has_priorities = table.iter().all(|process| process.priority.is_some());
        if !has_priorities {
            warn!("some processes have no priority, skipping priority scheduling");
        }
        Algorithm::ALL
            .into_iter()
            .filter(|algorithm| has_priorities || !algorithm.requires_priority())
            .collect()
    } else {
        args.algorithm.clone()
    };

    info!(
        "simulating {} processes with {} algorithm(s)",
        table.len(),
        algorithms.len()
    );

    for algorithm in algorithms {
        let report = simulate(algorithm, &table, &config)?;
        print_report(&report, args.trace);
    }
    Ok(())
}

fn build_table(args: &Args) -> Result<ProcessTable, SimError> {
    if !args.process.is_empty() {
        let fields: Vec<Vec<&str>> = args
            .process
            .iter()
            .map(|row| row.split(':').collect())
            .collect();

        let mut rows = Vec::with_capacity(fields.len());
        for (position, parts) in fields.iter().enumerate() {
            let row = match parts.as_slice() {
                [arrival, burst] => RawRow {
                    arrival: *arrival,
                    burst: *burst,
                    priority: None,
                },
                [arrival, burst, priority] => RawRow {
                    arrival: *arrival,
                    burst: *burst,
                    priority: Some(*priority),
                },
                _ => {
                    return Err(SimError::InvalidInput {
                        row: position + 1,
                        reason: format!(
                            "expected ARRIVAL:BURST[:PRIORITY], got `{}`",
                            args.process[position]
                        ),
                    });
                }
            };
            rows.push(row);
        }
        return ProcessTable::parse_rows(&rows);
    }

    let count = args.random.unwrap_or(5);
    ProcessTable::new(random_rows(
        count,
        args.seed,
        args.max_arrival,
        args.max_burst.max(1),
        args.max_priority.max(1),
    ))
}

fn random_rows(
    count: usize,
    seed: u64,
    max_arrival: u32,
    max_burst: u32,
    max_priority: u32,
) -> Vec<ProcessRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            ProcessRow::with_priority(
                rng.random_range(0..=max_arrival) as f64,
                rng.random_range(1..=max_burst) as f64,
                rng.random_range(1..=max_priority) as f64,
            )
        })
        .collect()
}

fn print_report(report: &Report, with_trace: bool) {
    println!("== {} ==", report.algorithm());
    println!(
        "{:>5} {:>9} {:>9} {:>9} {:>11} {:>11} {:>9}",
        "PID", "Arrival", "Burst", "Priority", "Completion", "Turnaround", "Waiting"
    );
    for m in report.metrics() {
        let priority = m
            .priority
            .map_or_else(|| "-".to_owned(), |p| format!("{p:.2}"));
        println!(
            "{:>5} {:>9.2} {:>9.2} {:>9} {:>11.2} {:>11.2} {:>9.2}",
            m.id, m.arrival, m.burst, priority, m.completion, m.turnaround, m.waiting
        );
    }
    println!(
        "{:<5} {:>9} {:>9} {:>9} {:>11} {:>11.2} {:>9.2}",
        "Avg",
        "",
        "",
        "",
        "",
        report.average_turnaround(),
        report.average_waiting()
    );

    if with_trace {
        println!("Trace:");
        for slice in report.trace() {
            println!("  [{:>7.2}, {:>7.2})  P{}", slice.start, slice.end, slice.pid);
        }
    }
    println!();
}
