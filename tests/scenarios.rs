use sched_sim::core::SchedCoreEvent;
use sched_sim::scheduler::{LrtfScheduler, SrtfScheduler};
use sched_sim::{
    Algorithm, ProcessRow, ProcessTable, Report, Scheduler, Sim, SimConfig, SimError, simulate,
};

fn table(rows: &[(f64, f64)]) -> ProcessTable {
    ProcessTable::new(
        rows.iter()
            .map(|&(arrival, burst)| ProcessRow::new(arrival, burst))
            .collect(),
    )
    .unwrap()
}

fn run(algorithm: Algorithm, table: &ProcessTable) -> Report {
    simulate(algorithm, table, &SimConfig::default()).unwrap()
}

fn completions(report: &Report) -> Vec<f64> {
    report.metrics().iter().map(|m| m.completion).collect()
}

#[test]
fn fcfs_two_processes() {
    let report = run(Algorithm::Fcfs, &table(&[(0.0, 5.0), (1.0, 3.0)]));

    let a = report.metrics_for(1).unwrap();
    let b = report.metrics_for(2).unwrap();
    assert_eq!((a.completion, a.waiting), (5.0, 0.0));
    assert_eq!((b.completion, b.waiting), (8.0, 4.0));
    assert_eq!(b.turnaround, 7.0);
    assert_eq!(report.average_waiting(), 2.0);
    assert_eq!(report.average_turnaround(), 6.0);
}

#[test]
fn sjf_textbook_example() {
    let report = run(
        Algorithm::Sjf,
        &table(&[(0.0, 8.0), (1.0, 4.0), (2.0, 9.0), (3.0, 5.0)]),
    );

    let order: Vec<_> = report.trace().iter().map(|slice| slice.pid).collect();
    assert_eq!(order, vec![1, 2, 4, 3]);
    assert_eq!(completions(&report), vec![8.0, 12.0, 26.0, 17.0]);
    assert_eq!(report.average_waiting(), 7.75);
}

#[test]
fn single_priority_preemptive_process_behaves_like_fcfs() {
    let table = ProcessTable::new(vec![ProcessRow::with_priority(0.0, 6.0, 3.0)]).unwrap();
    let report = run(Algorithm::PriorityPreemptive, &table);

    let only = report.metrics_for(1).unwrap();
    assert_eq!(only.completion, 6.0);
    assert_eq!(only.waiting, 0.0);
    assert_eq!(report.trace().len(), 1);
}

#[test]
fn single_process_never_waits_under_any_algorithm() {
    let table = ProcessTable::new(vec![ProcessRow::with_priority(2.5, 3.0, 1.0)]).unwrap();

    for algorithm in Algorithm::ALL {
        let report = run(algorithm, &table);
        let only = report.metrics_for(1).unwrap();
        assert_eq!(only.completion, 5.5, "{algorithm}");
        assert_eq!(only.waiting, 0.0, "{algorithm}");
        assert_eq!(report.trace().busy_time(1), 3.0, "{algorithm}");
    }
}

#[test]
fn negative_burst_is_rejected_before_simulation() {
    let err = ProcessTable::new(vec![ProcessRow::new(0.0, 2.0), ProcessRow::new(0.0, -1.0)])
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidInput { row: 2, .. }));
}

#[test]
fn empty_table_is_rejected() {
    assert_eq!(ProcessTable::new(Vec::new()).unwrap_err(), SimError::EmptyInput);
}

#[test]
fn idle_gap_jumps_to_next_arrival() {
    for algorithm in [Algorithm::Fcfs, Algorithm::Sjf, Algorithm::Hrrn, Algorithm::Srtf] {
        let report = run(algorithm, &table(&[(0.0, 1.0), (4.0, 2.0)]));
        let starts: Vec<_> = report.trace().iter().map(|slice| slice.start).collect();
        assert_eq!(starts.first(), Some(&0.0), "{algorithm}");
        assert_eq!(starts.get(1), Some(&4.0), "{algorithm}");
        assert_eq!(report.metrics_for(2).unwrap().completion, 6.0, "{algorithm}");
    }
}

#[test]
fn zero_burst_processes_terminate_everywhere() {
    let table = ProcessTable::new(vec![
        ProcessRow::with_priority(0.0, 0.0, 2.0),
        ProcessRow::with_priority(0.0, 2.0, 1.0),
        ProcessRow::with_priority(3.0, 0.0, 1.0),
    ])
    .unwrap();

    for algorithm in Algorithm::ALL {
        let report = run(algorithm, &table);
        assert_eq!(report.trace().busy_time(1), 0.0, "{algorithm}");
        assert_eq!(report.metrics_for(3).unwrap().completion, 3.0, "{algorithm}");
    }
}

// Drives a unit-step run and checks that every tick charges exactly one unit
// to each other process that had arrived and was not done.
fn assert_one_unit_per_waiting_tick<S: Scheduler>(table: &ProcessTable) {
    let mut sim = Sim::<S>::new(table, &SimConfig::default()).unwrap();

    while !sim.all_processes_completed() {
        let now = sim.core.now();
        let before: Vec<(bool, f64)> = sim
            .core
            .ctx
            .tasks
            .iter()
            .map(|task| (task.arrival <= now && !task.is_completed(), task.waited))
            .collect();

        let event = sim.step().unwrap();
        let SchedCoreEvent::Dispatched { task: running, .. } = event else {
            continue;
        };

        for (task, &(was_ready, waited)) in sim.core.ctx.tasks.iter().zip(&before) {
            let expected = if was_ready && task.id != running { 1.0 } else { 0.0 };
            assert_eq!(
                task.waited - waited,
                expected,
                "{} at t={now}: P{}",
                S::ALGORITHM,
                task.pid
            );
        }
    }
}

#[test]
fn srtf_and_lrtf_charge_one_unit_per_tick() {
    let table = table(&[(0.0, 3.0), (1.0, 2.0), (1.0, 4.0), (6.0, 1.0), (12.0, 2.0)]);
    assert_one_unit_per_waiting_tick::<SrtfScheduler>(&table);
    assert_one_unit_per_waiting_tick::<LrtfScheduler>(&table);
}

#[test]
fn accrued_waiting_matches_reported_waiting_for_whole_units() {
    let table = table(&[(0.0, 3.0), (1.0, 2.0), (1.0, 4.0), (6.0, 1.0)]);
    let mut sim = Sim::<SrtfScheduler>::new(&table, &SimConfig::default()).unwrap();
    while !sim.all_processes_completed() {
        sim.step().unwrap();
    }
    let accrued: Vec<f64> = sim.core.ctx.tasks.iter().map(|task| task.waited).collect();

    let report = run(Algorithm::Srtf, &table);
    let reported: Vec<f64> = report.metrics().iter().map(|m| m.waiting).collect();
    assert_eq!(accrued, reported);
}

#[test]
fn lrtf_prefers_longest_remaining_work() {
    let report = run(Algorithm::Lrtf, &table(&[(0.0, 2.0), (0.0, 4.0), (0.0, 6.0)]));

    // Remaining times converge, then the three processes round-robin
    assert_eq!(completions(&report), vec![10.0, 11.0, 12.0]);
    let first: Vec<_> = report.trace().iter().take(4).map(|slice| slice.pid).collect();
    assert_eq!(first, vec![3, 3, 2, 3]);
}

#[test]
fn ljf_picks_first_ready_in_longest_first_order() {
    let report = run(
        Algorithm::Ljf,
        &table(&[(0.0, 1.0), (0.5, 2.0), (0.5, 7.0), (0.5, 7.0)]),
    );

    let order: Vec<_> = report.trace().iter().map(|slice| slice.pid).collect();
    assert_eq!(order, vec![1, 3, 4, 2]);
    assert_eq!(completions(&report), vec![1.0, 17.0, 8.0, 15.0]);
}

#[test]
fn unsorted_input_is_not_reordered_in_the_report() {
    let report = run(Algorithm::Fcfs, &table(&[(4.0, 1.0), (0.0, 1.0)]));

    let ids: Vec<_> = report.metrics().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(completions(&report), vec![5.0, 1.0]);
}
