pub mod fcfs;
pub mod hrrn;
pub mod ljf;
pub mod priority;
pub mod remaining;
pub mod sjf;

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::core::state::{SimCtx, Task, TaskId};
pub use fcfs::FcfsScheduler;
pub use hrrn::HrrnScheduler;
pub use ljf::LjfScheduler;
pub use priority::{PreemptivePriorityScheduler, PriorityScheduler};
pub use remaining::{LrtfScheduler, SrtfScheduler};
pub use sjf::SjfScheduler;

/// How long a dispatched process keeps the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    RunToCompletion,
    // Until it finishes or the next process arrives
    UntilNextArrival,
    // One quantum, or less if the process finishes first
    Quantum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Algorithm {
    /// First come, first served
    Fcfs,
    /// Non-preemptive priority (lower value runs first)
    Priority,
    /// Preemptive priority, re-evaluated at every arrival
    PriorityPreemptive,
    /// Shortest job first
    Sjf,
    /// Longest job first
    Ljf,
    /// Highest response ratio next
    Hrrn,
    /// Shortest remaining time first
    Srtf,
    /// Longest remaining time first
    Lrtf,
}

impl Algorithm {
    pub const ALL: [Algorithm; 8] = [
        Algorithm::Fcfs,
        Algorithm::Priority,
        Algorithm::PriorityPreemptive,
        Algorithm::Sjf,
        Algorithm::Ljf,
        Algorithm::Hrrn,
        Algorithm::Srtf,
        Algorithm::Lrtf,
    ];

    pub fn granularity(self) -> Granularity {
        match self {
            Algorithm::Fcfs
            | Algorithm::Priority
            | Algorithm::Sjf
            | Algorithm::Ljf
            | Algorithm::Hrrn => Granularity::RunToCompletion,
            Algorithm::PriorityPreemptive => Granularity::UntilNextArrival,
            Algorithm::Srtf | Algorithm::Lrtf => Granularity::Quantum,
        }
    }

    pub fn is_preemptive(self) -> bool {
        self.granularity() != Granularity::RunToCompletion
    }

    pub fn requires_priority(self) -> bool {
        matches!(self, Algorithm::Priority | Algorithm::PriorityPreemptive)
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Fcfs => "fcfs",
            Algorithm::Priority => "priority",
            Algorithm::PriorityPreemptive => "priority-preemptive",
            Algorithm::Sjf => "sjf",
            Algorithm::Ljf => "ljf",
            Algorithm::Hrrn => "hrrn",
            Algorithm::Srtf => "srtf",
            Algorithm::Lrtf => "lrtf",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Algorithm::Fcfs => "FCFS",
            Algorithm::Priority => "Priority",
            Algorithm::PriorityPreemptive => "Priority (preemptive)",
            Algorithm::Sjf => "SJF",
            Algorithm::Ljf => "LJF",
            Algorithm::Hrrn => "HRRN",
            Algorithm::Srtf => "SRTF",
            Algorithm::Lrtf => "LRTF",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scheduling algorithm `{}`", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| UnknownAlgorithm(s.to_owned()))
    }
}

pub trait Scheduler {
    const ALGORITHM: Algorithm;

    fn init(ctx: &SimCtx) -> Self;

    /// Chooses the task to run at `ctx.now`, or `None` to leave the CPU idle.
    /// Only ready tasks may be returned.
    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId>;
}

/// Task ids in table order, stably sorted by `compare`.
pub(crate) fn scan_order<F>(ctx: &SimCtx, mut compare: F) -> Vec<TaskId>
where
    F: FnMut(&Task, &Task) -> Ordering,
{
    let mut order: Vec<TaskId> = (0..ctx.tasks.len()).collect();
    order.sort_by(|&a, &b| compare(ctx.task(a), ctx.task(b)));
    order
}

/// Walks `order` and returns the ready task that no later ready task `beats`.
/// Ties stay with the task found first.
pub(crate) fn first_best<F>(ctx: &SimCtx, order: &[TaskId], mut beats: F) -> Option<TaskId>
where
    F: FnMut(&Task, &Task) -> bool,
{
    let mut best: Option<&Task> = None;
    for &task_id in order {
        let task = ctx.task(task_id);
        if !task.is_eligible() {
            continue;
        }
        match best {
            Some(current) if !beats(task, current) => {}
            _ => best = Some(task),
        }
    }
    best.map(|task| task.id)
}
