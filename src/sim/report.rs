use average::{Estimate, Mean};
use rustc_hash::FxHashMap;

use super::job::ProcessId;
use crate::core::{Slice, Time, state::SimCtx};
use crate::error::SimError;
use crate::scheduler::Algorithm;

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessMetrics {
    pub id: ProcessId,
    pub arrival: Time,
    pub burst: Time,
    pub priority: Option<f64>,
    pub completion: Time,
    pub turnaround: Time,
    pub waiting: Time,
}

/// Who ran when, in dispatch order. Contiguous slices of the same process
/// are kept apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionTrace {
    slices: Vec<Slice>,
}

impl ExecutionTrace {
    pub fn new(slices: Vec<Slice>) -> Self {
        Self { slices }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slice> {
        self.slices.iter()
    }

    pub fn as_slice(&self) -> &[Slice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Total time `pid` spent on the CPU.
    pub fn busy_time(&self, pid: ProcessId) -> Time {
        self.slices
            .iter()
            .filter(|slice| slice.pid == pid)
            .map(Slice::duration)
            .sum()
    }

    /// End of the last slice.
    pub fn makespan(&self) -> Time {
        self.slices.last().map_or(0.0, |slice| slice.end)
    }

    /// Row of `pid` in a chart with one row per process, rows sorted by id.
    pub fn lane(&self, pid: ProcessId) -> Option<usize> {
        let mut pids: Vec<ProcessId> = self.slices.iter().map(|slice| slice.pid).collect();
        pids.sort_unstable();
        pids.dedup();
        pids.binary_search(&pid).ok()
    }
}

impl<'a> IntoIterator for &'a ExecutionTrace {
    type Item = &'a Slice;
    type IntoIter = std::slice::Iter<'a, Slice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}

/// Outcome of one run: per-process metrics in process-id order plus the trace.
#[derive(Debug, Clone)]
pub struct Report {
    algorithm: Algorithm,
    metrics: Vec<ProcessMetrics>,
    trace: ExecutionTrace,
    index: FxHashMap<ProcessId, usize>,
}

impl Report {
    pub(crate) fn from_ctx(algorithm: Algorithm, ctx: &SimCtx) -> Result<Self, SimError> {
        let mut metrics = ctx
            .tasks
            .iter()
            .map(|task| {
                let completion = task.completion.ok_or_else(|| {
                    SimError::InternalInvariant(format!("P{} never completed", task.pid))
                })?;
                let turnaround = completion - task.arrival;
                let mut waiting = turnaround - task.burst;
                if algorithm.is_preemptive() {
                    waiting = waiting.max(0.0);
                }
                Ok(ProcessMetrics {
                    id: task.pid,
                    arrival: task.arrival,
                    burst: task.burst,
                    priority: task.priority,
                    completion,
                    turnaround,
                    waiting,
                })
            })
            .collect::<Result<Vec<_>, SimError>>()?;
        metrics.sort_by_key(|m| m.id);

        let index = metrics
            .iter()
            .enumerate()
            .map(|(position, m)| (m.id, position))
            .collect();

        Ok(Self {
            algorithm,
            metrics,
            trace: ExecutionTrace::new(ctx.trace.clone()),
            index,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn metrics(&self) -> &[ProcessMetrics] {
        &self.metrics
    }

    pub fn metrics_for(&self, pid: ProcessId) -> Option<&ProcessMetrics> {
        self.index.get(&pid).map(|&position| &self.metrics[position])
    }

    pub fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }

    pub fn average_turnaround(&self) -> f64 {
        avg(self.metrics.iter().map(|m| m.turnaround))
    }

    pub fn average_waiting(&self) -> f64 {
        avg(self.metrics.iter().map(|m| m.waiting))
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}
