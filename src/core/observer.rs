use rustc_hash::{FxHashMap, FxHashSet};

use super::state::{SimCtx, TaskId, TaskState, Time};
use crate::error::SimError;
use crate::sim::ProcessId;

/// Checks the engine's bookkeeping after every step.
#[derive(Debug)]
pub struct Observer {
    step: u64,
    last_now: Time,
    checked_slices: usize,
    // Traced run time and slice count per process
    busy: FxHashMap<ProcessId, (Time, usize)>,
    settled: FxHashSet<TaskId>,
    enabled: bool,
}

impl Observer {
    pub fn new(enabled: bool) -> Self {
        Self {
            step: 0,
            last_now: 0.0,
            checked_slices: 0,
            busy: FxHashMap::default(),
            settled: FxHashSet::default(),
            enabled,
        }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) -> Result<(), SimError> {
        self.step += 1;

        for task in &ctx.tasks {
            debug_assert_eq!(
                task.completion.is_some(),
                task.state == TaskState::Completed,
                "Task {} completion time out of sync with its state",
                task.id
            );
            debug_assert!(
                task.state != TaskState::Pending || task.arrival > ctx.now,
                "Task {} arrived at {} but was never admitted (now={})",
                task.id,
                task.arrival,
                ctx.now
            );
        }

        if !self.enabled {
            return Ok(());
        }

        if ctx.now < self.last_now {
            return Err(self.violation(format!(
                "clock moved backwards from {} to {}",
                self.last_now, ctx.now
            )));
        }
        self.last_now = ctx.now;

        for (index, slice) in ctx.trace.iter().enumerate().skip(self.checked_slices) {
            if slice.end < slice.start {
                return Err(self.violation(format!(
                    "slice for P{} ends at {} before it starts at {}",
                    slice.pid, slice.end, slice.start
                )));
            }
            if let Some(prev) = index.checked_sub(1).map(|i| &ctx.trace[i]) {
                if slice.start < prev.end {
                    return Err(self.violation(format!(
                        "slice for P{} starting at {} overlaps P{} ending at {}",
                        slice.pid, slice.start, prev.pid, prev.end
                    )));
                }
            }
            let (busy, slices) = self.busy.entry(slice.pid).or_default();
            *busy += slice.duration();
            *slices += 1;
        }
        self.checked_slices = ctx.trace.len();

        for task in ctx.tasks.iter().filter(|task| task.is_completed()) {
            if !self.settled.insert(task.id) {
                continue;
            }
            let (busy, slices) = self.busy.get(&task.pid).copied().unwrap_or_default();
            // Each slice may lose up to one rounding step of the clock
            let slack = f64::EPSILON * ctx.now.max(task.burst).max(1.0) * (slices + 1) as f64;
            if (busy - task.burst).abs() > slack {
                return Err(self.violation(format!(
                    "P{} completed after running {busy} of its {} burst",
                    task.pid, task.burst
                )));
            }
        }

        if let Some(task) = ctx.tasks.iter().find(|task| task.remaining < 0.0) {
            return Err(self.violation(format!(
                "P{} has negative remaining burst {}",
                task.pid, task.remaining
            )));
        }

        Ok(())
    }

    fn violation(&self, detail: String) -> SimError {
        SimError::InternalInvariant(format!("step {}: {detail}", self.step))
    }
}
