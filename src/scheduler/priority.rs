use super::{Algorithm, Scheduler, first_best, scan_order};
use crate::core::state::{SimCtx, Task, TaskId};

// Lower value is more urgent; equal priorities fall back to arrival time
fn by_priority_then_arrival(ctx: &SimCtx) -> Vec<TaskId> {
    scan_order(ctx, |a: &Task, b: &Task| {
        a.priority_key()
            .total_cmp(&b.priority_key())
            .then_with(|| a.arrival.total_cmp(&b.arrival))
    })
}

/// Non-preemptive priority scheduling.
pub struct PriorityScheduler {
    order: Vec<TaskId>,
}

impl Scheduler for PriorityScheduler {
    const ALGORITHM: Algorithm = Algorithm::Priority;

    fn init(ctx: &SimCtx) -> Self {
        Self {
            order: by_priority_then_arrival(ctx),
        }
    }

    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId> {
        first_best(ctx, &self.order, |candidate, best| {
            candidate.priority_key() < best.priority_key()
                || (candidate.priority_key() == best.priority_key()
                    && candidate.arrival < best.arrival)
        })
    }
}

/// Preemptive priority scheduling. The running process keeps the CPU until
/// it finishes or another process arrives, then the choice is made again.
pub struct PreemptivePriorityScheduler {
    order: Vec<TaskId>,
}

impl Scheduler for PreemptivePriorityScheduler {
    const ALGORITHM: Algorithm = Algorithm::PriorityPreemptive;

    fn init(ctx: &SimCtx) -> Self {
        Self {
            order: by_priority_then_arrival(ctx),
        }
    }

    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId> {
        first_best(ctx, &self.order, |candidate, best| {
            candidate.priority_key() < best.priority_key()
        })
    }
}
