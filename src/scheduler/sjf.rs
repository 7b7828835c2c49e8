use super::{Algorithm, Scheduler, first_best, scan_order};
use crate::core::state::{SimCtx, TaskId};

/// Shortest job first, non-preemptive.
pub struct SjfScheduler {
    order: Vec<TaskId>,
}

impl Scheduler for SjfScheduler {
    const ALGORITHM: Algorithm = Algorithm::Sjf;

    fn init(ctx: &SimCtx) -> Self {
        Self {
            order: scan_order(ctx, |a, b| a.burst.total_cmp(&b.burst)),
        }
    }

    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId> {
        first_best(ctx, &self.order, |candidate, best| candidate.burst < best.burst)
    }
}
