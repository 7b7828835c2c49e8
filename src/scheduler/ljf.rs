use super::{Algorithm, Scheduler, scan_order};
use crate::core::state::{SimCtx, TaskId};

/// Longest job first, non-preemptive.
///
/// Tasks are scanned longest burst first and the first ready one is
/// dispatched. Equal bursts keep table order.
pub struct LjfScheduler {
    order: Vec<TaskId>,
}

impl Scheduler for LjfScheduler {
    const ALGORITHM: Algorithm = Algorithm::Ljf;

    fn init(ctx: &SimCtx) -> Self {
        Self {
            order: scan_order(ctx, |a, b| b.burst.total_cmp(&a.burst)),
        }
    }

    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId> {
        self.order
            .iter()
            .copied()
            .find(|&task| ctx.task(task).is_eligible())
    }
}
