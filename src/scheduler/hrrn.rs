use super::{Algorithm, Scheduler, first_best};
use crate::core::state::{SimCtx, TaskId};

/// Highest response ratio next, non-preemptive.
pub struct HrrnScheduler {
    order: Vec<TaskId>,
}

impl Scheduler for HrrnScheduler {
    const ALGORITHM: Algorithm = Algorithm::Hrrn;

    fn init(ctx: &SimCtx) -> Self {
        Self {
            order: (0..ctx.tasks.len()).collect(),
        }
    }

    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId> {
        let now = ctx.now;
        first_best(ctx, &self.order, |candidate, best| {
            candidate.response_ratio(now) > best.response_ratio(now)
        })
    }
}
