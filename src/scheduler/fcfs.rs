use super::{Algorithm, Scheduler, scan_order};
use crate::core::state::{SimCtx, TaskId};

/// Dispatches in arrival order; ties keep table order.
pub struct FcfsScheduler {
    order: Vec<TaskId>,
    // Position in `order` of the first task that has not completed
    cursor: usize,
}

impl Scheduler for FcfsScheduler {
    const ALGORITHM: Algorithm = Algorithm::Fcfs;

    fn init(ctx: &SimCtx) -> Self {
        Self {
            order: scan_order(ctx, |a, b| a.arrival.total_cmp(&b.arrival)),
            cursor: 0,
        }
    }

    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId> {
        while self
            .order
            .get(self.cursor)
            .is_some_and(|&task| ctx.task(task).is_completed())
        {
            self.cursor += 1;
        }

        // The head has the earliest arrival of everything left, so if it has
        // not arrived nothing else has either
        let &head = self.order.get(self.cursor)?;
        ctx.task(head).is_eligible().then_some(head)
    }
}
