//! Remaining-time disciplines. Both re-decide after every quantum.

use super::{Algorithm, Scheduler, first_best};
use crate::core::state::{SimCtx, TaskId};

fn table_order(ctx: &SimCtx) -> Vec<TaskId> {
    (0..ctx.tasks.len()).collect()
}

/// Shortest remaining time first.
pub struct SrtfScheduler {
    order: Vec<TaskId>,
}

impl Scheduler for SrtfScheduler {
    const ALGORITHM: Algorithm = Algorithm::Srtf;

    fn init(ctx: &SimCtx) -> Self {
        Self {
            order: table_order(ctx),
        }
    }

    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId> {
        first_best(ctx, &self.order, |candidate, best| {
            candidate.remaining < best.remaining
        })
    }
}

/// Longest remaining time first.
pub struct LrtfScheduler {
    order: Vec<TaskId>,
}

impl Scheduler for LrtfScheduler {
    const ALGORITHM: Algorithm = Algorithm::Lrtf;

    fn init(ctx: &SimCtx) -> Self {
        Self {
            order: table_order(ctx),
        }
    }

    fn pick_next(&mut self, ctx: &SimCtx) -> Option<TaskId> {
        first_best(ctx, &self.order, |candidate, best| {
            candidate.remaining > best.remaining
        })
    }
}
