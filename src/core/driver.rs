use log::trace;

use super::{
    event::SchedCoreEvent,
    observer::Observer,
    state::{SimCtx, TaskId, Time},
};
use crate::error::SimError;
use crate::scheduler::{Granularity, Scheduler};
use crate::sim::{Process, SimConfig};

pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
    quantum: Time,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(processes: &[Process], config: &SimConfig) -> Self {
        let ctx = SimCtx::new(processes);
        let scheduler = S::init(&ctx);
        let observer = Observer::new(config.check_invariants);
        Self {
            ctx,
            scheduler,
            observer,
            quantum: config.quantum,
        }
    }

    /// Makes one scheduling decision: either dispatches a slice or moves the
    /// clock to the next arrival.
    pub fn step(&mut self) -> Result<SchedCoreEvent, SimError> {
        self.ctx.admit_arrivals();

        let event = match self.scheduler.pick_next(&self.ctx) {
            Some(task) => self.dispatch(task)?,
            None if self.ctx.has_eligible() => {
                return Err(SimError::InternalInvariant(format!(
                    "{} picked nothing at t={} with ready processes",
                    S::ALGORITHM,
                    self.ctx.now
                )));
            }
            None => self.idle()?,
        };
        self.ctx.admit_arrivals();

        self.observer.observe(&self.ctx)?;
        Ok(event)
    }

    fn dispatch(&mut self, task_id: TaskId) -> Result<SchedCoreEvent, SimError> {
        let task = self.ctx.task(task_id);
        if !task.is_eligible() {
            return Err(SimError::InternalInvariant(format!(
                "{} picked P{} at t={} but it is not ready",
                S::ALGORITHM,
                task.pid,
                self.ctx.now
            )));
        }

        let remaining = task.remaining;
        let slice = match S::ALGORITHM.granularity() {
            Granularity::RunToCompletion => remaining,
            Granularity::UntilNextArrival => match self.ctx.next_arrival() {
                Some(at) => remaining.min(at - self.ctx.now),
                None => remaining,
            },
            Granularity::Quantum => {
                let slice = remaining.min(self.quantum);
                self.ctx.accrue_waiting(task_id, slice);
                slice
            }
        };

        let completed = self.ctx.execute(task_id, slice);
        let Some(&recorded) = self.ctx.trace.last() else {
            return Err(SimError::InternalInvariant(format!(
                "dispatch of task {task_id} left no trace entry"
            )));
        };

        // A non-empty slice has to move both the clock and the remaining burst
        if slice > 0.0 {
            if recorded.end <= recorded.start {
                return Err(SimError::InternalInvariant(format!(
                    "{}: clock failed to advance past t={} running P{} for {slice}",
                    S::ALGORITHM,
                    recorded.start,
                    recorded.pid
                )));
            }
            if !completed && self.ctx.task(task_id).remaining >= remaining {
                return Err(SimError::InternalInvariant(format!(
                    "{}: P{} made no progress on remaining burst {remaining}",
                    S::ALGORITHM,
                    recorded.pid
                )));
            }
        }

        trace!(
            "{}: P{} ran [{}, {}){}",
            S::ALGORITHM,
            recorded.pid,
            recorded.start,
            recorded.end,
            if completed { ", completed" } else { "" }
        );

        Ok(SchedCoreEvent::Dispatched {
            task: task_id,
            slice: recorded,
            completed,
        })
    }

    fn idle(&mut self) -> Result<SchedCoreEvent, SimError> {
        let from = self.ctx.now;
        let to = match self.ctx.next_arrival() {
            Some(at) => at,
            // Unreachable while every incomplete task is either pending or
            // ready, kept so a unit-step run can never stall
            None if S::ALGORITHM.granularity() == Granularity::Quantum => from + self.quantum,
            None => {
                return Err(SimError::InternalInvariant(format!(
                    "{}: nothing ready and no pending arrival at t={from}",
                    S::ALGORITHM
                )));
            }
        };

        if to <= from {
            return Err(SimError::InternalInvariant(format!(
                "{}: clock failed to advance past t={from}",
                S::ALGORITHM
            )));
        }

        trace!("{}: idle [{from}, {to})", S::ALGORITHM);
        self.ctx.advance_to(to);
        Ok(SchedCoreEvent::Idle { from, to })
    }

    pub fn now(&self) -> Time {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
