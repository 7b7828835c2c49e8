use log::debug;

use super::{config::SimConfig, job::ProcessTable, report::Report};
use crate::{
    core::{driver::SchedCore, event::SchedCoreEvent},
    error::SimError,
    scheduler::{
        Algorithm, FcfsScheduler, HrrnScheduler, LjfScheduler, LrtfScheduler,
        PreemptivePriorityScheduler, PriorityScheduler, Scheduler, SjfScheduler, SrtfScheduler,
    },
};

/// One simulation run of policy `S` over a process table.
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(table: &ProcessTable, config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        table.check_for(S::ALGORITHM)?;

        debug!(
            "{}: starting run over {} processes (quantum={})",
            S::ALGORITHM,
            table.len(),
            config.quantum
        );

        Ok(Self {
            core: SchedCore::new(table.as_slice(), config),
        })
    }

    pub fn step(&mut self) -> Result<SchedCoreEvent, SimError> {
        self.core.step()
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.ctx.all_completed()
    }

    /// Steps until every process has completed.
    pub fn run(mut self) -> Result<Report, SimError> {
        while !self.all_processes_completed() {
            self.step()?;
        }

        let report = Report::from_ctx(S::ALGORITHM, &self.core.ctx)?;
        debug!(
            "{}: finished at t={} after {} steps, avg turnaround {:.2}, avg waiting {:.2}",
            S::ALGORITHM,
            self.core.now(),
            self.core.observer().steps(),
            report.average_turnaround(),
            report.average_waiting()
        );
        Ok(report)
    }
}

/// Runs `algorithm` over `table` to completion.
pub fn simulate(
    algorithm: Algorithm,
    table: &ProcessTable,
    config: &SimConfig,
) -> Result<Report, SimError> {
    match algorithm {
        Algorithm::Fcfs => Sim::<FcfsScheduler>::new(table, config)?.run(),
        Algorithm::Priority => Sim::<PriorityScheduler>::new(table, config)?.run(),
        Algorithm::PriorityPreemptive => {
            Sim::<PreemptivePriorityScheduler>::new(table, config)?.run()
        }
        Algorithm::Sjf => Sim::<SjfScheduler>::new(table, config)?.run(),
        Algorithm::Ljf => Sim::<LjfScheduler>::new(table, config)?.run(),
        Algorithm::Hrrn => Sim::<HrrnScheduler>::new(table, config)?.run(),
        Algorithm::Srtf => Sim::<SrtfScheduler>::new(table, config)?.run(),
        Algorithm::Lrtf => Sim::<LrtfScheduler>::new(table, config)?.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Slice;
    use crate::sim::test_table;

    #[test]
    fn steps_report_idle_jumps_and_dispatches() {
        let table = test_table(&[(2.0, 1.0, None), (5.0, 1.0, None)]);
        let mut sim = Sim::<FcfsScheduler>::new(&table, &SimConfig::default()).unwrap();

        let mut events = Vec::new();
        while !sim.all_processes_completed() {
            events.push(sim.step().unwrap());
        }

        assert_eq!(
            events,
            vec![
                SchedCoreEvent::Idle { from: 0.0, to: 2.0 },
                SchedCoreEvent::Dispatched {
                    task: 0,
                    slice: Slice {
                        start: 2.0,
                        end: 3.0,
                        pid: 1,
                    },
                    completed: true,
                },
                SchedCoreEvent::Idle { from: 3.0, to: 5.0 },
                SchedCoreEvent::Dispatched {
                    task: 1,
                    slice: Slice {
                        start: 5.0,
                        end: 6.0,
                        pid: 2,
                    },
                    completed: true,
                },
            ]
        );
    }

    #[test]
    fn unit_steps_charge_waiting_to_ready_processes() {
        let table = test_table(&[(0.0, 2.0, None), (0.0, 3.0, None), (1.0, 1.0, None)]);
        let mut sim = Sim::<SrtfScheduler>::new(&table, &SimConfig::default()).unwrap();

        // t=0: P1 runs, P2 waits
        sim.step().unwrap();
        assert_eq!(sim.core.ctx.task(1).waited, 1.0);
        assert_eq!(sim.core.ctx.task(2).waited, 0.0);

        // t=1: P1 and P3 both have 1 left, P1 was found first; P2 and P3 wait
        sim.step().unwrap();
        assert_eq!(sim.core.ctx.task(0).waited, 0.0);
        assert_eq!(sim.core.ctx.task(1).waited, 2.0);
        assert_eq!(sim.core.ctx.task(2).waited, 1.0);
    }

    #[test]
    fn rejects_missing_priority_before_running() {
        let table = test_table(&[(0.0, 1.0, None)]);
        let err = simulate(Algorithm::Priority, &table, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput { row: 1, .. }));
    }

    #[test]
    fn rejects_invalid_quantum() {
        let table = test_table(&[(0.0, 1.0, None)]);
        let config = SimConfig {
            quantum: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            simulate(Algorithm::Srtf, &table, &config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn picking_a_task_that_has_not_arrived_is_an_invariant_error() {
        struct Stubborn;

        impl Scheduler for Stubborn {
            const ALGORITHM: Algorithm = Algorithm::Fcfs;

            fn init(_ctx: &crate::core::SimCtx) -> Self {
                Self
            }

            fn pick_next(&mut self, _ctx: &crate::core::SimCtx) -> Option<usize> {
                Some(1)
            }
        }

        let table = test_table(&[(0.0, 1.0, None), (9.0, 1.0, None)]);
        let err = Sim::<Stubborn>::new(&table, &SimConfig::default())
            .unwrap()
            .run()
            .unwrap_err();
        assert!(matches!(err, SimError::InternalInvariant(_)));
    }

    #[test]
    fn dispatch_that_cannot_move_the_clock_is_an_invariant_error() {
        // Past 2^53 a slice of a few units vanishes when added to the clock
        let table = test_table(&[(1e17, 2.0, Some(1.0))]);
        for algorithm in Algorithm::ALL {
            let err = simulate(algorithm, &table, &SimConfig::default()).unwrap_err();
            assert!(
                matches!(err, SimError::InternalInvariant(_)),
                "{algorithm}: {err}"
            );
        }
    }

    #[test]
    fn quantum_below_burst_resolution_is_an_invariant_error() {
        let table = test_table(&[(0.0, 1.0, None)]);
        let config = SimConfig {
            quantum: 1e-20,
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());

        for algorithm in [Algorithm::Srtf, Algorithm::Lrtf] {
            let err = simulate(algorithm, &table, &config).unwrap_err();
            assert!(
                matches!(err, SimError::InternalInvariant(_)),
                "{algorithm}: {err}"
            );
        }

        let mut sim = Sim::<SrtfScheduler>::new(&table, &config).unwrap();
        assert!(matches!(sim.step(), Err(SimError::InternalInvariant(_))));
        assert_eq!(sim.core.ctx.task(0).remaining, 1.0);
    }
}
