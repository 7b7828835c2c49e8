//! Single-CPU scheduling simulator.
//!
//! A [`ProcessTable`] is run through one of the classical disciplines in
//! [`Algorithm`] and yields a [`Report`]: completion, turnaround and waiting
//! time for every process plus the execution trace (Gantt chart data).

pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use error::SimError;
pub use scheduler::{Algorithm, Scheduler};
pub use sim::{
    ExecutionTrace, Process, ProcessId, ProcessMetrics, ProcessRow, ProcessTable, RawRow, Report,
    Sim, SimConfig, simulate,
};
