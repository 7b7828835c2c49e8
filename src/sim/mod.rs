pub mod config;
pub mod driver;
pub mod job;
pub mod report;

pub use config::{DEFAULT_QUANTUM, SimConfig};
pub use driver::{Sim, simulate};
pub use job::{Process, ProcessId, ProcessRow, ProcessTable, RawRow};
pub use report::{ExecutionTrace, ProcessMetrics, Report};

#[cfg(test)]
pub(crate) use job::tests_support::test_table;
