use crate::core::{TaskId, Time};
use crate::sim::ProcessId;

/// One execution interval of the Gantt trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub start: Time,
    pub end: Time,
    pub pid: ProcessId,
}

impl Slice {
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchedCoreEvent {
    Dispatched {
        task: TaskId,
        slice: Slice,
        completed: bool,
    },
    // Nothing was eligible, the clock jumped forward
    Idle {
        from: Time,
        to: Time,
    },
}
