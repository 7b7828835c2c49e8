pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::{SchedCoreEvent, Slice};
pub use state::{Arrival, SimCtx, Task, TaskId, TaskState, Time};
