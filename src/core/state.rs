use keyed_priority_queue::KeyedPriorityQueue;
use std::cmp::Ordering;

use super::event::Slice;
use crate::sim::{Process, ProcessId};

// Index into the task Vec; equal to the process's position in the input table
pub type TaskId = usize;
pub type Time = f64;

/// Arrival time of a task that has not been admitted yet.
#[derive(Debug, Clone, Copy)]
pub struct Arrival {
    pub at: Time,
    pub task: TaskId,
}

impl PartialEq for Arrival {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Arrival {}

impl PartialOrd for Arrival {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// KeyedPriorityQueue is a max-heap, so the earliest arrival (then the lowest
// table position) has to compare as the greatest
impl Ord for Arrival {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.task.cmp(&self.task))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Ready,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub pid: ProcessId,
    pub state: TaskState,
    pub arrival: Time,
    pub burst: Time,
    pub priority: Option<f64>,
    pub remaining: Time,
    // Time spent ready but not running, accrued slice by slice
    pub waited: Time,
    pub completion: Option<Time>,
}

impl Task {
    pub fn is_eligible(&self) -> bool {
        self.state == TaskState::Ready
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    /// Priority used for ordering. Tasks without one sort after every
    /// prioritized task.
    pub fn priority_key(&self) -> f64 {
        self.priority.unwrap_or(f64::INFINITY)
    }

    /// (time waited so far + remaining burst) / remaining burst.
    ///
    /// A task with nothing left to run has an infinite ratio.
    pub fn response_ratio(&self, now: Time) -> f64 {
        if self.remaining <= 0.0 {
            return f64::INFINITY;
        }
        (now - self.arrival + self.remaining) / self.remaining
    }
}

#[derive(Debug)]
pub struct SimCtx {
    pub now: Time,
    pub tasks: Vec<Task>,
    pub trace: Vec<Slice>,
    pending: KeyedPriorityQueue<TaskId, Arrival>,
}

impl SimCtx {
    pub fn new(processes: &[Process]) -> Self {
        let mut tasks = Vec::with_capacity(processes.len());
        let mut pending = KeyedPriorityQueue::new();

        for (id, process) in processes.iter().enumerate() {
            tasks.push(Task {
                id,
                pid: process.id,
                state: TaskState::Pending,
                arrival: process.arrival,
                burst: process.burst,
                priority: process.priority,
                remaining: process.burst,
                waited: 0.0,
                completion: None,
            });
            pending.push(
                id,
                Arrival {
                    at: process.arrival,
                    task: id,
                },
            );
        }

        Self {
            now: 0.0,
            tasks,
            trace: Vec::new(),
            pending,
        }
    }

    /// Moves every task whose arrival time has been reached to `Ready`.
    /// Returns how many tasks were admitted.
    pub fn admit_arrivals(&mut self) -> usize {
        let mut admitted = 0;
        while let Some((_, arrival)) = self.pending.peek() {
            if arrival.at > self.now {
                break;
            }
            let Some((task_id, _)) = self.pending.pop() else {
                break;
            };
            let task = &mut self.tasks[task_id];
            debug_assert_eq!(
                task.state,
                TaskState::Pending,
                "Task {task_id} admitted twice"
            );
            task.state = TaskState::Ready;
            admitted += 1;
        }
        admitted
    }

    /// Earliest arrival among tasks that have not been admitted yet.
    pub fn next_arrival(&self) -> Option<Time> {
        self.pending.peek().map(|(_, arrival)| arrival.at)
    }

    pub fn advance_to(&mut self, time: Time) {
        debug_assert!(
            time >= self.now,
            "Clock moved backwards from {} to {time}",
            self.now
        );
        self.now = time;
    }

    pub fn task(&self, task_id: TaskId) -> &Task {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Task {
        &mut self.tasks[task_id]
    }

    pub fn eligible(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.is_eligible())
    }

    pub fn has_eligible(&self) -> bool {
        self.eligible().next().is_some()
    }

    pub fn all_completed(&self) -> bool {
        self.tasks.iter().all(Task::is_completed)
    }

    /// Charges `slice` units of waiting to every ready task except `running`.
    pub fn accrue_waiting(&mut self, running: TaskId, slice: Time) {
        for task in self.tasks.iter_mut() {
            if task.id != running && task.is_eligible() {
                task.waited += slice;
            }
        }
    }

    /// Runs `task_id` for `slice` units starting at the current clock, records
    /// the interval and advances the clock. Returns true if the task finished.
    pub fn execute(&mut self, task_id: TaskId, slice: Time) -> bool {
        let start = self.now;
        let end = start + slice;

        let task = &mut self.tasks[task_id];
        debug_assert!(task.is_eligible(), "Task {task_id} dispatched while not ready");
        debug_assert!(
            slice <= task.remaining,
            "Slice {slice} exceeds remaining burst of task {task_id}"
        );

        task.remaining -= slice;
        // A leftover too small to move the clock is rounding residue
        let completed = task.remaining <= 0.0 || end + task.remaining == end;
        if completed {
            task.remaining = 0.0;
            task.state = TaskState::Completed;
            task.completion = Some(end);
        }
        let pid = task.pid;

        self.trace.push(Slice { start, end, pid });
        self.now = end;
        completed
    }
}
