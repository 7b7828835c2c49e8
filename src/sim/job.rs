use rustc_hash::FxHashMap;

use crate::core::state::Time;
use crate::error::SimError;
use crate::scheduler::Algorithm;

pub type ProcessId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub id: ProcessId,
    pub arrival: Time,
    pub burst: Time,
    pub priority: Option<f64>,
}

/// A process row before it has been given an identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessRow {
    pub arrival: Time,
    pub burst: Time,
    pub priority: Option<f64>,
}

impl ProcessRow {
    pub fn new(arrival: Time, burst: Time) -> Self {
        Self {
            arrival,
            burst,
            priority: None,
        }
    }

    pub fn with_priority(arrival: Time, burst: Time, priority: f64) -> Self {
        Self {
            arrival,
            burst,
            priority: Some(priority),
        }
    }
}

/// A process row as typed into a form: every field is still text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRow<'a> {
    pub arrival: &'a str,
    pub burst: &'a str,
    pub priority: Option<&'a str>,
}

/// Validated, immutable input of a simulation run. Process ids are assigned
/// 1, 2, ... in row order.
#[derive(Debug, Clone)]
pub struct ProcessTable {
    processes: Vec<Process>,
    index: FxHashMap<ProcessId, usize>,
}

impl ProcessTable {
    pub fn new(rows: Vec<ProcessRow>) -> Result<Self, SimError> {
        if rows.is_empty() {
            return Err(SimError::EmptyInput);
        }

        let mut processes = Vec::with_capacity(rows.len());
        let mut index = FxHashMap::default();
        for (position, row) in rows.into_iter().enumerate() {
            let id = position + 1;
            check_time(id, "arrival time", row.arrival)?;
            check_time(id, "burst time", row.burst)?;
            if let Some(priority) = row.priority {
                check_priority(id, priority)?;
            }

            index.insert(id, position);
            processes.push(Process {
                id,
                arrival: row.arrival,
                burst: row.burst,
                priority: row.priority,
            });
        }

        Ok(Self { processes, index })
    }

    /// Parses text rows. A present priority field must parse as well; an
    /// absent one leaves the process without a priority.
    pub fn parse_rows(rows: &[RawRow<'_>]) -> Result<Self, SimError> {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(position, raw)| -> Result<ProcessRow, SimError> {
                let row = position + 1;
                Ok(ProcessRow {
                    arrival: parse_field(row, "arrival time", raw.arrival)?,
                    burst: parse_field(row, "burst time", raw.burst)?,
                    priority: raw
                        .priority
                        .map(|text| parse_field(row, "priority", text))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        Self::new(rows)
    }

    /// Rejects tables that lack a field `algorithm` needs.
    pub fn check_for(&self, algorithm: Algorithm) -> Result<(), SimError> {
        if !algorithm.requires_priority() {
            return Ok(());
        }
        match self.processes.iter().find(|p| p.priority.is_none()) {
            Some(process) => Err(SimError::invalid_input(
                process.id,
                format!("{algorithm} scheduling requires a priority"),
            )),
            None => Ok(()),
        }
    }

    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.index.get(&id).map(|&position| &self.processes[position])
    }

    pub fn as_slice(&self) -> &[Process] {
        &self.processes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Always false: construction rejects a table with no rows.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

fn parse_field(row: usize, field: &str, text: &str) -> Result<f64, SimError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SimError::invalid_input(row, format!("{field} is missing")));
    }
    text.parse::<f64>()
        .map_err(|_| SimError::invalid_input(row, format!("{field} `{text}` is not a number")))
}

fn check_time(row: usize, field: &str, value: Time) -> Result<(), SimError> {
    if !value.is_finite() {
        return Err(SimError::invalid_input(row, format!("{field} must be finite")));
    }
    if value < 0.0 {
        return Err(SimError::invalid_input(
            row,
            format!("{field} must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

fn check_priority(row: usize, priority: f64) -> Result<(), SimError> {
    if !priority.is_finite() || priority <= 0.0 {
        return Err(SimError::invalid_input(
            row,
            format!("priority must be greater than zero, got {priority}"),
        ));
    }
    Ok(())
}
