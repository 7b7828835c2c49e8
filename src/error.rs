use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A process row is incomplete, unparsable or out of range. `row` is the
    /// 1-based row number, which is also the process id.
    InvalidInput { row: usize, reason: String },
    EmptyInput,
    InvalidConfig(String),
    /// The engine broke one of its own rules. Not recoverable.
    InternalInvariant(String),
}

impl SimError {
    pub(crate) fn invalid_input(row: usize, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            row,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidInput { row, reason } => {
                write!(f, "invalid input in process row {row}: {reason}")
            }
            SimError::EmptyInput => f.write_str("at least one process is required"),
            SimError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            SimError::InternalInvariant(detail) => {
                write!(f, "scheduler invariant violated: {detail}")
            }
        }
    }
}

impl std::error::Error for SimError {}
