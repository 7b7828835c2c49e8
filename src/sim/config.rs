use crate::core::state::Time;
use crate::error::SimError;

/// Slice length of the remaining-time disciplines.
pub const DEFAULT_QUANTUM: Time = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub quantum: Time,
    // Run the observer's trace and clock checks after every step
    pub check_invariants: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            check_invariants: true,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.quantum.is_finite() || self.quantum <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "quantum must be a positive number, got {}",
                self.quantum
            )));
        }
        Ok(())
    }
}
