//! Machine configuration
//!
//! Capacities are fixed for the lifetime of a [`Machine`](super::engine::Machine);
//! neither tape ever grows.

use super::constants::{DEFAULT_MAX_STEPS, DEFAULT_SNAPSHOT_LIMIT, DEFAULT_TAPE_SIZE};

/// How many transitions [`Machine::run`](super::engine::Machine::run) may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Attempt exactly one transition, then stop
    Single,
    /// Keep stepping until no rule matches or `max_steps` transitions have fired
    UntilHalt { max_steps: usize },
}

impl StepPolicy {
    pub fn max_steps(self) -> usize {
        match self {
            StepPolicy::Single => 1,
            StepPolicy::UntilHalt { max_steps } => max_steps,
        }
    }
}

impl Default for StepPolicy {
    fn default() -> Self {
        StepPolicy::UntilHalt {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    pub physical_capacity: usize,
    pub virtual_capacity: usize,
    pub policy: StepPolicy,
    /// Upper bound on the estimated size of recorded history, in bytes
    pub snapshot_limit: usize,
}

impl MachineConfig {
    /// Equal capacities for both tapes, everything else default
    pub fn with_capacity(capacity: usize) -> Self {
        MachineConfig {
            physical_capacity: capacity,
            virtual_capacity: capacity,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: StepPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            physical_capacity: DEFAULT_TAPE_SIZE,
            virtual_capacity: DEFAULT_TAPE_SIZE,
            policy: StepPolicy::default(),
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }
}
