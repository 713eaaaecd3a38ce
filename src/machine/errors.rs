//! Runtime error types for the write-once machine
//!
//! This module defines [`MachineError`], which represents all errors that can occur
//! while the machine runs or while its recorded history is navigated (as opposed to
//! rule-file parse errors).
//!
//! Tape errors are fatal - the run stops at the first one and whatever was already
//! written to the physical tape stays written.

use crate::tape::TapeKind;
use thiserror::Error;

/// Errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// The allocator found no unwritten physical cell
    #[error("Out of physical capacity: all {capacity} cells are written")]
    OutOfCapacity { capacity: usize },

    /// A write targeted a cell that was already written
    #[error("Double write at physical cell {index}")]
    DoubleWriteViolation { index: usize },

    /// A head moved (or an index pointed) outside its tape
    #[error("Out of bounds on the {tape} tape: position {position}, capacity {capacity}")]
    OutOfBounds {
        tape: TapeKind,
        position: i64,
        capacity: usize,
    },

    /// A tape was configured with zero cells
    #[error("The {tape} tape needs at least one cell")]
    InvalidCapacity { tape: TapeKind },

    /// Snapshot history limit exceeded. Stops recording; the run carries on
    #[error("Snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// Stepping through recorded history went past either end
    #[error("History unavailable: {message}")]
    HistoryUnavailable { message: String },
}

impl MachineError {
    /// Whether this error comes from the tape medium itself (as opposed to bookkeeping)
    pub fn is_tape_violation(&self) -> bool {
        matches!(
            self,
            MachineError::OutOfCapacity { .. }
                | MachineError::DoubleWriteViolation { .. }
                | MachineError::OutOfBounds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = MachineError::OutOfBounds {
            tape: TapeKind::Virtual,
            position: -1,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "Out of bounds on the virtual tape: position -1, capacity 4"
        );
        assert!(err.is_tape_violation());

        let err = MachineError::HistoryUnavailable {
            message: "Already at the beginning of execution".to_string(),
        };
        assert!(!err.is_tape_violation());
    }
}
