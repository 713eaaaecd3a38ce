//! Physical head with stepwise motion
//!
//! The head models a device that cannot jump: every seek is a sequence of
//! single-cell steps, and each step is recorded in the [`MotionLog`] and emitted
//! as a `tracing` event. The log is the observable side effect of motion, so
//! [`PhysicalHead::seek`] must never shortcut to the target.

use super::physical::PhysicalStore;
use super::{Direction, Symbol, TapeKind};
use crate::machine::errors::MachineError;
use tracing::trace;

/// One recorded single-cell step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub direction: Direction,
    /// Position of the head after the step
    pub to: usize,
}

/// Append-only record of every physical step.
///
/// Entries past the cursor belong to a later point of the same run. They stay
/// recorded so history replay can move the cursor back and forth without
/// copying the log, and are only dropped when a new step overwrites them.
#[derive(Debug, Clone)]
pub struct MotionLog {
    entries: Vec<Motion>,
    cursor: usize,
}

impl MotionLog {
    pub fn new() -> Self {
        MotionLog {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    pub fn record(&mut self, motion: Motion) {
        self.entries.truncate(self.cursor);
        self.entries.push(motion);
        self.cursor += 1;
    }

    /// Steps up to the current point of the run
    pub fn entries(&self) -> &[Motion] {
        &self.entries[..self.cursor]
    }

    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Move the current point to `len` steps, clamped to what was recorded
    pub fn rewind(&mut self, len: usize) {
        self.cursor = len.min(self.entries.len());
    }

    /// Get all entries as human-readable lines
    pub fn get_output(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map(|motion| match motion.direction {
                Direction::Right => "Moving right".to_string(),
                Direction::Left => "Moving left".to_string(),
            })
            .collect()
    }
}

impl Default for MotionLog {
    fn default() -> Self {
        Self::new()
    }
}

/// The physical read/write head
#[derive(Debug, Clone)]
pub struct PhysicalHead {
    position: usize,
    capacity: usize,
    log: MotionLog,
}

impl PhysicalHead {
    /// Create a head parked on cell 0 of a tape with `capacity` cells
    pub fn new(capacity: usize) -> Self {
        PhysicalHead {
            position: 0,
            capacity,
            log: MotionLog::new(),
        }
    }

    /// Move exactly one cell
    pub fn step(&mut self, direction: Direction) -> Result<(), MachineError> {
        let next = direction
            .apply(self.position, self.capacity)
            .ok_or_else(|| MachineError::OutOfBounds {
                tape: TapeKind::Physical,
                position: match direction {
                    Direction::Left => self.position as i64 - 1,
                    Direction::Right => self.position as i64 + 1,
                },
                capacity: self.capacity,
            })?;

        trace!(from = self.position, to = next, "moving {}", direction);
        self.position = next;
        self.log.record(Motion {
            direction,
            to: next,
        });
        Ok(())
    }

    /// Step toward `target` one cell at a time. Returns the number of steps taken.
    pub fn seek(&mut self, target: usize) -> Result<usize, MachineError> {
        if target >= self.capacity {
            return Err(MachineError::OutOfBounds {
                tape: TapeKind::Physical,
                position: target as i64,
                capacity: self.capacity,
            });
        }

        let mut steps = 0;
        while target > self.position {
            self.step(Direction::Right)?;
            steps += 1;
        }
        while target < self.position {
            self.step(Direction::Left)?;
            steps += 1;
        }
        debug_assert_eq!(self.position, target);
        Ok(steps)
    }

    pub fn current_position(&self) -> usize {
        self.position
    }

    /// Read the cell under the head
    pub fn read_here(&self, store: &PhysicalStore) -> Result<Symbol, MachineError> {
        store.read(self.position)
    }

    pub fn log(&self) -> &MotionLog {
        &self.log
    }

    /// Total number of single steps ever taken
    pub fn travelled(&self) -> usize {
        self.log.len()
    }

    /// Put the head back where it was after `travelled` steps
    pub fn rewind(&mut self, position: usize, travelled: usize) {
        self.position = position;
        self.log.rewind(travelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_steps_one_cell_at_a_time() {
        let mut head = PhysicalHead::new(8);
        assert_eq!(head.seek(5).unwrap(), 5);
        assert_eq!(head.current_position(), 5);
        assert_eq!(head.seek(2).unwrap(), 3);
        assert_eq!(head.current_position(), 2);
        assert_eq!(head.travelled(), 8);

        let output = head.log().get_output();
        assert_eq!(output[0], "Moving right");
        assert_eq!(output[5], "Moving left");
    }

    #[test]
    fn test_seek_to_current_position_is_free() {
        let mut head = PhysicalHead::new(4);
        assert_eq!(head.seek(0).unwrap(), 0);
        assert!(head.log().is_empty());
    }

    #[test]
    fn test_step_off_either_end_fails() {
        let mut head = PhysicalHead::new(2);
        assert!(matches!(
            head.step(Direction::Left),
            Err(MachineError::OutOfBounds { position: -1, .. })
        ));
        head.step(Direction::Right).unwrap();
        assert!(matches!(
            head.step(Direction::Right),
            Err(MachineError::OutOfBounds { position: 2, .. })
        ));
        assert_eq!(head.current_position(), 1);
    }

    #[test]
    fn test_seek_out_of_range_does_not_move() {
        let mut head = PhysicalHead::new(3);
        assert!(head.seek(3).is_err());
        assert_eq!(head.current_position(), 0);
        assert_eq!(head.travelled(), 0);
    }

    #[test]
    fn test_rewind_keeps_later_steps_until_overwritten() {
        let mut head = PhysicalHead::new(8);
        head.seek(4).unwrap();
        head.rewind(1, 1);
        assert_eq!(head.current_position(), 1);
        assert_eq!(head.travelled(), 1);

        // Later steps are still recorded
        head.rewind(4, 4);
        assert_eq!(head.log().entries().last().unwrap().to, 4);

        // A new step from an earlier point replaces them
        head.rewind(2, 2);
        head.step(Direction::Left).unwrap();
        assert_eq!(head.travelled(), 3);
        head.rewind(4, 4);
        assert_eq!(head.travelled(), 3);
        assert_eq!(head.log().get_output()[2], "Moving left");
    }

    #[test]
    fn test_read_here_delegates_to_store() {
        let mut store = PhysicalStore::new(3);
        store.write(0, b'q').unwrap();
        let mut head = PhysicalHead::new(3);
        assert_eq!(head.read_here(&store).unwrap(), b'q');
        head.seek(1).unwrap();
        assert_eq!(head.read_here(&store).unwrap(), 0);
    }
}
