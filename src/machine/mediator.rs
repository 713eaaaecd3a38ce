//! Read/write mediator between the virtual and physical tapes
//!
//! [`WormTape`] is the only type that touches both tapes. A logical write never
//! overwrites: it allocates a fresh physical cell, seeks the head there, writes,
//! and then repoints the virtual slot. Every rewrite of a logical position
//! permanently consumes one physical cell.

use crate::machine::errors::MachineError;
use crate::tape::head::PhysicalHead;
use crate::tape::physical::{PhysicalCell, PhysicalStore};
use crate::tape::virtual_tape::{Slot, VirtualTape};
use crate::tape::{Symbol, TapeKind, BLANK};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct WormTape {
    store: PhysicalStore,
    head: PhysicalHead,
    slots: VirtualTape,
}

impl WormTape {
    pub fn new(physical_capacity: usize, virtual_capacity: usize) -> Result<Self, MachineError> {
        if physical_capacity == 0 {
            return Err(MachineError::InvalidCapacity {
                tape: TapeKind::Physical,
            });
        }
        if virtual_capacity == 0 {
            return Err(MachineError::InvalidCapacity {
                tape: TapeKind::Virtual,
            });
        }

        Ok(WormTape {
            store: PhysicalStore::new(physical_capacity),
            head: PhysicalHead::new(physical_capacity),
            slots: VirtualTape::new(virtual_capacity),
        })
    }

    /// Seek to the cell backing `position` and read it.
    ///
    /// A pristine slot still seeks its identity cell, so head motion is the
    /// same as a plain one-level indirection. The symbol is not: a pristine
    /// slot always reads as [`BLANK`], even when its identity cell has since
    /// been allocated to another position and holds that position's symbol.
    /// A one-level indirection would return that foreign symbol here. When the
    /// identity cell lies beyond the physical store there is nothing to seek.
    pub fn logical_read(&mut self, position: usize) -> Result<Symbol, MachineError> {
        match self.slots.slot(position)? {
            Slot::Bound(index) => {
                self.head.seek(index)?;
                self.head.read_here(&self.store)
            }
            Slot::Pristine => {
                if position < self.store.capacity() {
                    self.head.seek(position)?;
                }
                Ok(BLANK)
            }
        }
    }

    /// Write `symbol` at `position` on a fresh physical cell. Returns the cell's index.
    pub fn logical_write(
        &mut self,
        position: usize,
        symbol: Symbol,
    ) -> Result<usize, MachineError> {
        // Validate the position before consuming a cell for it
        self.slots.slot(position)?;

        let index = self.store.allocate_fresh_cell()?;
        self.head.seek(index)?;
        self.store.write(self.head.current_position(), symbol)?;
        self.slots.bind(position, index)?;

        debug!(position, physical = index, symbol, "logical write");
        Ok(index)
    }

    /// The symbol `logical_read` would return, without moving the head
    pub fn peek(&self, position: usize) -> Result<Symbol, MachineError> {
        match self.slots.slot(position)? {
            Slot::Bound(index) => self.store.read(index),
            Slot::Pristine => Ok(BLANK),
        }
    }

    /// Physical cells consumed so far
    pub fn cells_consumed(&self) -> usize {
        self.store.written_count()
    }

    pub fn store(&self) -> &PhysicalStore {
        &self.store
    }

    pub fn head(&self) -> &PhysicalHead {
        &self.head
    }

    pub fn slots(&self) -> &VirtualTape {
        &self.slots
    }

    /// Capture the tape for history. The motion log is not copied, only its length.
    pub fn checkpoint(&self) -> TapeCheckpoint {
        TapeCheckpoint {
            store: self.store.clone(),
            slots: self.slots.clone(),
            head_position: self.head.current_position(),
            travelled: self.head.travelled(),
        }
    }

    /// Return to a checkpoint taken earlier in this tape's own run
    pub fn restore(&mut self, checkpoint: &TapeCheckpoint) {
        self.store.clone_from(&checkpoint.store);
        self.slots.clone_from(&checkpoint.slots);
        self.head.rewind(checkpoint.head_position, checkpoint.travelled);
    }
}

/// Tape contents and head state at one point of a run
#[derive(Debug, Clone)]
pub struct TapeCheckpoint {
    store: PhysicalStore,
    slots: VirtualTape,
    head_position: usize,
    travelled: usize,
}

impl TapeCheckpoint {
    /// Estimate the memory usage of this checkpoint in bytes
    pub fn estimated_size(&self) -> usize {
        self.store.capacity() * std::mem::size_of::<PhysicalCell>()
            + self.slots.capacity() * std::mem::size_of::<Slot>()
            + std::mem::size_of::<Self>()
    }

    pub fn cells_consumed(&self) -> usize {
        self.store.written_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(
            WormTape::new(0, 4),
            Err(MachineError::InvalidCapacity {
                tape: TapeKind::Physical
            })
        ));
        assert!(matches!(
            WormTape::new(4, 0),
            Err(MachineError::InvalidCapacity {
                tape: TapeKind::Virtual
            })
        ));
    }

    #[test]
    fn test_identity_start_of_day() {
        let mut tape = WormTape::new(4, 4).unwrap();
        for position in 0..4 {
            assert_eq!(tape.logical_read(position).unwrap(), BLANK);
            assert_eq!(tape.head().current_position(), position);
        }
        assert_eq!(tape.cells_consumed(), 0);
    }

    #[test]
    fn test_rewrite_redirects_to_fresh_cell() {
        let mut tape = WormTape::new(4, 4).unwrap();
        let first = tape.logical_write(2, b'x').unwrap();
        let second = tape.logical_write(2, b'y').unwrap();

        assert_ne!(first, second);
        assert_eq!(tape.store().read(first).unwrap(), b'x');
        assert_eq!(tape.logical_read(2).unwrap(), b'y');
        assert_eq!(tape.cells_consumed(), 2);
        assert_eq!(tape.slots().slot(2).unwrap(), Slot::Bound(second));
    }

    #[test]
    fn test_pristine_slot_ignores_cell_taken_by_other_position() {
        let mut tape = WormTape::new(4, 4).unwrap();
        // Physical cell 0 goes to logical position 3
        assert_eq!(tape.logical_write(3, b'z').unwrap(), 0);
        assert_eq!(tape.logical_read(0).unwrap(), BLANK);
        assert_eq!(tape.head().current_position(), 0);
        assert_eq!(tape.logical_read(3).unwrap(), b'z');
    }

    #[test]
    fn test_exhaustion() {
        let mut tape = WormTape::new(1, 2).unwrap();
        tape.logical_write(0, b'a').unwrap();
        assert!(matches!(
            tape.logical_write(1, b'b'),
            Err(MachineError::OutOfCapacity { capacity: 1 })
        ));
        assert_eq!(tape.slots().slot(1).unwrap(), Slot::Pristine);
        // Beyond the physical store: no seek, still blank
        assert_eq!(tape.logical_read(1).unwrap(), BLANK);
    }

    #[test]
    fn test_write_outside_virtual_tape_consumes_nothing() {
        let mut tape = WormTape::new(4, 2).unwrap();
        assert!(matches!(
            tape.logical_write(2, b'a'),
            Err(MachineError::OutOfBounds {
                tape: TapeKind::Virtual,
                ..
            })
        ));
        assert_eq!(tape.cells_consumed(), 0);
    }

    #[test]
    fn test_checkpoint_restores_without_copying_motion() {
        let mut tape = WormTape::new(8, 8).unwrap();
        tape.logical_write(0, b'a').unwrap();
        let early = tape.checkpoint();

        tape.logical_write(0, b'b').unwrap();
        tape.logical_read(6).unwrap();
        let late = tape.checkpoint();
        let travelled = tape.head().travelled();

        tape.restore(&early);
        assert_eq!(tape.peek(0).unwrap(), b'a');
        assert_eq!(tape.cells_consumed(), 1);
        assert_eq!(tape.head().current_position(), 0);
        assert!(tape.head().log().is_empty());

        tape.restore(&late);
        assert_eq!(tape.peek(0).unwrap(), b'b');
        assert_eq!(tape.head().current_position(), 6);
        assert_eq!(tape.head().travelled(), travelled);
        assert_eq!(late.cells_consumed(), 2);
    }

    #[test]
    fn test_peek_does_not_move_head() {
        let mut tape = WormTape::new(4, 4).unwrap();
        tape.logical_write(0, b'a').unwrap();
        tape.logical_read(3).unwrap();
        let travelled = tape.head().travelled();
        assert_eq!(tape.peek(0).unwrap(), b'a');
        assert_eq!(tape.head().travelled(), travelled);
        assert_eq!(tape.head().current_position(), 3);
    }
}
