//! Physical store implementation
//!
//! This module provides the write-once medium:
//! - A fixed number of cells, all unwritten at start
//! - A left-to-right allocator handing out the first unwritten cell
//! - Double-write detection on every write
//!
//! # Prefix Invariant
//!
//! Cells are only ever written at the index returned by
//! [`PhysicalStore::allocate_fresh_cell`], so the written cells always form a
//! prefix of the store. The number of written cells is therefore also the
//! allocator's high-water mark.

use super::{Symbol, TapeKind, BLANK};
use crate::machine::errors::MachineError;

/// A single write-once cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalCell {
    pub symbol: Symbol,
    pub written: bool,
}

impl PhysicalCell {
    pub fn new() -> Self {
        PhysicalCell {
            symbol: BLANK,
            written: false,
        }
    }
}

impl Default for PhysicalCell {
    fn default() -> Self {
        Self::new()
    }
}

/// The physical tape
#[derive(Debug, Clone)]
pub struct PhysicalStore {
    cells: Vec<PhysicalCell>,
    written_count: usize,
}

impl PhysicalStore {
    /// Create a store of `capacity` unwritten cells
    pub fn new(capacity: usize) -> Self {
        PhysicalStore {
            cells: vec![PhysicalCell::new(); capacity],
            written_count: 0,
        }
    }

    /// Index of the first unwritten cell, scanning from the start
    pub fn allocate_fresh_cell(&self) -> Result<usize, MachineError> {
        self.cells
            .iter()
            .position(|cell| !cell.written)
            .ok_or(MachineError::OutOfCapacity {
                capacity: self.cells.len(),
            })
    }

    /// Write a symbol into an unwritten cell
    pub fn write(&mut self, index: usize, symbol: Symbol) -> Result<(), MachineError> {
        let capacity = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(MachineError::OutOfBounds {
                tape: TapeKind::Physical,
                position: index as i64,
                capacity,
            })?;

        if cell.written {
            return Err(MachineError::DoubleWriteViolation { index });
        }

        cell.symbol = symbol;
        cell.written = true;
        self.written_count += 1;
        Ok(())
    }

    /// Read a cell's symbol. Unwritten cells read as [`BLANK`].
    pub fn read(&self, index: usize) -> Result<Symbol, MachineError> {
        self.cells
            .get(index)
            .map(|cell| cell.symbol)
            .ok_or(MachineError::OutOfBounds {
                tape: TapeKind::Physical,
                position: index as i64,
                capacity: self.cells.len(),
            })
    }

    /// Get a cell (for UI display)
    pub fn cell(&self, index: usize) -> Option<&PhysicalCell> {
        self.cells.get(index)
    }

    /// All cells, in tape order
    pub fn cells(&self) -> &[PhysicalCell] {
        &self.cells
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of written cells (the allocator's high-water mark)
    pub fn written_count(&self) -> usize {
        self.written_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_hands_out_prefix() {
        let mut store = PhysicalStore::new(3);
        for expected in 0..3 {
            let index = store.allocate_fresh_cell().unwrap();
            assert_eq!(index, expected);
            store.write(index, b'x').unwrap();
        }
        assert_eq!(store.written_count(), 3);
        assert!(matches!(
            store.allocate_fresh_cell(),
            Err(MachineError::OutOfCapacity { capacity: 3 })
        ));
    }

    #[test]
    fn test_double_write_is_rejected() {
        let mut store = PhysicalStore::new(2);
        store.write(0, b'a').unwrap();
        assert!(matches!(
            store.write(0, b'b'),
            Err(MachineError::DoubleWriteViolation { index: 0 })
        ));
        assert_eq!(store.read(0).unwrap(), b'a');
        assert_eq!(store.written_count(), 1);
    }

    #[test]
    fn test_unwritten_cells_read_blank() {
        let store = PhysicalStore::new(2);
        assert_eq!(store.read(1).unwrap(), BLANK);
        assert!(matches!(
            store.read(2),
            Err(MachineError::OutOfBounds {
                tape: TapeKind::Physical,
                position: 2,
                capacity: 2
            })
        ));
    }
}
