//! Virtual tape: one indirection slot per logical position
//!
//! A slot starts [`Slot::Pristine`], targeting its identity physical index
//! (virtual = physical before anything is written). The first write at a
//! position binds the slot to the freshly written physical cell; later writes
//! rebind it. Slots hold indices into the physical store, never references.

use super::{Direction, TapeKind};
use crate::machine::errors::MachineError;

/// Indirection from a logical position to a physical cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Never written; targets the identity physical cell
    Pristine,
    /// Bound to the physical cell holding this position's current symbol
    Bound(usize),
}

/// The virtual tape
#[derive(Debug, Clone)]
pub struct VirtualTape {
    slots: Vec<Slot>,
}

impl VirtualTape {
    pub fn new(capacity: usize) -> Self {
        VirtualTape {
            slots: vec![Slot::Pristine; capacity],
        }
    }

    pub fn slot(&self, position: usize) -> Result<Slot, MachineError> {
        self.slots
            .get(position)
            .copied()
            .ok_or_else(|| self.out_of_bounds(position))
    }

    /// Physical index a slot targets: its bound cell, or its identity cell if pristine
    pub fn target(&self, position: usize) -> Result<usize, MachineError> {
        Ok(match self.slot(position)? {
            Slot::Pristine => position,
            Slot::Bound(index) => index,
        })
    }

    /// Repoint a slot at a physical cell
    pub fn bind(&mut self, position: usize, physical_index: usize) -> Result<(), MachineError> {
        let err = self.out_of_bounds(position);
        let slot = self.slots.get_mut(position).ok_or(err)?;
        *slot = Slot::Bound(physical_index);
        Ok(())
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of positions that have been written at least once
    pub fn bound_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Bound(_)))
            .count()
    }

    fn out_of_bounds(&self, position: usize) -> MachineError {
        MachineError::OutOfBounds {
            tape: TapeKind::Virtual,
            position: position as i64,
            capacity: self.slots.len(),
        }
    }
}

/// The virtual head. Motion is plain index arithmetic with no physical effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualHead {
    position: usize,
    capacity: usize,
}

impl VirtualHead {
    pub fn new(capacity: usize) -> Self {
        VirtualHead {
            position: 0,
            capacity,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move one position; leaving the tape is fatal, same as for the physical head
    pub fn move_by(&mut self, direction: Direction) -> Result<(), MachineError> {
        self.position = direction
            .apply(self.position, self.capacity)
            .ok_or(MachineError::OutOfBounds {
                tape: TapeKind::Virtual,
                position: match direction {
                    Direction::Left => self.position as i64 - 1,
                    Direction::Right => self.position as i64 + 1,
                },
                capacity: self.capacity,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_start_as_identity() {
        let tape = VirtualTape::new(4);
        for position in 0..4 {
            assert_eq!(tape.slot(position).unwrap(), Slot::Pristine);
            assert_eq!(tape.target(position).unwrap(), position);
        }
        assert_eq!(tape.bound_count(), 0);
    }

    #[test]
    fn test_bind_repoints_slot() {
        let mut tape = VirtualTape::new(4);
        tape.bind(2, 0).unwrap();
        assert_eq!(tape.target(2).unwrap(), 0);
        tape.bind(2, 3).unwrap();
        assert_eq!(tape.slot(2).unwrap(), Slot::Bound(3));
        assert_eq!(tape.bound_count(), 1);
        assert!(tape.bind(4, 0).is_err());
    }

    #[test]
    fn test_virtual_head_is_bounded() {
        let mut head = VirtualHead::new(2);
        assert!(matches!(
            head.move_by(Direction::Left),
            Err(MachineError::OutOfBounds {
                tape: TapeKind::Virtual,
                position: -1,
                capacity: 2
            })
        ));
        head.move_by(Direction::Right).unwrap();
        assert_eq!(head.position(), 1);
        assert!(head.move_by(Direction::Right).is_err());
        head.move_by(Direction::Left).unwrap();
        assert_eq!(head.position(), 0);
    }
}
