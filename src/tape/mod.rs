//! Tape model for the write-once machine
//!
//! This module provides the two tapes and their heads:
//! - [`physical`]: Fixed-capacity store of write-once cells with a left-to-right allocator
//! - [`head`]: Physical head that can only move one cell at a time, with a motion log
//! - [`virtual_tape`]: Indirection slots mapping logical positions to physical cells,
//!   and the virtual head that addresses them
//!
//! # Two Tapes
//!
//! The transition function sees a freely rewritable *virtual* tape. Underneath,
//! every logical write lands on a fresh *physical* cell:
//! ```text
//! virtual slot p  ──►  physical cell k   (k = first unwritten cell at write time)
//! ```
//! Nothing in this module knows about both tapes at once; that is the job of
//! [`crate::machine::mediator::WormTape`].

pub mod head;
pub mod physical;
pub mod virtual_tape;

use std::fmt;

/// A single tape symbol (one byte of the alphabet)
pub type Symbol = u8;

/// The value of a cell that has never been written
pub const BLANK: Symbol = 0;

/// Direction of a single head step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Apply one step in this direction to `position`.
    ///
    /// Returns `None` when the step would leave `[0, capacity - 1]`.
    pub fn apply(self, position: usize, capacity: usize) -> Option<usize> {
        match self {
            Direction::Left => position.checked_sub(1),
            Direction::Right => position.checked_add(1).filter(|&next| next < capacity),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Which of the two tapes an error or event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeKind {
    Physical,
    Virtual,
}

impl fmt::Display for TapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapeKind::Physical => write!(f, "physical"),
            TapeKind::Virtual => write!(f, "virtual"),
        }
    }
}

/// Render a symbol for humans: printable ASCII as-is, blank as `_`, anything else as hex
pub fn display_symbol(symbol: Symbol) -> String {
    match symbol {
        BLANK => "_".to_string(),
        b if b.is_ascii_graphic() || b == b' ' => (b as char).to_string(),
        b => format!("\\x{:02x}", b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_apply_bounds() {
        assert_eq!(Direction::Left.apply(0, 4), None);
        assert_eq!(Direction::Left.apply(3, 4), Some(2));
        assert_eq!(Direction::Right.apply(3, 4), None);
        assert_eq!(Direction::Right.apply(0, 4), Some(1));
    }

    #[test]
    fn test_display_symbol() {
        assert_eq!(display_symbol(BLANK), "_");
        assert_eq!(display_symbol(b'b'), "b");
        assert_eq!(display_symbol(0x07), "\\x07");
    }
}
