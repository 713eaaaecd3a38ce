//! # Introduction
//!
//! wormtape runs a Turing machine whose tape is write-once (WORM) storage.
//! The transition function sees an ordinary rewritable *virtual* tape; every
//! logical write is redirected to a fresh cell of a *physical* tape, and a
//! single physical head walks cell by cell to every place it reads or writes.
//! A snapshot of the whole machine is captured after each transition so the
//! run can be replayed forward and backward in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Rule file → Lexer → Parser → RuleTable → Machine → Snapshots → TUI / report
//! ```
//!
//! 1. [`parser`]: tokenises a rule file and builds a
//!    [`machine::rules::RuleTable`].
//! 2. [`tape`]: the physical store with its append-only allocator, the
//!    stepwise physical head, and the virtual tape of indirection slots.
//! 3. [`machine`]: the [`machine::mediator::WormTape`] joining both tapes, and
//!    the [`machine::engine::Machine`] that applies first-match transitions.
//! 4. [`snapshot`]: snapshot history with a configurable memory limit.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Tape costs
//!
//! Rewriting a logical position never reuses its old cell, so a run consumes
//! one physical cell per write and fails with
//! [`machine::errors::MachineError::OutOfCapacity`] once the store is used up.

pub mod machine;
pub mod parser;
pub mod snapshot;
pub mod tape;
pub mod ui;
